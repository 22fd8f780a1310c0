use crate::engine::{HeaderStatus, OutputSession, OutputStream};
use crate::error::EngineError;
use crate::packet::Packet;
use crate::rational::Rational;
use crate::stream::CodecParameters;

use super::convert;

/// Time base containers assign to streams created without an explicit one.
const DEFAULT_STREAM_TIME_BASE: Rational = Rational { num: 1, den: 90_000 };

/// An output container being written.
pub struct FfmpegOutput {
    inner: ffmpeg_next::format::context::Output,
    declared: Vec<Rational>,
}

/// Create the output file for the given container format.
pub fn create_output(url: &str, container: &str) -> Result<FfmpegOutput, EngineError> {
    let output = ffmpeg_next::format::output_as(url, container).map_err(convert::engine_err)?;
    Ok(FfmpegOutput {
        inner: output,
        declared: Vec::new(),
    })
}

impl OutputSession for FfmpegOutput {
    fn add_stream(
        &mut self,
        parameters: &CodecParameters,
        time_base: Option<Rational>,
    ) -> Result<OutputStream, EngineError> {
        let id = ffmpeg_next::codec::Id::from(convert::codec_id_from_name(&parameters.codec));
        let mut stream = self
            .inner
            .add_stream(ffmpeg_next::encoder::find(id))
            .map_err(convert::engine_err)?;
        stream.set_parameters(convert::parameters_to_native(parameters));
        if let Some(tb) = time_base {
            stream.set_time_base(convert::rational_to_native(tb));
        }

        let index = stream.index();
        let assigned = convert::rational_from_native(stream.time_base());
        let assigned = if assigned.is_zero() {
            time_base.unwrap_or(DEFAULT_STREAM_TIME_BASE)
        } else {
            assigned
        };
        self.declared.push(assigned);
        Ok(OutputStream {
            index,
            time_base: assigned,
        })
    }

    fn open_io(&mut self) -> Result<(), EngineError> {
        // The wrapper opened the file when the context was created.
        Ok(())
    }

    fn write_header(&mut self) -> Result<HeaderStatus, EngineError> {
        // The wrapper folds the deferred-parameters status into plain
        // success, so report the header as written.
        self.inner.write_header().map_err(convert::engine_err)?;
        Ok(HeaderStatus::Written)
    }

    fn write_interleaved(&mut self, packet: Packet) -> Result<(), EngineError> {
        let declared = self
            .declared
            .get(packet.stream_index)
            .copied()
            .ok_or_else(|| {
                EngineError::new(format!("unknown output stream: {}", packet.stream_index))
            })?;

        let mut native = convert::packet_to_native(&packet);
        native.set_position(-1);

        // The muxer may replace a stream's time base when the header is
        // written; rescale from the one callers were told about.
        let actual = self
            .inner
            .stream(packet.stream_index)
            .map(|s| convert::rational_from_native(s.time_base()))
            .unwrap_or(declared);
        if !actual.is_zero() && actual != declared {
            native.rescale_ts(
                convert::rational_to_native(declared),
                convert::rational_to_native(actual),
            );
        }

        native
            .write_interleaved(&mut self.inner)
            .map_err(convert::engine_err)
    }

    fn write_trailer(&mut self) -> Result<(), EngineError> {
        self.inner.write_trailer().map_err(convert::engine_err)
    }

    fn close_io(&mut self) {
        // The file handle closes when the context drops.
    }
}
