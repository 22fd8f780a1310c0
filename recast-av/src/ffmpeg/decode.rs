use crate::engine::{DecodeContext, Drain, VideoConfig};
use crate::error::EngineError;
use crate::frame::Frame;
use crate::packet::Packet;
use crate::rational::Rational;

use super::convert;

/// An opened FFmpeg video decoder.
pub struct FfmpegDecode {
    inner: ffmpeg_next::codec::decoder::Video,
}

impl FfmpegDecode {
    pub(super) fn open(
        parameters: ffmpeg_next::codec::Parameters,
        time_base: Rational,
    ) -> Result<Self, EngineError> {
        let mut context = ffmpeg_next::codec::Context::new();
        unsafe {
            (*context.as_mut_ptr()).time_base = convert::rational_to_native(time_base).into();
        }
        context
            .set_parameters(parameters)
            .map_err(|e| convert::engine_err(e).context("failed to copy parameters to context"))?;

        let decoder = context.decoder().video().map_err(convert::engine_err)?;
        if decoder.format() == ffmpeg_next::format::Pixel::None
            || decoder.width() == 0
            || decoder.height() == 0
        {
            return Err(EngineError::new("missing codec parameters"));
        }

        Ok(Self { inner: decoder })
    }
}

impl DecodeContext for FfmpegDecode {
    fn send_packet(&mut self, packet: &Packet) -> Result<(), EngineError> {
        let native = convert::packet_to_native(packet);
        self.inner.send_packet(&native).map_err(convert::engine_err)
    }

    fn receive_frame(&mut self) -> Result<Drain<Frame>, EngineError> {
        let mut frame = ffmpeg_next::frame::Video::empty();
        match self.inner.receive_frame(&mut frame) {
            Ok(()) => Ok(Drain::Ready(convert::frame_from_native(&frame))),
            Err(ffmpeg_next::Error::Eof) => Ok(Drain::EndOfStream),
            Err(ffmpeg_next::Error::Other { errno })
                if errno == ffmpeg_next::util::error::EAGAIN =>
            {
                Ok(Drain::NeedsInput)
            }
            Err(err) => Err(convert::engine_err(err)),
        }
    }

    fn video_config(&self) -> VideoConfig {
        VideoConfig {
            width: self.inner.width(),
            height: self.inner.height(),
            sample_aspect_ratio: convert::rational_from_native(self.inner.aspect_ratio()),
            pixel_format: convert::pixel_format_name(self.inner.format()),
            bit_rate: unsafe { (*self.inner.as_ptr()).bit_rate },
        }
    }
}
