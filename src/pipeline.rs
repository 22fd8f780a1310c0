//! The per-packet transcode pipeline: decode drain, encode drain, write.

use recast_av::engine::{DecodeContext, Drain, EncodeContext, OutputSession};
use recast_av::frame::Frame;
use recast_av::packet::Packet;

use crate::context::TranscodePair;
use crate::error::ConvertError;
use crate::route::OutputBinding;
use crate::writer;

/// Push one coded packet through decode and re-encode, writing every
/// packet the encoder produces. Submission consumes the input packet
/// regardless of outcome.
pub fn transcode_packet<D: DecodeContext, E: EncodeContext>(
    pair: &mut TranscodePair<D, E>,
    output: &mut impl OutputSession,
    binding: &OutputBinding,
    packet: Packet,
) -> Result<(), ConvertError> {
    let submitted = pair.decoder.send_packet(&packet);
    drop(packet);
    submitted.map_err(ConvertError::SendDecode)?;

    loop {
        match pair.decoder.receive_frame() {
            Ok(Drain::Ready(frame)) => encode_frame(pair, output, binding, frame)?,
            Ok(Drain::NeedsInput) | Ok(Drain::EndOfStream) => break,
            Err(err) => return Err(ConvertError::ReceiveDecode(err)),
        }
    }

    Ok(())
}

/// Feed one decoded frame to the encoder and drain everything it emits.
fn encode_frame<D: DecodeContext, E: EncodeContext>(
    pair: &mut TranscodePair<D, E>,
    output: &mut impl OutputSession,
    binding: &OutputBinding,
    frame: Frame,
) -> Result<(), ConvertError> {
    let submitted = pair.encoder.send_frame(&frame);
    drop(frame);
    submitted.map_err(ConvertError::SendEncode)?;

    loop {
        match pair.encoder.receive_packet() {
            Ok(Drain::Ready(packet)) => writer::write_rescaled(output, binding, packet)?,
            Ok(Drain::NeedsInput) | Ok(Drain::EndOfStream) => break,
            Err(err) => return Err(ConvertError::ReceiveEncode(err)),
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod pipeline_test;
