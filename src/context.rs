//! Codec-context lifecycle: opening decode/encode pairs and the single
//! release point every exit path funnels through.

use recast_av::engine::{DecodeContext, EncoderSpec, MediaEngine};
use recast_av::error::EngineError;
use recast_av::rational::Rational;
use recast_av::stream::StreamInfo;

use crate::route::StreamRoute;
use crate::TARGET_VIDEO_ENCODER;

/// Frame rate assumed when the container gives no estimate.
const FALLBACK_FRAME_RATE: Rational = Rational { num: 25, den: 1 };

/// The decode and encode contexts bound to one transcoded stream. Both
/// release their native resources when the pair is dropped.
#[derive(Debug)]
pub struct TranscodePair<D, E> {
    pub decoder: D,
    pub encoder: E,
}

/// Open decode and encode contexts for one video stream. The encoder takes
/// its picture configuration from the opened decoder and its time base
/// from the inverse of the stream's frame rate estimate.
pub fn open_transcode_pair<E: MediaEngine>(
    engine: &mut E,
    stream: &StreamInfo,
) -> Result<TranscodePair<E::Decode, E::Encode>, EngineError> {
    let decoder = engine
        .open_decoder(stream)
        .map_err(|e| e.context("failed to open decode context"))?;

    let config = decoder.video_config();
    let frame_rate = if stream.frame_rate.is_zero() {
        FALLBACK_FRAME_RATE
    } else {
        stream.frame_rate
    };
    let spec = EncoderSpec {
        codec: TARGET_VIDEO_ENCODER.to_string(),
        width: config.width,
        height: config.height,
        sample_aspect_ratio: config.sample_aspect_ratio,
        pixel_format: config.pixel_format,
        bit_rate: config.bit_rate,
        time_base: frame_rate.invert(),
    };
    let encoder = engine
        .open_encoder(&spec)
        .map_err(|e| e.context("failed to open encode context"))?;

    Ok(TranscodePair { decoder, encoder })
}

/// Release every codec context still held by the route table. Called from
/// every setup-failure path and from normal teardown; consuming the table
/// makes a second release impossible.
pub fn release_all<D, E>(routes: Vec<StreamRoute<D, E>>) {
    let mut released = 0usize;
    for route in routes {
        if let StreamRoute::Transcode(_, pair) = route {
            drop(pair);
            released += 1;
        }
    }
    if released > 0 {
        log::debug!("released {} transcode pairs", released);
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod context_test;
