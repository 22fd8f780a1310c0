use std::path::Path;

use crate::engine::{EncoderSpec, InputSession, MediaEngine};
use crate::error::EngineError;
use crate::packet::Packet;
use crate::stream::StreamInfo;

use super::convert;
use super::decode::FfmpegDecode;
use super::encode::FfmpegEncode;

/// An opened input container.
pub struct FfmpegInput {
    inner: ffmpeg_next::format::context::Input,
    streams: Vec<StreamInfo>,
}

/// Codec-context factory for one opened input: keeps the native codec
/// parameters decoders are opened from.
pub struct FfmpegEngine {
    parameters: Vec<ffmpeg_next::codec::Parameters>,
}

/// Open an input file and probe its streams.
pub fn open_input(url: &str) -> Result<(FfmpegInput, FfmpegEngine), EngineError> {
    let path = Path::new(url);
    let input = ffmpeg_next::format::input(path).map_err(convert::engine_err)?;

    let mut streams = Vec::new();
    let mut parameters = Vec::new();
    for stream in input.streams() {
        streams.push(convert::stream_info(&stream));
        parameters.push(stream.parameters());
    }
    log::info!("opened input {} with {} streams", url, streams.len());

    Ok((FfmpegInput { inner: input, streams }, FfmpegEngine { parameters }))
}

impl InputSession for FfmpegInput {
    fn streams(&self) -> &[StreamInfo] {
        &self.streams
    }

    fn read_packet(&mut self) -> Option<Packet> {
        let (stream, packet) = self.inner.packets().next()?;
        Some(convert::packet_from_native(&packet, stream.index()))
    }
}

impl MediaEngine for FfmpegEngine {
    type Decode = FfmpegDecode;
    type Encode = FfmpegEncode;

    fn open_decoder(&mut self, stream: &StreamInfo) -> Result<FfmpegDecode, EngineError> {
        let parameters = self
            .parameters
            .get(stream.index)
            .cloned()
            .ok_or_else(|| EngineError::new(format!("no such input stream: {}", stream.index)))?;
        FfmpegDecode::open(parameters, stream.time_base)
    }

    fn open_encoder(&mut self, spec: &EncoderSpec) -> Result<FfmpegEncode, EngineError> {
        FfmpegEncode::open(spec)
    }
}
