//! The seam between the conversion core and a media codec engine:
//! demux, decode, encode and mux are consumed through these traits.

use crate::error::EngineError;
use crate::frame::Frame;
use crate::packet::Packet;
use crate::rational::Rational;
use crate::stream::{CodecParameters, StreamInfo};

/// Outcome of one drain-loop fetch from a codec context.
///
/// `NeedsInput` and `EndOfStream` stop the drain; neither is an error and
/// neither must ever be folded into one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Drain<T> {
    Ready(T),
    NeedsInput,
    EndOfStream,
}

/// Successful outcomes of writing the container header. Some muxers defer
/// filling stream parameters until the header is written; that is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStatus {
    Written,
    DeferredParameters,
}

/// A stream created on an output session: its dense index and the time
/// base the container actually assigned.
#[derive(Debug, Clone, Copy)]
pub struct OutputStream {
    pub index: usize,
    pub time_base: Rational,
}

/// Picture configuration read back from an opened decode context.
#[derive(Debug, Clone)]
pub struct VideoConfig {
    pub width: u32,
    pub height: u32,
    pub sample_aspect_ratio: Rational,
    pub pixel_format: Option<String>,
    pub bit_rate: i64,
}

/// Settings for opening an encode context, derived from a decode context.
#[derive(Debug, Clone)]
pub struct EncoderSpec {
    pub codec: String,
    pub width: u32,
    pub height: u32,
    pub sample_aspect_ratio: Rational,
    pub pixel_format: Option<String>,
    pub bit_rate: i64,
    pub time_base: Rational,
}

/// An opened demux session.
pub trait InputSession {
    fn streams(&self) -> &[StreamInfo];

    /// Next packet in read order, `None` once the input is exhausted.
    fn read_packet(&mut self) -> Option<Packet>;
}

/// Decode side of a transcode pair. Releases its native resources on drop.
pub trait DecodeContext {
    fn send_packet(&mut self, packet: &Packet) -> Result<(), EngineError>;

    fn receive_frame(&mut self) -> Result<Drain<Frame>, EngineError>;

    /// The opened decoder's picture configuration; the encoder derives its
    /// settings from these values.
    fn video_config(&self) -> VideoConfig;
}

/// Encode side of a transcode pair. Releases its native resources on drop.
pub trait EncodeContext {
    fn send_frame(&mut self, frame: &Frame) -> Result<(), EngineError>;

    fn receive_packet(&mut self) -> Result<Drain<Packet>, EngineError>;

    /// Time base the encoder settled on when it was opened.
    fn time_base(&self) -> Rational;

    /// Codec parameters describing the encoded output stream.
    fn parameters(&self) -> CodecParameters;
}

/// An output container being written.
pub trait OutputSession {
    /// Create a stream. Passing a time base is a request; the container
    /// reports the one it assigned.
    fn add_stream(
        &mut self,
        parameters: &CodecParameters,
        time_base: Option<Rational>,
    ) -> Result<OutputStream, EngineError>;

    fn open_io(&mut self) -> Result<(), EngineError>;

    fn write_header(&mut self) -> Result<HeaderStatus, EngineError>;

    fn write_interleaved(&mut self, packet: Packet) -> Result<(), EngineError>;

    fn write_trailer(&mut self) -> Result<(), EngineError>;

    fn close_io(&mut self);
}

/// Factory for codec contexts.
pub trait MediaEngine {
    type Decode: DecodeContext;
    type Encode: EncodeContext;

    fn open_decoder(&mut self, stream: &StreamInfo) -> Result<Self::Decode, EngineError>;

    fn open_encoder(&mut self, spec: &EncoderSpec) -> Result<Self::Encode, EngineError>;
}
