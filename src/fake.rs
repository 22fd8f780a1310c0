//! Scripted engine used by the orchestrator tests: records every context
//! open/release and every output event, with injectable failures.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use recast_av::engine::{
    DecodeContext, Drain, EncodeContext, EncoderSpec, HeaderStatus, InputSession, MediaEngine,
    OutputSession, OutputStream, VideoConfig,
};
use recast_av::error::EngineError;
use recast_av::frame::Frame;
use recast_av::packet::Packet;
use recast_av::rational::Rational;
use recast_av::stream::{CodecParameters, MediaKind, StreamInfo};

/// Time base the fake container assigns to streams created without an
/// explicit one.
pub const CONTAINER_TIME_BASE: Rational = Rational { num: 1, den: 90_000 };

/// Counts context opens and releases; a release must happen exactly once
/// per context.
#[derive(Debug, Default)]
pub struct Ledger {
    state: Mutex<LedgerState>,
}

#[derive(Debug, Default)]
struct LedgerState {
    opened: usize,
    released: Vec<usize>,
}

impl Ledger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn register(ledger: &Arc<Ledger>) -> ContextHandle {
        let mut state = ledger.state.lock().unwrap();
        let id = state.opened;
        state.opened += 1;
        ContextHandle {
            id,
            ledger: Arc::clone(ledger),
        }
    }

    pub fn opened(&self) -> usize {
        self.state.lock().unwrap().opened
    }

    pub fn released(&self) -> usize {
        self.state.lock().unwrap().released.len()
    }

    pub fn live(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.opened - state.released.len()
    }
}

/// Tracks one open context; fills its ledger slot exactly once on drop.
#[derive(Debug)]
pub struct ContextHandle {
    id: usize,
    ledger: Arc<Ledger>,
}

impl Drop for ContextHandle {
    fn drop(&mut self) {
        let mut state = self.ledger.state.lock().unwrap();
        assert!(
            !state.released.contains(&self.id),
            "context {} released twice",
            self.id
        );
        state.released.push(self.id);
    }
}

pub struct FakeEngine {
    pub ledger: Arc<Ledger>,
    /// Fail opening the n-th decoder (0-based).
    pub fail_decoder_open_at: Option<usize>,
    /// Fail opening the n-th encoder (0-based).
    pub fail_encoder_open_at: Option<usize>,
    /// Every accepted packet decodes into this many frames.
    pub frames_per_packet: usize,
    pub fail_decode_send: bool,
    pub fail_decode_receive: bool,
    pub fail_encode_send: bool,
    pub fail_encode_receive: bool,
    decoders_opened: usize,
    encoders_opened: usize,
}

impl FakeEngine {
    pub fn new(ledger: &Arc<Ledger>) -> Self {
        Self {
            ledger: Arc::clone(ledger),
            fail_decoder_open_at: None,
            fail_encoder_open_at: None,
            frames_per_packet: 1,
            fail_decode_send: false,
            fail_decode_receive: false,
            fail_encode_send: false,
            fail_encode_receive: false,
            decoders_opened: 0,
            encoders_opened: 0,
        }
    }
}

impl MediaEngine for FakeEngine {
    type Decode = FakeDecode;
    type Encode = FakeEncode;

    fn open_decoder(&mut self, stream: &StreamInfo) -> Result<FakeDecode, EngineError> {
        let nth = self.decoders_opened;
        self.decoders_opened += 1;
        if self.fail_decoder_open_at == Some(nth) {
            return Err(EngineError::new("no decoder for stream"));
        }
        Ok(FakeDecode {
            _handle: Ledger::register(&self.ledger),
            config: VideoConfig {
                width: stream.parameters.width,
                height: stream.parameters.height,
                sample_aspect_ratio: stream.parameters.sample_aspect_ratio,
                pixel_format: stream.parameters.pixel_format.clone(),
                bit_rate: stream.parameters.bit_rate,
            },
            pending: VecDeque::new(),
            frames_per_packet: self.frames_per_packet,
            fail_send: self.fail_decode_send,
            fail_receive: self.fail_decode_receive,
            end_of_stream: false,
        })
    }

    fn open_encoder(&mut self, spec: &EncoderSpec) -> Result<FakeEncode, EngineError> {
        let nth = self.encoders_opened;
        self.encoders_opened += 1;
        if self.fail_encoder_open_at == Some(nth) {
            return Err(EngineError::new("encoder allocation failed"));
        }
        Ok(FakeEncode {
            _handle: Ledger::register(&self.ledger),
            spec: spec.clone(),
            pending: VecDeque::new(),
            fail_send: self.fail_encode_send,
            fail_receive: self.fail_encode_receive,
        })
    }
}

#[derive(Debug)]
pub struct FakeDecode {
    _handle: ContextHandle,
    config: VideoConfig,
    pending: VecDeque<Frame>,
    frames_per_packet: usize,
    fail_send: bool,
    fail_receive: bool,
    pub end_of_stream: bool,
}

impl DecodeContext for FakeDecode {
    fn send_packet(&mut self, packet: &Packet) -> Result<(), EngineError> {
        if self.fail_send {
            return Err(EngineError::new("decoder rejected packet"));
        }
        for n in 0..self.frames_per_packet {
            self.pending.push_back(Frame {
                pts: packet.pts.map(|pts| pts + n as i64),
                width: self.config.width,
                height: self.config.height,
                pixel_format: self.config.pixel_format.clone(),
                planes: Vec::new(),
            });
        }
        Ok(())
    }

    fn receive_frame(&mut self) -> Result<Drain<Frame>, EngineError> {
        if self.fail_receive {
            return Err(EngineError::new("decoder is broken"));
        }
        match self.pending.pop_front() {
            Some(frame) => Ok(Drain::Ready(frame)),
            None if self.end_of_stream => Ok(Drain::EndOfStream),
            None => Ok(Drain::NeedsInput),
        }
    }

    fn video_config(&self) -> VideoConfig {
        self.config.clone()
    }
}

#[derive(Debug)]
pub struct FakeEncode {
    _handle: ContextHandle,
    pub spec: EncoderSpec,
    pending: VecDeque<Packet>,
    fail_send: bool,
    fail_receive: bool,
}

impl EncodeContext for FakeEncode {
    fn send_frame(&mut self, frame: &Frame) -> Result<(), EngineError> {
        if self.fail_send {
            return Err(EngineError::new("encoder rejected frame"));
        }
        self.pending.push_back(Packet {
            stream_index: 0,
            data: Bytes::from_static(b"encoded"),
            pts: frame.pts,
            dts: frame.pts,
            duration: 0,
            key: true,
        });
        Ok(())
    }

    fn receive_packet(&mut self) -> Result<Drain<Packet>, EngineError> {
        if self.fail_receive {
            return Err(EngineError::new("encoder is broken"));
        }
        match self.pending.pop_front() {
            Some(packet) => Ok(Drain::Ready(packet)),
            None => Ok(Drain::NeedsInput),
        }
    }

    fn time_base(&self) -> Rational {
        self.spec.time_base
    }

    fn parameters(&self) -> CodecParameters {
        CodecParameters {
            codec: self.spec.codec.clone(),
            kind: MediaKind::Video,
            width: self.spec.width,
            height: self.spec.height,
            pixel_format: self.spec.pixel_format.clone(),
            sample_aspect_ratio: self.spec.sample_aspect_ratio,
            bit_rate: self.spec.bit_rate,
            sample_rate: 0,
            channels: 0,
            extradata: Bytes::new(),
        }
    }
}

pub struct FakeInput {
    pub stream_list: Vec<StreamInfo>,
    pub packets: VecDeque<Packet>,
}

impl FakeInput {
    pub fn new(streams: Vec<StreamInfo>, packets: Vec<Packet>) -> Self {
        Self {
            stream_list: streams,
            packets: packets.into(),
        }
    }
}

impl InputSession for FakeInput {
    fn streams(&self) -> &[StreamInfo] {
        &self.stream_list
    }

    fn read_packet(&mut self) -> Option<Packet> {
        self.packets.pop_front()
    }
}

/// Everything the fake muxer was asked to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputEvent {
    StreamAdded(usize),
    IoOpened,
    Header,
    Packet {
        stream_index: usize,
        pts: Option<i64>,
        dts: Option<i64>,
        data: Bytes,
    },
    Trailer,
    IoClosed,
}

pub struct FakeOutput {
    pub streams: Vec<(CodecParameters, Rational)>,
    pub events: Vec<OutputEvent>,
    pub header_status: HeaderStatus,
    pub fail_add_stream_at: Option<usize>,
    pub fail_open_io: bool,
    pub fail_header: bool,
    /// Fail the n-th interleaved write (0-based).
    pub fail_write_at: Option<usize>,
    pub fail_trailer: bool,
    writes: usize,
}

impl Default for FakeOutput {
    fn default() -> Self {
        Self {
            streams: Vec::new(),
            events: Vec::new(),
            header_status: HeaderStatus::DeferredParameters,
            fail_add_stream_at: None,
            fail_open_io: false,
            fail_header: false,
            fail_write_at: None,
            fail_trailer: false,
            writes: 0,
        }
    }
}

impl FakeOutput {
    pub fn written(&self) -> Vec<&OutputEvent> {
        self.events
            .iter()
            .filter(|event| matches!(event, OutputEvent::Packet { .. }))
            .collect()
    }
}

impl OutputSession for FakeOutput {
    fn add_stream(
        &mut self,
        parameters: &CodecParameters,
        time_base: Option<Rational>,
    ) -> Result<OutputStream, EngineError> {
        if self.fail_add_stream_at == Some(self.streams.len()) {
            return Err(EngineError::new("could not allocate stream"));
        }
        let assigned = time_base.unwrap_or(CONTAINER_TIME_BASE);
        let index = self.streams.len();
        self.streams.push((parameters.clone(), assigned));
        self.events.push(OutputEvent::StreamAdded(index));
        Ok(OutputStream {
            index,
            time_base: assigned,
        })
    }

    fn open_io(&mut self) -> Result<(), EngineError> {
        if self.fail_open_io {
            return Err(EngineError::new("permission denied"));
        }
        self.events.push(OutputEvent::IoOpened);
        Ok(())
    }

    fn write_header(&mut self) -> Result<HeaderStatus, EngineError> {
        if self.fail_header {
            return Err(EngineError::new("invalid argument"));
        }
        self.events.push(OutputEvent::Header);
        Ok(self.header_status)
    }

    fn write_interleaved(&mut self, packet: Packet) -> Result<(), EngineError> {
        let nth = self.writes;
        self.writes += 1;
        if self.fail_write_at == Some(nth) {
            return Err(EngineError::new("no space left on device"));
        }
        self.events.push(OutputEvent::Packet {
            stream_index: packet.stream_index,
            pts: packet.pts,
            dts: packet.dts,
            data: packet.data,
        });
        Ok(())
    }

    fn write_trailer(&mut self) -> Result<(), EngineError> {
        if self.fail_trailer {
            return Err(EngineError::new("I/O error"));
        }
        self.events.push(OutputEvent::Trailer);
        Ok(())
    }

    fn close_io(&mut self) {
        self.events.push(OutputEvent::IoClosed);
    }
}

pub fn video_stream(index: usize) -> StreamInfo {
    StreamInfo {
        index,
        kind: MediaKind::Video,
        parameters: CodecParameters {
            codec: "h264".to_string(),
            kind: MediaKind::Video,
            width: 1280,
            height: 720,
            pixel_format: Some("yuv420p".to_string()),
            sample_aspect_ratio: Rational::new(1, 1),
            bit_rate: 2_000_000,
            sample_rate: 0,
            channels: 0,
            extradata: Bytes::from_static(b"sps-pps"),
        },
        time_base: Rational::new(1, 15360),
        frame_rate: Rational::new(30, 1),
    }
}

pub fn audio_stream(index: usize) -> StreamInfo {
    StreamInfo {
        index,
        kind: MediaKind::Audio,
        parameters: CodecParameters {
            codec: "aac".to_string(),
            kind: MediaKind::Audio,
            width: 0,
            height: 0,
            pixel_format: None,
            sample_aspect_ratio: Rational::zero(),
            bit_rate: 128_000,
            sample_rate: 48_000,
            channels: 2,
            extradata: Bytes::from_static(b"asc"),
        },
        time_base: Rational::new(1, 48_000),
        frame_rate: Rational::zero(),
    }
}

pub fn subtitle_stream(index: usize) -> StreamInfo {
    StreamInfo {
        index,
        kind: MediaKind::Other,
        parameters: CodecParameters {
            codec: "mov_text".to_string(),
            kind: MediaKind::Other,
            ..CodecParameters::default()
        },
        time_base: Rational::new(1, 1000),
        frame_rate: Rational::zero(),
    }
}

pub fn packet(stream_index: usize, pts: i64) -> Packet {
    Packet {
        stream_index,
        data: Bytes::from(format!("pkt-{}-{}", stream_index, pts)),
        pts: Some(pts),
        dts: Some(pts),
        duration: 1,
        key: false,
    }
}
