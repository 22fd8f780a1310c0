use bytes::Bytes;

use crate::rational::Rational;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaKind {
    Audio,
    Video,
    #[default]
    Other,
}

/// Codec parameters carried between input streams, codec contexts and the
/// muxer. Cloning is the parameter-copy operation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CodecParameters {
    /// Codec name, e.g. "h264", "aac", "libx265".
    pub codec: String,
    pub kind: MediaKind,
    pub width: u32,
    pub height: u32,
    pub pixel_format: Option<String>,
    pub sample_aspect_ratio: Rational,
    pub bit_rate: i64,
    pub sample_rate: i32,
    pub channels: i32,
    pub extradata: Bytes,
}

/// Descriptor of one input stream, fixed once the input session is open.
#[derive(Debug, Clone)]
pub struct StreamInfo {
    pub index: usize,
    pub kind: MediaKind,
    pub parameters: CodecParameters,
    pub time_base: Rational,
    /// Best available frame rate estimate, zero when the container gives
    /// none.
    pub frame_rate: Rational,
}

impl StreamInfo {
    pub fn is_video(&self) -> bool {
        self.kind == MediaKind::Video
    }

    pub fn is_audio(&self) -> bool {
        self.kind == MediaKind::Audio
    }
}
