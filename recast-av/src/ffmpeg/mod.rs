//! FFmpeg-backed media engine: the production implementation of the
//! engine traits. Requires the `ffmpeg` feature and the system FFmpeg
//! libraries.

mod convert;
mod decode;
mod encode;
mod input;
mod output;

pub use decode::FfmpegDecode;
pub use encode::FfmpegEncode;
pub use input::{FfmpegEngine, FfmpegInput, open_input};
pub use output::{FfmpegOutput, create_output};
