pub mod engine;
pub mod error;
pub mod frame;
pub mod packet;
pub mod rational;
pub mod stream;

#[cfg(feature = "ffmpeg")]
pub mod ffmpeg;

/// Registers FFmpeg components. Call once at startup before opening any
/// input.
#[cfg(feature = "ffmpeg")]
pub fn init() -> Result<(), error::EngineError> {
    ffmpeg_next::init().map_err(|e| error::EngineError::new(format!("ffmpeg init: {}", e)))
}
