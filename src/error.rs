use recast_av::error::EngineError;
use thiserror::Error;

/// Fatal conversion failures. The Display text is the one diagnostic line
/// shown to the user: the failing operation plus the engine's status text.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("failed to set up output streams: {0}")]
    Setup(EngineError),

    #[error("failed to write header to output: {0}")]
    Header(EngineError),

    #[error("failed to send decode packet: {0}")]
    SendDecode(EngineError),

    #[error("failed to receive decode frames: {0}")]
    ReceiveDecode(EngineError),

    #[error("failed to send encode frame: {0}")]
    SendEncode(EngineError),

    #[error("failed to receive encode packets: {0}")]
    ReceiveEncode(EngineError),

    #[error("failed to write packet: {0}")]
    Write(EngineError),

    #[error("failed to write trailer: {0}")]
    Trailer(EngineError),
}
