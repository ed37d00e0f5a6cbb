use thiserror::Error;

/// Errors produced while talking to a device, parsing its UI hierarchy or rendering overlays
#[derive(Debug, Error)]
pub enum PuppeteerError {
    /// Device or adb server could not be reached
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Hierarchy document or a node attribute could not be parsed
    #[error("Parse failed: {0}")]
    ParseFailed(String),

    /// Image decoding, composition or encoding failed
    #[error("Render failed: {0}")]
    RenderFailed(String),

    /// An external command ran but reported failure
    #[error("Command '{command}' failed: {reason}")]
    CommandFailed { command: String, reason: String },

    /// An external command did not finish in time
    #[error("Command '{command}' timed out after {seconds}s")]
    Timeout { command: String, seconds: u64 },

    /// Configuration file or value is invalid
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<roxmltree::Error> for PuppeteerError {
    fn from(err: roxmltree::Error) -> Self {
        PuppeteerError::ParseFailed(format!("Malformed hierarchy document: {}", err))
    }
}

impl From<image::ImageError> for PuppeteerError {
    fn from(err: image::ImageError) -> Self {
        PuppeteerError::RenderFailed(err.to_string())
    }
}

impl From<serde_json::Error> for PuppeteerError {
    fn from(err: serde_json::Error) -> Self {
        PuppeteerError::ConfigInvalid(err.to_string())
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, PuppeteerError>;
