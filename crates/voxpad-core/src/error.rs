use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("environment variable not found: {0}")]
    EnvVarNotFound(String),
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    #[error("failed to enumerate devices: {0}")]
    DeviceEnumeration(String),

    #[error("failed to build stream: {0}")]
    StreamBuild(String),

    #[error("failed to read audio file: {0}")]
    FileRead(String),

    #[error("failed to decode audio: {0}")]
    Decode(String),

    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to resample audio: {0}")]
    Resample(String),
}

#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("recognizer initialization failed: {0}")]
    InitializationFailed(String),

    /// The single flattened per-request failure case. The payload is the
    /// user-visible failure description; the cause is logged separately.
    #[error("recognition failed: {0}")]
    ProcessingFailed(String),

    #[error("recognizer engine not found: {0}")]
    EngineNotFound(String),
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown model: {0}")]
    UnknownModel(String),

    #[error("invalid model filename: {0}")]
    InvalidFilename(String),

    #[error("model not downloaded: {0}")]
    NotDownloaded(String),

    #[error("model download failed: {0}")]
    Download(String),

    #[error("checksum mismatch for {file}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        file: String,
        expected: String,
        actual: String,
    },

    #[error("model file error: {0}")]
    Io(#[from] std::io::Error),
}
