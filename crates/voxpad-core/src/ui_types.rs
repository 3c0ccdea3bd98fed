/// Health of the microphone capture path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureStatus {
    #[default]
    Ok,
    Error,
    Disabled,
}

/// Aggregate session state broadcast to the TUI via watch channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub engine: String,
    pub model_name: String,
    pub recording: bool,
    pub peak_level: f32,
    pub capture: CaptureStatus,
    /// Latest transcription result: recognized text, the guidance message,
    /// or an error message. One channel for all three.
    pub transcript: String,
    pub history: Vec<String>,
    pub busy: bool,
    pub is_running: bool,
}

/// Commands sent from TUI → main via mpsc channel.
#[derive(Debug, Clone, PartialEq)]
pub enum UiCommand {
    /// Transcribe the file at the given path. An empty path means the user
    /// submitted without selecting a file.
    TranscribeFile(String),
    StartRecording,
    StopRecording,
    Quit,
}
