use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use voxpad_core::ui_types::{SessionState, UiCommand};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Transcribe,
    Record,
    Logs,
}

impl Tab {
    fn next(self) -> Self {
        match self {
            Tab::Transcribe => Tab::Record,
            Tab::Record => Tab::Logs,
            Tab::Logs => Tab::Transcribe,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    None,
    Quit,
    Command(UiCommand),
}

pub struct App {
    pub tab: Tab,
    pub state: SessionState,
    /// Contents of the file-path entry on the Transcribe tab.
    pub path_input: String,
    pub should_quit: bool,
    pub logs: Arc<Mutex<VecDeque<String>>>,
    pub log_scroll: usize,
    pub log_auto_scroll: bool,
}

impl App {
    pub fn new(logs: Arc<Mutex<VecDeque<String>>>) -> Self {
        Self {
            tab: Tab::Transcribe,
            state: SessionState::default(),
            path_input: String::new(),
            should_quit: false,
            logs,
            log_scroll: 0,
            log_auto_scroll: true,
        }
    }

    pub fn update_state(&mut self, new_state: SessionState) {
        self.state = new_state;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        // Global keys. Esc quits everywhere since the Transcribe tab consumes
        // plain characters for the path entry.
        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
                return AppAction::Quit;
            }
            KeyCode::Tab => {
                self.tab = self.tab.next();
                return AppAction::None;
            }
            _ => {}
        }

        match self.tab {
            Tab::Transcribe => self.handle_transcribe_key(key),
            Tab::Record => self.handle_record_key(key),
            Tab::Logs => self.handle_logs_key(key),
        }
    }

    fn handle_transcribe_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Enter => {
                // Empty entry is a legal submission: the service answers it
                // with the upload prompt.
                AppAction::Command(UiCommand::TranscribeFile(
                    self.path_input.trim().to_string(),
                ))
            }
            KeyCode::Backspace => {
                self.path_input.pop();
                AppAction::None
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.path_input.push(c);
                AppAction::None
            }
            _ => AppAction::None,
        }
    }

    fn handle_record_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('r') => {
                if self.state.recording {
                    AppAction::Command(UiCommand::StopRecording)
                } else {
                    AppAction::Command(UiCommand::StartRecording)
                }
            }
            _ => AppAction::None,
        }
    }

    fn handle_logs_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Up => {
                self.log_scroll = self.log_scroll.saturating_add(1);
                self.log_auto_scroll = false;
                AppAction::None
            }
            KeyCode::Down => {
                self.log_scroll = self.log_scroll.saturating_sub(1);
                AppAction::None
            }
            KeyCode::Char('G') => {
                self.log_scroll = 0;
                self.log_auto_scroll = true;
                AppAction::None
            }
            _ => AppAction::None,
        }
    }
}
