use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Tabs, Wrap};
use ratatui::Frame;
use voxpad_core::ui_types::CaptureStatus;

use crate::app::{App, Tab};

const TRANSCRIPT_PLACEHOLDER: &str = "Your transcribed text will appear here...";

pub fn draw(frame: &mut Frame, app: &App) {
    let [tabs_area, main_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).areas(frame.area());

    draw_tabs(frame, app, tabs_area);

    match app.tab {
        Tab::Transcribe => draw_transcribe(frame, app, main_area),
        Tab::Record => draw_record(frame, app, main_area),
        Tab::Logs => draw_logs(frame, app, main_area),
    }
}

fn draw_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles = vec!["Transcribe", "Record", "Logs"];
    let selected = match app.tab {
        Tab::Transcribe => 0,
        Tab::Record => 1,
        Tab::Logs => 2,
    };
    let title = format!(
        "voxpad [{} / {}] (Tab=switch, Esc=quit)",
        app.state.engine, app.state.model_name,
    );
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(title))
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn draw_transcribe(frame: &mut Frame, app: &App, area: Rect) {
    let [input_area, transcript_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).areas(area);

    let input = Paragraph::new(app.path_input.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Audio file (WAV path, Enter to transcribe)"),
    );
    frame.render_widget(input, input_area);

    draw_transcript(frame, app, transcript_area);
}

fn draw_record(frame: &mut Frame, app: &App, area: Rect) {
    let [gauge_area, status_area, transcript_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Fill(1),
    ])
    .areas(area);

    let ratio = app.state.peak_level.clamp(0.0, 1.0) as f64;
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Level"))
        .gauge_style(Style::default().fg(if app.state.recording {
            Color::Green
        } else {
            Color::DarkGray
        }))
        .ratio(ratio);
    frame.render_widget(gauge, gauge_area);

    let status_text = match (app.state.capture, app.state.recording) {
        (CaptureStatus::Disabled, _) => "Microphone capture is disabled in the config".to_string(),
        (CaptureStatus::Error, _) => "Microphone capture is unavailable".to_string(),
        (CaptureStatus::Ok, true) => "Recording... press r to stop and transcribe".to_string(),
        (CaptureStatus::Ok, false) => "Press r to start recording".to_string(),
    };
    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Microphone"));
    frame.render_widget(status, status_area);

    // Recent results, newest first
    let items: Vec<ListItem> = app
        .state
        .history
        .iter()
        .rev()
        .take(10)
        .map(|s| ListItem::new(s.as_str()))
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Recent results"),
    );
    frame.render_widget(list, transcript_area);
}

fn draw_transcript(frame: &mut Frame, app: &App, area: Rect) {
    let title = if app.state.busy {
        "Transcription (working...)"
    } else {
        "Transcription"
    };

    let (text, style) = if app.state.transcript.is_empty() {
        (TRANSCRIPT_PLACEHOLDER, Style::default().fg(Color::DarkGray))
    } else {
        (app.state.transcript.as_str(), Style::default())
    };

    let para = Paragraph::new(text)
        .style(style)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(para, area);
}

fn draw_logs(frame: &mut Frame, app: &App, area: Rect) {
    let logs = app.logs.lock().unwrap();
    let total = logs.len();

    let visible_height = area.height.saturating_sub(2) as usize; // account for borders
    let scroll = app.log_scroll.min(total.saturating_sub(visible_height));
    let end = total.saturating_sub(scroll);
    let start = end.saturating_sub(visible_height);

    let items: Vec<ListItem> = logs
        .iter()
        .skip(start)
        .take(end - start)
        .map(|s| ListItem::new(s.as_str()))
        .collect();

    let title = if app.log_auto_scroll {
        "Logs (auto-scroll)"
    } else {
        "Logs (Up/Down=scroll, G=bottom)"
    };
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);
}
