use anyhow::{Context, Result};
use clap::Parser;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;
use voxpad_core::{AudioSource, CaptureStatus, SessionState, UiCommand};

#[derive(Parser)]
#[command(name = "voxpad", about = "Offline speech-to-text pad")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = voxpad_core::AppConfig::load_from_file(&cli.config)
        .with_context(|| format!("failed to load config from {:?}", cli.config))?;

    // Set up TUI log buffer and layered tracing subscriber
    let log_buffer = Arc::new(Mutex::new(VecDeque::<String>::new()));
    let tui_log_layer = voxpad_tui::TuiLogLayer::new(Arc::clone(&log_buffer), 1000);

    let env_filter = EnvFilter::try_new(&config.general.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::Registry::default()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(tui_log_layer);

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    tracing::info!("voxpad starting");

    // Explicit startup step: resolve (and possibly download) the model before
    // any request path exists, so initialization failures are loud and early.
    let engine_name = config.asr.engine.clone();
    let mut engine_config = toml::Value::try_from(&config.asr.whisper)
        .context("failed to serialize whisper config")?;

    if engine_name == "whisper" {
        let last_percent = AtomicU64::new(0);
        let model_path =
            voxpad_engine::models::resolve_model(&config.asr.whisper, move |done, total| {
                if total == 0 {
                    return;
                }
                let percent = done * 100 / total;
                let prev = last_percent.swap(percent, Ordering::Relaxed);
                if percent / 10 > prev / 10 {
                    tracing::info!("model download: {percent}%");
                }
            })
            .await
            .with_context(|| {
                format!("failed to resolve model '{}'", config.asr.whisper.model)
            })?;
        tracing::info!("model ready at {:?}", model_path);

        if let Some(table) = engine_config.as_table_mut() {
            table.insert(
                "model_path".to_string(),
                toml::Value::String(model_path.to_string_lossy().into_owned()),
            );
        }
    }

    let registry = voxpad_engine::RecognizerRegistry::new();
    let mut recognizer = registry.create(&engine_name).with_context(|| {
        format!(
            "failed to create recognizer engine '{}' (available: {:?})",
            engine_name,
            registry.list_engines(),
        )
    })?;
    recognizer
        .initialize(engine_config)
        .await
        .with_context(|| format!("failed to initialize recognizer engine '{engine_name}'"))?;
    tracing::info!("recognizer engine '{engine_name}' active");

    let service = voxpad_service::TranscriptionService::new(recognizer);
    let shared = Arc::new(Mutex::new(voxpad_service::SessionShared::default()));
    let sink = config
        .session
        .transcript_file
        .clone()
        .map(voxpad_service::TranscriptSink::new);
    let (mut host, request_tx) = voxpad_service::SessionHost::spawn(
        service,
        Arc::clone(&shared),
        sink,
        config.session.history_limit,
    );

    // Microphone capture. The stream stays on this thread for its lifetime;
    // only the handle crosses into tasks.
    let mut _capture = None;
    let mut recorder: Option<voxpad_audio::RecorderHandle> = None;
    if config.capture.enabled {
        let device_manager = voxpad_audio::DeviceManager::new();
        match device_manager.get_input_device(&config.capture.device_name) {
            Ok(device) => {
                match voxpad_audio::CaptureNode::new(
                    &device,
                    config.capture.sample_rate,
                    1,
                    config.capture.buffer_size,
                ) {
                    Ok((node, handle)) => {
                        tracing::info!(
                            "capture ready on '{}' at {} Hz",
                            config.capture.device_name,
                            config.capture.sample_rate,
                        );
                        _capture = Some(node);
                        recorder = Some(handle);
                    }
                    Err(e) => tracing::warn!("microphone capture unavailable: {e}"),
                }
            }
            Err(e) => tracing::warn!(
                "input device '{}' unavailable: {e}",
                config.capture.device_name
            ),
        }
    }

    // Set up TUI communication channels
    let (state_tx, state_rx) = tokio::sync::watch::channel(SessionState::default());
    let (cmd_tx, mut cmd_rx) = tokio::sync::mpsc::unbounded_channel::<UiCommand>();

    // Spawn state broadcast task (~30Hz)
    let broadcast_shared = Arc::clone(&shared);
    let broadcast_recorder = recorder.clone();
    let engine_label = engine_name.clone();
    let model_label = config.asr.whisper.model.clone();
    let capture_enabled = config.capture.enabled;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(33));
        loop {
            interval.tick().await;

            let (transcript, history, busy) = {
                let s = broadcast_shared.lock().unwrap();
                (s.transcript.clone(), s.history.clone(), s.busy)
            };
            let (recording, peak_level, capture) = match &broadcast_recorder {
                Some(h) => (h.is_recording(), h.peak_level(), h.status()),
                None => (
                    false,
                    0.0,
                    if capture_enabled {
                        CaptureStatus::Error
                    } else {
                        CaptureStatus::Disabled
                    },
                ),
            };

            let state = SessionState {
                engine: engine_label.clone(),
                model_name: model_label.clone(),
                recording,
                peak_level,
                capture,
                transcript,
                history,
                busy,
                is_running: true,
            };

            if state_tx.send(state).is_err() {
                break; // TUI closed
            }
        }
    });

    // Spawn command handler task
    let cmd_recorder = recorder.clone();
    let cmd_request_tx = request_tx.clone();
    tokio::spawn(async move {
        while let Some(cmd) = cmd_rx.recv().await {
            match cmd {
                UiCommand::TranscribeFile(path) => {
                    let trimmed = path.trim();
                    let source = if trimmed.is_empty() {
                        None
                    } else {
                        Some(AudioSource::File(PathBuf::from(trimmed)))
                    };
                    let _ = cmd_request_tx.send(source);
                }
                UiCommand::StartRecording => match &cmd_recorder {
                    Some(h) => {
                        h.start();
                        tracing::info!("recording started");
                    }
                    None => tracing::warn!("microphone capture is not available"),
                },
                UiCommand::StopRecording => {
                    if let Some(h) = &cmd_recorder {
                        h.stop();
                        // Let the drain thread flush the ring buffer tail.
                        tokio::time::sleep(Duration::from_millis(120)).await;
                        let source = h.take_clip().map(AudioSource::Clip);
                        match &source {
                            Some(AudioSource::Clip(clip)) => tracing::info!(
                                "recording stopped ({:.1}s captured)",
                                clip.duration_secs(),
                            ),
                            _ => tracing::warn!("recording stopped with no audio captured"),
                        }
                        let _ = cmd_request_tx.send(source);
                    }
                }
                UiCommand::Quit => {
                    break;
                }
            }
        }
    });

    drop(request_tx);

    tracing::info!("TUI active — press Esc to quit");

    // Run TUI (blocks until user quits)
    voxpad_tui::run(state_rx, cmd_tx, log_buffer)
        .await
        .context("TUI error")?;

    tracing::info!("shutting down");
    host.shutdown().await;

    Ok(())
}
