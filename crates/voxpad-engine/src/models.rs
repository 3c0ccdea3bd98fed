use futures_util::StreamExt;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use voxpad_core::config::WhisperConfig;
use voxpad_core::ModelError;

const HUGGINGFACE_BASE_URL: &str = "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/";

#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub filename: String,
    pub display_name: String,
    pub size_bytes: u64,
    pub sha256: Option<String>,
}

/// Known ggml Whisper model files, smallest first.
pub fn available_models() -> Vec<ModelInfo> {
    vec![
        ModelInfo {
            filename: "ggml-tiny-q5_1.bin".to_string(),
            display_name: "Tiny Q5".to_string(),
            size_bytes: 32_152_673,
            sha256: Some(
                "818710568da3ca15689e31a743197b520007872ff9576237bda97bd1b469c3d7".to_string(),
            ),
        },
        ModelInfo {
            filename: "ggml-base-q5_1.bin".to_string(),
            display_name: "Base Q5".to_string(),
            size_bytes: 59_707_625,
            sha256: Some(
                "422f1ae452ade6f30a004d7e5c6a43195e4433bc370bf23fac9cc591f01a8898".to_string(),
            ),
        },
        ModelInfo {
            filename: "ggml-tiny.bin".to_string(),
            display_name: "Tiny".to_string(),
            size_bytes: 77_691_713,
            sha256: Some(
                "be07e048e1e599ad46341c8d2a135645097a538221678b7acdd1b1919c6e1b21".to_string(),
            ),
        },
        ModelInfo {
            filename: "ggml-base.bin".to_string(),
            display_name: "Base".to_string(),
            size_bytes: 147_951_465,
            sha256: Some(
                "60ed5bc3dd14eea856493d334349b405782ddcaf0028d4b5df4088345fba2efe".to_string(),
            ),
        },
        ModelInfo {
            filename: "ggml-small.bin".to_string(),
            display_name: "Small".to_string(),
            size_bytes: 487_601_967,
            sha256: Some(
                "1be3a9b2063867b937e64e2ec7483364a79917e157fa98c5d94b5c1fffea987b".to_string(),
            ),
        },
    ]
}

pub fn find_model(filename: &str) -> Option<ModelInfo> {
    available_models()
        .into_iter()
        .find(|m| m.filename == filename)
}

/// Reject filenames that could escape the models directory.
fn sanitize_model_filename(filename: &str) -> Result<(), ModelError> {
    if filename.is_empty() {
        return Err(ModelError::InvalidFilename("empty filename".to_string()));
    }
    if filename.contains('/')
        || filename.contains('\\')
        || filename.contains("..")
        || filename.contains('\0')
    {
        return Err(ModelError::InvalidFilename(filename.to_string()));
    }
    Ok(())
}

fn verify_checksum(path: &Path, expected: &str) -> Result<(), ModelError> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher)?;
    let actual = format!("{:x}", hasher.finalize());
    if actual != expected {
        return Err(ModelError::ChecksumMismatch {
            file: path.display().to_string(),
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(())
}

pub fn is_downloaded(dir: &Path, filename: &str) -> bool {
    if sanitize_model_filename(filename).is_err() {
        return false;
    }
    dir.join(filename).exists()
}

/// Download a catalog model into `dir`: streamed to a `.downloading` temp
/// file, checksum-verified, then atomically renamed into place.
pub async fn download_model<F>(dir: &Path, filename: &str, progress: F) -> Result<PathBuf, ModelError>
where
    F: Fn(u64, u64) + Send + Sync,
{
    sanitize_model_filename(filename)?;
    let info = find_model(filename).ok_or_else(|| ModelError::UnknownModel(filename.to_string()))?;

    fs::create_dir_all(dir)?;
    let temp_path = dir.join(format!("{}.downloading", filename));
    let final_path = dir.join(filename);

    let url = format!("{HUGGINGFACE_BASE_URL}{filename}");
    let client = reqwest::Client::new();
    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| ModelError::Download(format!("{url}: {e}")))?;

    if !response.status().is_success() {
        return Err(ModelError::Download(format!(
            "{filename}: HTTP {}",
            response.status()
        )));
    }

    let total_size = response.content_length().unwrap_or(info.size_bytes);
    let mut downloaded: u64 = 0;

    let mut file = fs::File::create(&temp_path)?;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| ModelError::Download(e.to_string()))?;
        std::io::Write::write_all(&mut file, &chunk)?;
        downloaded += chunk.len() as u64;
        progress(downloaded, total_size);
    }
    drop(file);

    if let Some(ref expected) = info.sha256 {
        if let Err(e) = verify_checksum(&temp_path, expected) {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }
    }

    fs::rename(&temp_path, &final_path)?;
    Ok(final_path)
}

/// Resolve the configured model to an on-disk path, downloading it when
/// allowed. This is the one-time startup step: failures here are fatal and
/// surface before the service exists.
pub async fn resolve_model<F>(config: &WhisperConfig, progress: F) -> Result<PathBuf, ModelError>
where
    F: Fn(u64, u64) + Send + Sync,
{
    let model = config.model.as_str();

    // A path that already exists bypasses the catalog entirely.
    let as_path = Path::new(model);
    if as_path.exists() {
        return Ok(as_path.to_path_buf());
    }
    if model.contains('/') || model.contains('\\') {
        // Looks like a path but points nowhere; the catalog can't help.
        return Err(ModelError::NotDownloaded(model.to_string()));
    }

    sanitize_model_filename(model)?;
    let dir = config.models_dir();
    let path = dir.join(model);
    if path.exists() {
        return Ok(path);
    }

    if !config.auto_download {
        return Err(ModelError::NotDownloaded(model.to_string()));
    }

    if find_model(model).is_none() {
        return Err(ModelError::UnknownModel(model.to_string()));
    }

    tracing::info!("downloading model '{}' to {:?}", model, dir);
    download_model(&dir, model, progress).await
}
