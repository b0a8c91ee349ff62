//! Duration probing and chunking of source audio.

use crate::error::{Result, UtdragError};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument};

/// Query the duration of an audio file in seconds using ffprobe.
pub async fn probe_duration(path: &Path) -> Result<f64> {
    let result = Command::new("ffprobe")
        .arg("-v").arg("quiet")
        .arg("-print_format").arg("json")
        .arg("-show_format")
        .arg(path)
        .output()
        .await;

    let output = match result {
        Ok(o) => o,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(UtdragError::ToolNotFound("ffprobe".into()));
        }
        Err(e) => {
            return Err(UtdragError::ToolFailed(format!("ffprobe failed: {e}")));
        }
    };

    if !output.status.success() {
        return Err(UtdragError::ToolFailed(format!(
            "ffprobe could not read {}",
            path.display()
        )));
    }

    let json_str = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&json_str)
        .map_err(|_| UtdragError::ToolFailed("Invalid ffprobe output".into()))?;

    parsed["format"]["duration"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| UtdragError::ToolFailed("Could not determine audio duration".into()))
}

/// Split a long audio file into chunks for transcription.
///
/// Returns (chunk_path, offset_seconds) pairs in time order. Audio shorter
/// than one chunk is returned as-is without copying.
#[instrument(skip_all)]
pub async fn split_audio(
    source: &Path,
    output_dir: &Path,
    chunk_seconds: u32,
) -> Result<Vec<(PathBuf, f64)>> {
    std::fs::create_dir_all(output_dir)?;

    let total_duration = probe_duration(source).await?;
    let chunk_len = chunk_seconds as f64;

    if total_duration <= chunk_len {
        return Ok(vec![(source.to_path_buf(), 0.0)]);
    }

    let base_name = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("audio");

    let mut chunks = Vec::new();
    let mut offset = 0.0;
    let mut idx = 0u32;

    while offset < total_duration {
        let chunk_path = output_dir.join(format!("{}_{:04}.mp3", base_name, idx));
        let chunk_duration = chunk_len.min(total_duration - offset);

        cut_chunk(source, &chunk_path, offset, chunk_duration).await?;

        debug!("Created chunk {} at offset {:.1}s", idx, offset);
        chunks.push((chunk_path, offset));

        offset += chunk_len;
        idx += 1;
    }

    info!("Split audio into {} chunks", chunks.len());
    Ok(chunks)
}

/// Cut one chunk out of the source, preferring stream copy.
async fn cut_chunk(source: &Path, dest: &Path, start: f64, length: f64) -> Result<()> {
    let copy_status = Command::new("ffmpeg")
        .arg("-ss").arg(format!("{:.3}", start))
        .arg("-i").arg(source)
        .arg("-t").arg(format!("{:.3}", length))
        .arg("-c").arg("copy")
        .arg("-y")
        .arg("-loglevel").arg("error")
        .arg(dest)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;

    if let Ok(status) = copy_status {
        if status.success() && dest.exists() {
            return Ok(());
        }
    }

    // Stream copy can fail on some containers; re-encode instead.
    let encode_result = Command::new("ffmpeg")
        .arg("-ss").arg(format!("{:.3}", start))
        .arg("-i").arg(source)
        .arg("-t").arg(format!("{:.3}", length))
        .arg("-codec:a").arg("libmp3lame")
        .arg("-qscale:a").arg("2")
        .arg("-y")
        .arg("-loglevel").arg("error")
        .arg(dest)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    match encode_result {
        Ok(out) if out.status.success() => Ok(()),
        Ok(out) => {
            let err = String::from_utf8_lossy(&out.stderr);
            Err(UtdragError::ToolFailed(format!(
                "Chunk extraction failed: {err}"
            )))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(UtdragError::ToolNotFound("ffmpeg".into()))
        }
        Err(e) => Err(UtdragError::ToolFailed(format!("ffmpeg error: {e}"))),
    }
}
