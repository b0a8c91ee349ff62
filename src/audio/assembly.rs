//! Digest assembly: excerpt extraction, fades, and concatenation.

use crate::error::{Result, UtdragError};
use crate::summary::{ClipRole, ClipSource, TimelineEntry};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument};

/// Extract one time range from the episode audio into an MP3 clip.
///
/// The excerpt is re-encoded (cuts land mid-frame too often for stream
/// copy), with an optional fade-in applied at the cut.
pub async fn extract_excerpt(
    source: &Path,
    dest: &Path,
    start_seconds: f64,
    end_seconds: f64,
    fade_seconds: Option<f64>,
) -> Result<()> {
    let length = end_seconds - start_seconds;
    if length <= 0.0 {
        return Err(UtdragError::Assembly(format!(
            "excerpt has non-positive length ({start_seconds}-{end_seconds})"
        )));
    }

    let mut command = Command::new("ffmpeg");
    command
        .arg("-ss").arg(format!("{:.3}", start_seconds))
        .arg("-i").arg(source)
        .arg("-t").arg(format!("{:.3}", length));

    if let Some(fade) = fade_seconds {
        command.arg("-af").arg(format!("afade=t=in:st=0:d={fade}"));
    }

    let result = command
        .arg("-codec:a").arg("libmp3lame")
        .arg("-qscale:a").arg("2")
        .arg("-y")
        .arg("-loglevel").arg("error")
        .arg(dest)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    match result {
        Ok(out) if out.status.success() => Ok(()),
        Ok(out) => {
            let err = String::from_utf8_lossy(&out.stderr);
            Err(UtdragError::Assembly(format!(
                "excerpt extraction failed: {err}"
            )))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(UtdragError::ToolNotFound("ffmpeg".into()))
        }
        Err(e) => Err(UtdragError::Assembly(format!("ffmpeg error: {e}"))),
    }
}

/// One line of a concat-demuxer filelist.
///
/// Single quotes inside the path must be closed, escaped, and reopened per
/// the demuxer's quoting rules.
fn filelist_entry(path: &Path) -> String {
    let escaped = path.display().to_string().replace('\'', r"'\''");
    format!("file '{}'", escaped)
}

/// Concatenate clips in order into one output file.
///
/// Uses the ffmpeg concat demuxer with stream copy; all inputs must share
/// one codec, which holds since every clip is MP3.
pub async fn concat_clips(clips: &[PathBuf], filelist_path: &Path, dest: &Path) -> Result<()> {
    let filelist = clips
        .iter()
        .map(|p| filelist_entry(p))
        .collect::<Vec<_>>()
        .join("\n");
    std::fs::write(filelist_path, filelist + "\n")?;

    let result = Command::new("ffmpeg")
        .arg("-f").arg("concat")
        .arg("-safe").arg("0")
        .arg("-i").arg(filelist_path)
        .arg("-c").arg("copy")
        .arg("-y")
        .arg("-loglevel").arg("error")
        .arg(dest)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    match result {
        Ok(out) if out.status.success() => Ok(()),
        Ok(out) => {
            let err = String::from_utf8_lossy(&out.stderr);
            Err(UtdragError::Assembly(format!("concat failed: {err}")))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(UtdragError::ToolNotFound("ffmpeg".into()))
        }
        Err(e) => Err(UtdragError::Assembly(format!("ffmpeg error: {e}"))),
    }
}

/// Probe the produced file to confirm it is readable audio.
pub async fn verify_audio(path: &Path) -> Result<()> {
    let duration = super::probe_duration(path).await.map_err(|e| {
        UtdragError::Assembly(format!("output {} is not readable: {e}", path.display()))
    })?;

    if duration <= 0.0 {
        return Err(UtdragError::Assembly(format!(
            "output {} has zero duration",
            path.display()
        )));
    }

    Ok(())
}

/// Materialize a clip timeline into one concatenated output file.
///
/// Excerpt entries are cut from the episode audio into the session
/// directory; file entries (intro, separator) are used as-is. The caller
/// owns cleanup of the session directory.
#[instrument(skip_all, fields(session_id = %session_id, entries = timeline.len()))]
pub async fn assemble_timeline(
    timeline: &[TimelineEntry],
    episode: &Path,
    session_dir: &Path,
    session_id: &str,
    output: &Path,
    fade_seconds: f64,
) -> Result<PathBuf> {
    std::fs::create_dir_all(session_dir)?;

    let mut clips = Vec::with_capacity(timeline.len());
    for entry in timeline {
        match &entry.source {
            ClipSource::File(path) => clips.push(path.clone()),
            ClipSource::Excerpt {
                start_seconds,
                end_seconds,
            } => {
                debug_assert_eq!(entry.role, ClipRole::Segment);
                let clip_path =
                    session_dir.join(format!("{}_clip_{:03}.mp3", session_id, entry.order));
                let fade = entry.fade_in.then_some(fade_seconds);
                extract_excerpt(episode, &clip_path, *start_seconds, *end_seconds, fade).await?;
                debug!(
                    "Extracted {:.1}s-{:.1}s to {}",
                    start_seconds,
                    end_seconds,
                    clip_path.display()
                );
                clips.push(clip_path);
            }
        }
    }

    let filelist_path = session_dir.join(format!("{}_filelist.txt", session_id));
    concat_clips(&clips, &filelist_path, output).await?;
    verify_audio(output).await?;

    info!("Assembled {} clips into {}", clips.len(), output.display());
    Ok(output.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filelist_entry_plain() {
        assert_eq!(
            filelist_entry(Path::new("/tmp/utdrag/abc_clip_001.mp3")),
            "file '/tmp/utdrag/abc_clip_001.mp3'"
        );
    }

    #[test]
    fn test_filelist_entry_escapes_quotes() {
        assert_eq!(
            filelist_entry(Path::new("/tmp/it's.mp3")),
            r"file '/tmp/it'\''s.mp3'"
        );
    }

    #[tokio::test]
    async fn test_extract_rejects_empty_range() {
        let result = extract_excerpt(
            Path::new("in.mp3"),
            Path::new("out.mp3"),
            10.0,
            10.0,
            None,
        )
        .await;
        assert!(matches!(result, Err(UtdragError::Assembly(_))));
    }
}
