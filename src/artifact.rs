//! Per-request image files
//!
//! Every generated image gets its own uniquely named file so concurrent
//! requests never overwrite each other. The file is removed when the
//! [`Artifact`] is dropped, which happens once the attachment has been sent.

use poise::serenity_prelude as serenity;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempPath;
use tracing::{debug, warn};

/// Length of the random part tempfile puts between prefix and suffix.
const RANDOM_SUFFIX_LEN: usize = 6;

pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `bytes` to a fresh `<stem>-XXXXXX.png` file.
    pub fn write(&self, stem: &str, bytes: &[u8]) -> anyhow::Result<Artifact> {
        std::fs::create_dir_all(&self.dir)?;

        let mut file = tempfile::Builder::new()
            .prefix(&format!("{}-", stem))
            .suffix(".png")
            .tempfile_in(&self.dir)?;
        file.write_all(bytes)?;
        file.flush()?;

        let path = file.into_temp_path();
        debug!("Wrote {} bytes to {:?}", bytes.len(), path);

        Ok(Artifact {
            path,
            file_name: format!("{}.png", stem),
        })
    }

    /// Remove files older than `max_age` left behind by an interrupted process.
    /// Only names produced by [`ArtifactStore::write`] for one of `stems` are touched.
    pub fn sweep(&self, stems: &[&str], max_age: Duration) -> anyhow::Result<usize> {
        if !self.dir.exists() {
            return Ok(0);
        }

        let threshold = SystemTime::now() - max_age;
        let mut removed = 0;

        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            let owned = entry
                .file_name()
                .to_str()
                .is_some_and(|name| is_artifact_name(name, stems));
            if !metadata.is_file() || !owned {
                continue;
            }
            if let Ok(modified) = metadata.modified() {
                if modified <= threshold {
                    match std::fs::remove_file(entry.path()) {
                        Ok(()) => {
                            debug!("Removed stale artifact {:?}", entry.path());
                            removed += 1;
                        }
                        Err(e) => warn!("Failed to delete stale artifact {:?}: {}", entry.path(), e),
                    }
                }
            }
        }
        Ok(removed)
    }
}

/// Matches `<stem>-XXXXXX.png` for one of `stems`.
fn is_artifact_name(name: &str, stems: &[&str]) -> bool {
    let Some(base) = name.strip_suffix(".png") else {
        return false;
    };
    stems.iter().any(|stem| {
        base.strip_prefix(stem)
            .and_then(|rest| rest.strip_prefix('-'))
            .is_some_and(|random| {
                random.len() == RANDOM_SUFFIX_LEN
                    && random.chars().all(|c| c.is_ascii_alphanumeric())
            })
    })
}

pub struct Artifact {
    path: TempPath,
    file_name: String,
}

impl Artifact {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name shown in Discord, e.g. `meme.png`.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Read the file back for upload.
    pub async fn attachment(&self) -> anyhow::Result<serenity::CreateAttachment> {
        let data = tokio::fs::read(self.path()).await?;
        Ok(serenity::CreateAttachment::bytes(data, self.file_name.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_creates_unique_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("nested"));

        let first = store.write("meme", b"first").unwrap();
        let second = store.write("meme", b"second").unwrap();

        assert_ne!(first.path(), second.path());
        assert_eq!(std::fs::read(first.path()).unwrap(), b"first");
        assert_eq!(std::fs::read(second.path()).unwrap(), b"second");
        assert_eq!(first.file_name(), "meme.png");

        let name = first.path().file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("meme-"));
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn test_drop_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());

        let artifact = store.write("generated", &[1, 2, 3]).unwrap();
        let path = artifact.path().to_path_buf();
        assert!(path.exists());

        drop(artifact);
        assert!(!path.exists());
    }

    const STEMS: [&str; 3] = ["meme", "generated", "autogen_meme"];

    #[test]
    fn test_sweep_removes_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("meme-abc123.png"), b"old").unwrap();
        std::fs::write(dir.path().join("autogen_meme-Zx9Qa1.png"), b"old").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"keep").unwrap();
        let store = ArtifactStore::new(dir.path());

        assert_eq!(store.sweep(&STEMS, Duration::from_secs(3600)).unwrap(), 0);
        assert_eq!(store.sweep(&STEMS, Duration::ZERO).unwrap(), 2);
        assert!(dir.path().join("notes.txt").exists());
        assert!(!dir.path().join("meme-abc123.png").exists());
        assert!(!dir.path().join("autogen_meme-Zx9Qa1.png").exists());
    }

    #[test]
    fn test_sweep_keeps_foreign_pngs() {
        let dir = tempfile::tempdir().unwrap();
        let foreign = [
            "holiday-photo.png",
            "photo.png",
            "meme.png",
            "meme-from-last-week.png",
            "generated-abc123.jpg",
        ];
        for name in foreign {
            std::fs::write(dir.path().join(name), b"keep").unwrap();
        }
        let store = ArtifactStore::new(dir.path());
        let ours = store.write("generated", b"ours").unwrap().path().to_path_buf();
        // The artifact is dropped at the end of the statement, leave a file under its name
        std::fs::write(&ours, b"leftover").unwrap();

        assert_eq!(store.sweep(&STEMS, Duration::ZERO).unwrap(), 1);
        assert!(!ours.exists());
        for name in foreign {
            assert!(dir.path().join(name).exists(), "{} was removed", name);
        }
    }

    #[test]
    fn test_artifact_name_matching() {
        assert!(is_artifact_name("meme-a1B2c3.png", &STEMS));
        assert!(is_artifact_name("generated-000000.png", &STEMS));
        assert!(!is_artifact_name("meme-a1B2c3.png", &["generated"]));
        assert!(!is_artifact_name("meme-a1B2c.png", &STEMS));
        assert!(!is_artifact_name("meme-a1B2c3.PNG", &STEMS));
        assert!(!is_artifact_name("selfie-a1B2c3.png", &STEMS));
    }

    #[test]
    fn test_sweep_missing_dir_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("never-created"));
        assert_eq!(store.sweep(&STEMS, Duration::ZERO).unwrap(), 0);
    }

    #[tokio::test]
    async fn test_attachment_reads_back_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());

        let artifact = store.write("autogen_meme", b"png-bytes").unwrap();
        let attachment = artifact.attachment().await.unwrap();

        assert_eq!(attachment.filename, "autogen_meme.png");
        assert_eq!(attachment.data, b"png-bytes");
    }
}
