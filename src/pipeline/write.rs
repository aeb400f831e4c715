//! Atomic output writes.
//!
//! Every artifact is written to `<path>.tmp` first and renamed into place, so
//! an interrupted run never leaves a truncated file under the final name.

use crate::error::PipelineError;
use std::path::{Path, PathBuf};

/// Write `contents` to `path`, creating parent directories as needed.
pub async fn write_atomic(path: &Path, contents: impl AsRef<[u8]>) -> Result<(), PipelineError> {
    let write_failed = |e: std::io::Error| PipelineError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_failed)?;
    }

    let tmp_path = tmp_path_for(path);
    tokio::fs::write(&tmp_path, contents.as_ref())
        .await
        .map_err(write_failed)?;

    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(write_failed(e));
    }

    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_creates_parents_and_leaves_no_tmp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("docs/out/Dilithium_en.md");
        write_atomic(&path, "# Abstract\n\nBody\n").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Abstract\n\nBody\n");
        assert!(!tmp_path_for(&path).exists());
    }

    #[tokio::test]
    async fn test_overwrites_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.json");
        write_atomic(&path, b"old").await.unwrap();
        write_atomic(&path, b"new").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn test_tmp_path_keeps_extension() {
        assert_eq!(
            tmp_path_for(Path::new("out/Dilithium_zh.docx")),
            PathBuf::from("out/Dilithium_zh.docx.tmp")
        );
    }
}
