//! Small filesystem helpers for the cache and session files

use std::io;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Whether `dir` can be created and written to
pub async fn dir_writable(dir: &Path) -> bool {
    let marker = dir.join(".momenic-write-test");
    async {
        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(&marker, b"ok").await?;
        tokio::fs::remove_file(&marker).await
    }
    .await
    .is_ok()
}

/// Directory holding `path`, `.` for a bare file name
pub fn parent_dir(path: &Path) -> PathBuf {
    match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(dir) => dir.to_path_buf(),
        None => PathBuf::from("."),
    }
}

/// Replace `path` with `contents`, readable only by the owner on unix
///
/// The data goes to a sibling temp file created with its final mode and is
/// renamed into place, so readers never see a partial or world-readable file.
pub async fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = parent_dir(path);
    tokio::fs::create_dir_all(&dir).await?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "momenic".to_string());
    let tmp = dir.join(format!(".{file_name}.{}.tmp", uuid::Uuid::new_v4().simple()));

    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let written = async {
        let mut file = options.open(&tmp).await?;
        file.write_all(contents).await?;
        file.sync_all().await?;
        tokio::fs::rename(&tmp, path).await
    }
    .await;

    if written.is_err() {
        let _ = tokio::fs::remove_file(&tmp).await;
    }
    written
}
