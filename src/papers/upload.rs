use super::error::UploadError;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;
use tracing::warn;

/// Largest file the repository accepts (5 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// A locally selected file waiting to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    file_name: String,
    mime_type: String,
    size: u64,
    data: Vec<u8>,
}

impl UploadCandidate {
    pub fn new(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        let file_name = file_name.into();
        Self {
            mime_type: guess_mime_type(&file_name).to_string(),
            size: data.len() as u64,
            file_name,
            data,
        }
    }

    /// Select a file from disk.
    ///
    /// Oversized files are measured but not read; they can never be sent.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("paper.pdf")
            .to_string();
        let meta = fs::metadata(path)
            .await
            .with_context(|| format!("Failed to stat {}", path.display()))?;
        if !meta.is_file() {
            anyhow::bail!("{} is not a file", path.display());
        }

        let mime_type = guess_mime_type(&file_name);
        if mime_type != "application/pdf" {
            warn!(file = %file_name, "selected file does not look like a PDF");
        }

        if meta.len() > MAX_UPLOAD_BYTES {
            return Ok(Self {
                mime_type: mime_type.to_string(),
                size: meta.len(),
                file_name,
                data: Vec::new(),
            });
        }

        let data = fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Self::new(file_name, data))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn exceeds_limit(&self) -> bool {
        self.size > MAX_UPLOAD_BYTES
    }

    /// Size in MB with two decimals, e.g. `"1.50"`.
    pub fn size_mb(&self) -> String {
        format!("{:.2}", self.size as f64 / BYTES_PER_MB)
    }

    /// Status line shown right after the file is picked.
    pub fn selection_message(&self) -> String {
        if self.exceeds_limit() {
            format!(
                "File too large ({} MB). Max 5 MB. Please compress it.",
                self.size_mb()
            )
        } else {
            format!("Selected file: {} ({} MB)", self.file_name, self.size_mb())
        }
    }
}

/// Check the upload preconditions on the current selection.
pub fn check_candidate(file: Option<&UploadCandidate>) -> Result<&UploadCandidate, UploadError> {
    let file = file.ok_or(UploadError::NoFile)?;
    if file.exceeds_limit() {
        return Err(UploadError::TooLarge { size: file.size() });
    }
    Ok(file)
}

/// Guess the MIME type of the `file` part from its extension.
pub fn guess_mime_type(filename: &str) -> &'static str {
    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();
    match ext.as_str() {
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_is_reported_in_mb_with_two_decimals() {
        let file = UploadCandidate::new("dsa.pdf", vec![0; 1_572_864]);
        assert_eq!(file.size_mb(), "1.50");
        assert_eq!(file.selection_message(), "Selected file: dsa.pdf (1.50 MB)");
        assert!(!file.exceeds_limit());
    }

    #[test]
    fn exactly_five_mib_is_allowed() {
        let file = UploadCandidate::new("big.pdf", vec![0; MAX_UPLOAD_BYTES as usize]);
        assert!(!file.exceeds_limit());
        assert!(check_candidate(Some(&file)).is_ok());
    }

    #[test]
    fn one_byte_over_is_too_large() {
        let file = UploadCandidate::new("big.pdf", vec![0; MAX_UPLOAD_BYTES as usize + 1]);
        assert!(file.exceeds_limit());
        assert_eq!(
            file.selection_message(),
            "File too large (5.00 MB). Max 5 MB. Please compress it."
        );
        assert!(matches!(
            check_candidate(Some(&file)),
            Err(UploadError::TooLarge { .. })
        ));
    }

    #[test]
    fn missing_file_fails_check() {
        assert!(matches!(check_candidate(None), Err(UploadError::NoFile)));
    }

    #[test]
    fn mime_type_from_extension() {
        assert_eq!(guess_mime_type("Paper.PDF"), "application/pdf");
        assert_eq!(guess_mime_type("notes.docx"), "application/octet-stream");
        assert_eq!(guess_mime_type("noext"), "application/octet-stream");
    }

    #[tokio::test]
    async fn from_path_reads_small_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("os-2021.pdf");
        std::fs::write(&path, b"%PDF-1.4 test").unwrap();

        let file = UploadCandidate::from_path(&path).await.unwrap();
        assert_eq!(file.file_name(), "os-2021.pdf");
        assert_eq!(file.mime_type(), "application/pdf");
        assert_eq!(file.size(), 13);
        assert_eq!(file.data(), b"%PDF-1.4 test");
    }

    #[tokio::test]
    async fn from_path_measures_oversized_files_without_reading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.pdf");
        let handle = std::fs::File::create(&path).unwrap();
        handle.set_len(MAX_UPLOAD_BYTES + 10).unwrap();

        let file = UploadCandidate::from_path(&path).await.unwrap();
        assert_eq!(file.size(), MAX_UPLOAD_BYTES + 10);
        assert!(file.exceeds_limit());
        assert!(file.data().is_empty());
    }

    #[tokio::test]
    async fn from_path_rejects_directories() {
        let dir = tempfile::tempdir().unwrap();
        assert!(UploadCandidate::from_path(dir.path()).await.is_err());
    }
}
