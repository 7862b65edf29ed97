use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR engine not available: {0}")]
    EngineMissing(String),
    #[error("Unreadable image: {0}")]
    Unreadable(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type OcrResult<T> = Result<T, OcrError>;

/// Optical character recognition over scanned images.
///
/// Engines may return low-quality text without signaling failure; garbled
/// output is a data-quality problem for the pipeline, not an error.
#[async_trait::async_trait]
pub trait OcrEngine: Send + Sync {
    fn name(&self) -> &str;

    async fn recognize(&self, image: &[u8]) -> OcrResult<String>;
}

/// Counter feeding unique scratch-file names for concurrent recognitions.
static SCRATCH_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Drives the external `tesseract` binary.
///
/// The binary is resolved from `PATH` at recognition time (or from an
/// explicit override), the image is staged to a scratch file, and text is
/// read back from stdout. `--psm 6` treats the page as a single uniform
/// block, which suits structured documents like invoices and resumes.
pub struct TesseractEngine {
    binary: Option<PathBuf>,
    oem: u8,
    psm: u8,
}

impl TesseractEngine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            binary: None,
            oem: 3,
            psm: 6,
        }
    }

    #[must_use]
    pub fn with_binary(mut self, path: PathBuf) -> Self {
        self.binary = Some(path);
        self
    }

    fn locate(&self) -> OcrResult<PathBuf> {
        match &self.binary {
            Some(path) => Ok(path.clone()),
            None => which::which("tesseract").map_err(|e| OcrError::EngineMissing(e.to_string())),
        }
    }

    fn scratch_path() -> PathBuf {
        let ordinal = SCRATCH_COUNTER.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!(
            "doctriage-ocr-{}-{ordinal}.img",
            std::process::id()
        ))
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl OcrEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn recognize(&self, image: &[u8]) -> OcrResult<String> {
        let binary = self.locate()?;
        let scratch = Self::scratch_path();

        tokio::fs::write(&scratch, image).await?;

        let output = tokio::process::Command::new(&binary)
            .arg(&scratch)
            .arg("stdout")
            .args(["--oem", &self.oem.to_string()])
            .args(["--psm", &self.psm.to_string()])
            .output()
            .await;

        let _ = tokio::fs::remove_file(&scratch).await;

        let output = output?;
        if !output.status.success() {
            return Err(OcrError::Unreadable(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
