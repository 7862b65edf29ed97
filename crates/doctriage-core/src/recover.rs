use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ocr::{OcrEngine, OcrError};

#[derive(Debug, Error)]
pub enum RecoveryError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Corrupt document: {0}")]
    CorruptDocument(String),
    #[error("Encoding error: {0}")]
    Encoding(String),
    #[error("OCR failed: {0}")]
    Ocr(#[from] OcrError),
}

pub type RecoveryResult<T> = Result<T, RecoveryError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    PlainText,
    Pdf,
    Docx,
    Png,
    Jpeg,
    Tiff,
}

impl DocumentFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "txt" | "text" => Some(Self::PlainText),
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "tif" | "tiff" => Some(Self::Tiff),
            _ => None,
        }
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "text/plain" => Some(Self::PlainText),
            "application/pdf" => Some(Self::Pdf),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                Some(Self::Docx)
            }
            "image/png" => Some(Self::Png),
            "image/jpeg" => Some(Self::Jpeg),
            "image/tiff" => Some(Self::Tiff),
            _ => None,
        }
    }

    /// Image formats carry no embedded text; they are routed to OCR
    /// instead of a container parser.
    pub fn is_image(&self) -> bool {
        matches!(self, Self::Png | Self::Jpeg | Self::Tiff)
    }
}

/// Recovers plain text from a container format's bytes.
#[async_trait::async_trait]
pub trait TextRecovery: Send + Sync {
    fn supported_formats(&self) -> &[DocumentFormat];

    fn can_recover(&self, format: DocumentFormat) -> bool {
        self.supported_formats().contains(&format)
    }

    async fn recover_bytes(&self, data: &[u8], format: DocumentFormat) -> RecoveryResult<String>;
}

pub struct PlainTextRecovery;

#[async_trait::async_trait]
impl TextRecovery for PlainTextRecovery {
    fn supported_formats(&self) -> &[DocumentFormat] {
        &[DocumentFormat::PlainText]
    }

    async fn recover_bytes(&self, data: &[u8], _format: DocumentFormat) -> RecoveryResult<String> {
        String::from_utf8(data.to_vec()).map_err(|e| RecoveryError::Encoding(e.to_string()))
    }
}

pub struct PdfRecovery;

#[async_trait::async_trait]
impl TextRecovery for PdfRecovery {
    fn supported_formats(&self) -> &[DocumentFormat] {
        &[DocumentFormat::Pdf]
    }

    async fn recover_bytes(&self, data: &[u8], _format: DocumentFormat) -> RecoveryResult<String> {
        let document = lopdf::Document::load_from(std::io::Cursor::new(data))
            .map_err(|e| RecoveryError::CorruptDocument(e.to_string()))?;

        let mut text = String::new();
        for (page_number, _) in document.get_pages() {
            // Pages without recoverable text are skipped rather than
            // failing the whole document.
            if let Ok(content) = document.extract_text(&[page_number]) {
                text.push_str(&content);
                text.push('\n');
            }
        }

        Ok(text)
    }
}

pub struct DocxRecovery;

impl DocxRecovery {
    fn paragraph_text(paragraph: &docx_rs::Paragraph, out: &mut String) {
        for child in &paragraph.children {
            if let docx_rs::ParagraphChild::Run(run) = child {
                for piece in &run.children {
                    match piece {
                        docx_rs::RunChild::Text(text) => out.push_str(&text.text),
                        docx_rs::RunChild::Tab(_) => out.push('\t'),
                        docx_rs::RunChild::Break(_) => out.push('\n'),
                        _ => {}
                    }
                }
            }
        }
        out.push('\n');
    }

    fn table_text(table: &docx_rs::Table, out: &mut String) {
        for docx_rs::TableChild::TableRow(row) in &table.rows {
            for docx_rs::TableRowChild::TableCell(cell) in &row.cells {
                for content in &cell.children {
                    if let docx_rs::TableCellContent::Paragraph(paragraph) = content {
                        Self::paragraph_text(paragraph, out);
                    }
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl TextRecovery for DocxRecovery {
    fn supported_formats(&self) -> &[DocumentFormat] {
        &[DocumentFormat::Docx]
    }

    async fn recover_bytes(&self, data: &[u8], _format: DocumentFormat) -> RecoveryResult<String> {
        let docx =
            docx_rs::read_docx(data).map_err(|e| RecoveryError::CorruptDocument(e.to_string()))?;

        let mut text = String::new();
        for child in &docx.document.children {
            match child {
                docx_rs::DocumentChild::Paragraph(paragraph) => {
                    Self::paragraph_text(paragraph, &mut text);
                }
                docx_rs::DocumentChild::Table(table) => Self::table_text(table, &mut text),
                _ => {}
            }
        }

        Ok(text)
    }
}

/// Routes bytes to the recoverer matching the declared format; image
/// formats go to the OCR engine instead.
pub struct CompositeRecovery {
    recoverers: Vec<Box<dyn TextRecovery>>,
    ocr: Box<dyn OcrEngine>,
}

impl CompositeRecovery {
    #[must_use]
    pub fn new(ocr: Box<dyn OcrEngine>) -> Self {
        Self {
            recoverers: Vec::new(),
            ocr,
        }
    }

    #[must_use]
    pub fn with_recoverer(mut self, recoverer: Box<dyn TextRecovery>) -> Self {
        self.recoverers.push(recoverer);
        self
    }

    #[must_use]
    pub fn with_default_recoverers(ocr: Box<dyn OcrEngine>) -> Self {
        Self::new(ocr)
            .with_recoverer(Box::new(PlainTextRecovery))
            .with_recoverer(Box::new(PdfRecovery))
            .with_recoverer(Box::new(DocxRecovery))
    }

    fn find_recoverer(&self, format: DocumentFormat) -> Option<&dyn TextRecovery> {
        self.recoverers
            .iter()
            .find(|r| r.can_recover(format))
            .map(|r| r.as_ref())
    }

    pub async fn recover_bytes(
        &self,
        data: &[u8],
        format: DocumentFormat,
    ) -> RecoveryResult<String> {
        if format.is_image() {
            tracing::debug!(engine = self.ocr.name(), ?format, "routing image to OCR");
            return Ok(self.ocr.recognize(data).await?);
        }

        let recoverer = self
            .find_recoverer(format)
            .ok_or_else(|| RecoveryError::UnsupportedFormat(format!("{format:?}")))?;

        recoverer.recover_bytes(data, format).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedOcr(&'static str);

    #[async_trait::async_trait]
    impl OcrEngine for FixedOcr {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn recognize(&self, _image: &[u8]) -> Result<String, OcrError> {
            Ok(self.0.to_string())
        }
    }

    fn composite() -> CompositeRecovery {
        CompositeRecovery::with_default_recoverers(Box::new(FixedOcr("scanned text")))
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DocumentFormat::from_extension("PDF"), Some(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_extension("txt"), Some(DocumentFormat::PlainText));
        assert_eq!(DocumentFormat::from_extension("jpeg"), Some(DocumentFormat::Jpeg));
        assert_eq!(DocumentFormat::from_extension("odt"), None);
    }

    #[test]
    fn test_format_from_mime() {
        assert_eq!(
            DocumentFormat::from_mime("application/pdf"),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(
            DocumentFormat::from_mime("image/png"),
            Some(DocumentFormat::Png)
        );
        assert_eq!(DocumentFormat::from_mime("video/mp4"), None);
    }

    #[tokio::test]
    async fn test_plain_text_recovery() {
        let text = composite()
            .recover_bytes(b"Invoice total: $5", DocumentFormat::PlainText)
            .await
            .unwrap();
        assert_eq!(text, "Invoice total: $5");
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_encoding_error() {
        let result = composite()
            .recover_bytes(&[0xff, 0xfe, 0x00], DocumentFormat::PlainText)
            .await;
        assert!(matches!(result, Err(RecoveryError::Encoding(_))));
    }

    #[tokio::test]
    async fn test_corrupt_pdf_rejected() {
        let result = composite()
            .recover_bytes(b"definitely not a pdf", DocumentFormat::Pdf)
            .await;
        assert!(matches!(result, Err(RecoveryError::CorruptDocument(_))));
    }

    #[tokio::test]
    async fn test_corrupt_docx_rejected() {
        let result = composite()
            .recover_bytes(b"not a zip archive", DocumentFormat::Docx)
            .await;
        assert!(matches!(result, Err(RecoveryError::CorruptDocument(_))));
    }

    #[tokio::test]
    async fn test_images_route_to_ocr() {
        let text = composite()
            .recover_bytes(b"\x89PNG fake bytes", DocumentFormat::Png)
            .await
            .unwrap();
        assert_eq!(text, "scanned text");
    }

    #[tokio::test]
    async fn test_unregistered_format_unsupported() {
        let bare = CompositeRecovery::new(Box::new(FixedOcr("")));
        let result = bare.recover_bytes(b"hello", DocumentFormat::PlainText).await;
        assert!(matches!(result, Err(RecoveryError::UnsupportedFormat(_))));
    }
}
