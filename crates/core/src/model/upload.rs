use std::fmt;
use std::path::Path;

use thiserror::Error;

/// Maximum number of files per upload kind.
pub const MAX_FILES_PER_KIND: usize = 10;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UploadError {
    #[error("unsupported file type for {file_name}: {mime}")]
    UnsupportedType { file_name: String, mime: String },

    #[error("at most 10 {kind} files are allowed (have {current}, adding {adding})")]
    LimitExceeded {
        kind: UploadKind,
        current: usize,
        adding: usize,
    },

    #[error("file index {index} is out of range")]
    IndexOutOfRange { index: usize },
}

//
// ─── TYPES ─────────────────────────────────────────────────────────────────────
//

/// Which slot of the analysis form a file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadKind {
    Papers,
    Syllabus,
}

impl UploadKind {
    /// Multipart field name expected by the analysis endpoint.
    #[must_use]
    pub fn field_name(self) -> &'static str {
        match self {
            Self::Papers => "papers",
            Self::Syllabus => "syllabus",
        }
    }
}

impl fmt::Display for UploadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Papers => f.write_str("question paper"),
            Self::Syllabus => f.write_str("syllabus"),
        }
    }
}

/// A file picked for upload, held in memory until submission.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    file_name: String,
    mime: String,
    bytes: Vec<u8>,
}

impl UploadFile {
    #[must_use]
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Build a file whose MIME type is inferred from the name's extension.
    #[must_use]
    pub fn guessing_mime(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = mime_from_extension(Path::new(&file_name)).to_string();
        Self {
            file_name,
            mime,
            bytes,
        }
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn mime(&self) -> &str {
        &self.mime
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Check the file against the accepted types (images, PDF, DOCX).
    ///
    /// # Errors
    ///
    /// Returns `UploadError::UnsupportedType` for anything else.
    pub fn validate_type(&self) -> Result<(), UploadError> {
        if is_accepted_mime(&self.mime) {
            Ok(())
        } else {
            Err(UploadError::UnsupportedType {
                file_name: self.file_name.clone(),
                mime: self.mime.clone(),
            })
        }
    }
}

impl fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadFile")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[must_use]
pub fn is_accepted_mime(mime: &str) -> bool {
    mime.starts_with("image/") || mime == MIME_PDF || mime == MIME_DOCX
}

/// Best-effort MIME type from a path's extension.
#[must_use]
pub fn mime_from_extension(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("pdf") => MIME_PDF,
        Some("docx") => MIME_DOCX,
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("txt") => "text/plain",
        Some("doc") => "application/msword",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_images_pdf_and_docx() {
        assert!(is_accepted_mime("image/png"));
        assert!(is_accepted_mime("image/heic"));
        assert!(is_accepted_mime(MIME_PDF));
        assert!(is_accepted_mime(MIME_DOCX));
    }

    #[test]
    fn rejects_legacy_word_and_text() {
        assert!(!is_accepted_mime("application/msword"));
        assert!(!is_accepted_mime("text/plain"));
    }

    #[test]
    fn mime_guess_is_case_insensitive() {
        let f = UploadFile::guessing_mime("PAPER.PDF", vec![1, 2, 3]);
        assert_eq!(f.mime(), MIME_PDF);
        assert!(f.validate_type().is_ok());

        let f = UploadFile::guessing_mime("notes.txt", Vec::new());
        let err = f.validate_type().unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedType { .. }));
    }
}
