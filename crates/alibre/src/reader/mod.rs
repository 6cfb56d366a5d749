//! Reader - turns supported documents into displayable plain text
//!
//! Dispatch is on the stored format label. Formats without an extractor
//! (PDF, EPUB, Kindle) yield a fixed explanatory message instead of text.

pub mod error;
pub mod fb2;
pub mod html;
pub mod rtf;
pub mod text;

pub use error::{ReaderError, Result};
pub use fb2::fb2_to_text;
pub use html::html_to_text;
pub use rtf::strip_rtf;
pub use text::read_text_file;

use crate::scout::BookFormat;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const PDF_CONTENT_MESSAGE: &str = "PDF content cannot be displayed as text. Use PDF viewer.";
pub const KINDLE_CONTENT_MESSAGE: &str = "This format requires specialized reader support.";
pub const EPUB_CONTENT_MESSAGE: &str = "EPUB format detected. Basic text extraction not yet implemented.\n\n\
     To read EPUB files, this app would need additional libraries for proper EPUB parsing.";

/// Extract the displayable text of a document.
///
/// `format` is matched case-insensitively against the supported extensions.
pub fn read_document(path: &Path, format: &str) -> Result<String> {
    debug!(path = %path.display(), format, "Reading document");
    let Some(format) = BookFormat::parse(format) else {
        return Ok(format!("Unsupported format: {format}"));
    };
    match format {
        BookFormat::Txt => read_text_file(path),
        BookFormat::Html | BookFormat::Htm => html_to_text(&read_text_file(path)?),
        BookFormat::Fb2 => fb2_to_text(&read_text_file(path)?),
        BookFormat::Rtf => Ok(strip_rtf(&read_text_file(path)?)),
        BookFormat::Epub => Ok(EPUB_CONTENT_MESSAGE.to_string()),
        BookFormat::Pdf => Ok(PDF_CONTENT_MESSAGE.to_string()),
        BookFormat::Mobi | BookFormat::Azw | BookFormat::Azw3 => {
            Ok(KINDLE_CONTENT_MESSAGE.to_string())
        }
    }
}

/// [`read_document`] on the blocking thread pool.
pub async fn read_document_async(path: PathBuf, format: String) -> Result<String> {
    tokio::task::spawn_blocking(move || read_document(&path, &format))
        .await
        .map_err(|err| ReaderError::Background(err.to_string()))?
}

pub fn supports_pdf_viewing(format: &str) -> bool {
    BookFormat::parse(format) == Some(BookFormat::Pdf)
}

/// Formats [`read_document`] extracts real text from.
pub fn supports_text_reading(format: &str) -> bool {
    matches!(
        BookFormat::parse(format),
        Some(BookFormat::Txt | BookFormat::Html | BookFormat::Htm | BookFormat::Fb2 | BookFormat::Rtf)
    )
}

/// Why a format cannot be shown as text.
pub fn unsupported_format_message(format: &str) -> String {
    match BookFormat::parse(format) {
        Some(BookFormat::Epub) => {
            "EPUB support requires additional libraries. Basic text extraction is limited."
                .to_string()
        }
        Some(BookFormat::Mobi | BookFormat::Azw | BookFormat::Azw3) => {
            "Kindle formats require specialized reader libraries.".to_string()
        }
        Some(BookFormat::Pdf) => {
            "PDF files should be viewed using the built-in PDF viewer.".to_string()
        }
        _ => format!("Format '{format}' is not yet supported for text reading."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_dispatch_extracts_text_formats() {
        let tmp = TempDir::new().unwrap();

        let txt = write(&tmp, "a.txt", "Plain\ntext\n");
        assert_eq!(read_document(&txt, "TXT").unwrap(), "Plain\ntext\n");

        let html = write(&tmp, "b.htm", "<title>T</title><p>Body</p>");
        assert_eq!(read_document(&html, "htm").unwrap(), "T\n\nBody");

        let rtf = write(&tmp, "c.rtf", r"{\rtf1 Hello\par World}");
        assert_eq!(read_document(&rtf, "Rtf").unwrap(), "Hello World");

        let fb2 = write(&tmp, "d.fb2", "<FictionBook><body><p>Story</p></body></FictionBook>");
        assert_eq!(read_document(&fb2, "FB2").unwrap(), "Story");
    }

    #[test]
    fn test_placeholder_formats_do_not_touch_the_file() {
        let missing = Path::new("/nonexistent/book");
        assert_eq!(read_document(missing, "PDF").unwrap(), PDF_CONTENT_MESSAGE);
        assert_eq!(read_document(missing, "EPUB").unwrap(), EPUB_CONTENT_MESSAGE);
        for kindle in ["MOBI", "AZW", "AZW3"] {
            assert_eq!(read_document(missing, kindle).unwrap(), KINDLE_CONTENT_MESSAGE);
        }
        assert_eq!(read_document(missing, "DJVU").unwrap(), "Unsupported format: DJVU");
    }

    #[test]
    fn test_missing_text_file_is_an_error() {
        let err = read_document(Path::new("/nonexistent/book.txt"), "TXT").unwrap_err();
        assert!(matches!(err, ReaderError::Io { .. }));
    }

    #[test]
    fn test_capabilities() {
        for format in ["TXT", "html", "HTM", "fb2", "RTF"] {
            assert!(supports_text_reading(format), "{format}");
        }
        for format in ["PDF", "EPUB", "MOBI", "AZW", "AZW3", "DOC"] {
            assert!(!supports_text_reading(format), "{format}");
        }
        assert!(supports_pdf_viewing("pdf"));
        assert!(!supports_pdf_viewing("TXT"));
    }

    #[test]
    fn test_unsupported_format_messages() {
        assert!(unsupported_format_message("EPUB").starts_with("EPUB support"));
        assert!(unsupported_format_message("azw3").starts_with("Kindle formats"));
        assert!(unsupported_format_message("PDF").contains("PDF viewer"));
        assert_eq!(
            unsupported_format_message("DOC"),
            "Format 'DOC' is not yet supported for text reading."
        );
    }

    #[tokio::test]
    async fn test_read_document_async() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, "a.txt", "async text");
        let text = read_document_async(path, "TXT".to_string()).await.unwrap();
        assert_eq!(text, "async text");
    }
}
