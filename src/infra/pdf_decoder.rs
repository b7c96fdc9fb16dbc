use crate::app::ports::DocumentDecoderPort;
use std::panic::{self, AssertUnwindSafe};

/// Text extraction via `pdf-extract`; layout and graphics are discarded.
///
/// `pdf_extract` can panic on malformed documents instead of returning an
/// error, so extraction runs behind `catch_unwind`.
pub struct PdfTextDecoder;

impl DocumentDecoderPort for PdfTextDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<String, String> {
        if !bytes.starts_with(b"%PDF") {
            return Err("payload is not a PDF document".to_string());
        }
        match panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes))) {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(format!("PDF extraction failed: {e}")),
            Err(_) => Err("PDF extraction panicked (malformed document)".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_pdf_payload() {
        let err = PdfTextDecoder.decode(b"<html>Not Found</html>").unwrap_err();
        assert!(err.contains("not a PDF"));
    }

    #[test]
    fn test_truncated_pdf_is_an_error() {
        assert!(PdfTextDecoder.decode(b"%PDF-1.7\n%%EOF").is_err());
    }
}
