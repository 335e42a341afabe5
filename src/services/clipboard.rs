//! Clipboard operations.

use anyhow::Result;

/// Read text from the system clipboard, if any.
pub fn read_text() -> Result<Option<String>> {
    let mut clipboard = arboard::Clipboard::new()?;
    match clipboard.get_text() {
        Ok(text) => Ok(Some(text)),
        Err(arboard::Error::ContentNotAvailable) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Filter captured clipboard content down to savable text.
///
/// Whitespace-only content is treated the same as an empty clipboard; the
/// text itself is passed through unmodified.
pub fn usable_text(text: Option<String>) -> Option<String> {
    let text = text?;
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usable_text_rejects_empty_and_whitespace() {
        assert_eq!(usable_text(None), None);
        assert_eq!(usable_text(Some(String::new())), None);
        assert_eq!(usable_text(Some("  \n\t ".to_string())), None);
    }

    #[test]
    fn test_usable_text_passes_content_through_unmodified() {
        assert_eq!(
            usable_text(Some("  padded content  ".to_string())),
            Some("  padded content  ".to_string())
        );
    }
}
