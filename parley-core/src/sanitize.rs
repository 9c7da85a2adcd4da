//! Markup-stripping text normalization.
//!
//! Every user-supplied string passes through [`strip`] before validation.

use ammonia::clean;
use thiserror::Error;

/// Normalization failure
#[derive(Error, Debug)]
pub enum SanitizeError {
    #[error("input contains control characters")]
    ControlCharacters,
}

/// Strip markup from raw input and trim surrounding whitespace.
///
/// Entities are decoded, every tag is removed, and input carrying control
/// characters (other than newlines, tabs, and carriage returns) is rejected
/// as malformed.
pub fn strip(raw: &str) -> Result<String, SanitizeError> {
    if raw
        .chars()
        .any(|c| c.is_control() && c != '\n' && c != '\t' && c != '\r')
    {
        return Err(SanitizeError::ControlCharacters);
    }

    let cleaned = clean(raw);

    // ammonia leaves a safe HTML subset behind; drop the remaining tags too.
    let mut result = String::with_capacity(cleaned.len());
    let mut in_tag = false;
    for ch in cleaned.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }

    Ok(result.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_plain_text() {
        assert_eq!(strip("oi galera").unwrap(), "oi galera");
    }

    #[test]
    fn test_strip_trims_whitespace() {
        assert_eq!(strip("  Ana  ").unwrap(), "Ana");
    }

    #[test]
    fn test_strip_removes_tags() {
        let result = strip("<script>alert('xss')</script>hello").unwrap();
        assert!(!result.contains("<script>"));
        assert!(result.contains("hello"));

        assert_eq!(strip("<b>bold</b> text").unwrap(), "bold text");
        assert_eq!(strip("<a href='evil.com'>link</a>").unwrap(), "link");
    }

    #[test]
    fn test_strip_removes_event_handlers() {
        let result = strip("<img src=x onerror=alert(1)>").unwrap();
        assert!(!result.contains("onerror"));
    }

    #[test]
    fn test_strip_rejects_control_characters() {
        assert!(matches!(
            strip("hello\x00world"),
            Err(SanitizeError::ControlCharacters)
        ));
    }

    #[test]
    fn test_strip_allows_newlines_and_tabs() {
        assert!(strip("line1\nline2\tend").is_ok());
    }

    #[test]
    fn test_strip_keeps_unicode() {
        assert_eq!(strip("Olá mundo 👋").unwrap(), "Olá mundo 👋");
    }

    #[test]
    fn test_strip_markup_only_input_is_empty() {
        assert_eq!(strip("<b></b>").unwrap(), "");
    }
}
