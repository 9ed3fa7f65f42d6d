//! JSON Array Location
//!
//! Models wrap their arrays in prose, code fences and emphasis markers.
//! These helpers reduce a raw response to the candidate array text; they never
//! decode, so a miss is just `None`.

use regex::Regex;
use std::sync::LazyLock;

static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static ITALIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.*?)\*").unwrap());

/// Remove `**bold**` and `*italic*` markers and inline code ticks.
pub fn strip_markdown(text: &str) -> String {
    let text = BOLD.replace_all(text, "$1");
    let text = ITALIC.replace_all(&text, "$1");
    text.replace('`', "")
}

/// Substring from the first `[` to the last `]`, inclusive.
pub fn locate_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markdown() {
        assert_eq!(
            strip_markdown("**Revenue**: *about* `1,000`"),
            "Revenue: about 1,000"
        );
        assert_eq!(strip_markdown("```json\n[]\n```"), "json\n[]\n");
    }

    #[test]
    fn test_locate_json_array_in_prose() {
        let raw = "Here you go:\n[{\"bucket\":\"Revenue\",\"value\":1.0}]\nHope this helps [1].";
        assert_eq!(
            locate_json_array(raw),
            Some("[{\"bucket\":\"Revenue\",\"value\":1.0}]\nHope this helps [1]")
        );
    }

    #[test]
    fn test_locate_json_array_missing() {
        assert_eq!(locate_json_array("no array here"), None);
        assert_eq!(locate_json_array("] backwards ["), None);
        assert_eq!(locate_json_array("[]"), Some("[]"));
    }
}
