use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Elements a client keeps hidden, e.g. the inactive half of a toggle button.
static HIDDEN_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<(?:button|a|span)\b[^>]*display:\s*none;?[^>]*>.*?</(?:button|a|span)>"#)
        .unwrap()
});

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

/// Reduce a rendered cell to the text a reader would see.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(html) => html_to_text(html),
        other => other.to_string(),
    }
}

pub fn html_to_text(html: &str) -> String {
    let visible = HIDDEN_ELEMENT.replace_all(html, "");
    let text = TAG.replace_all(&visible, " ");
    unescape(&text).split_whitespace().collect::<Vec<_>>().join(" ")
}

fn unescape(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Pad `text` to `width` characters.
pub fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - len))
    }
}

/// Shorten to `max` characters, marking the cut with `...`.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_removed_and_entities_decoded() {
        let html = "<a href=\"/x\">meta&amp;bsp</a>&nbsp;<i class=\"icon\"></i>";
        assert_eq!(html_to_text(html), "meta&bsp");
    }

    #[test]
    fn test_hidden_toggle_half_dropped() {
        let html = "<button class=\"btn\" style=\"display:none;\">Remove</button>\
                    <button class=\"btn\">Add</button>";
        assert_eq!(html_to_text(html), "Add");
    }

    #[test]
    fn test_non_string_values() {
        assert_eq!(cell_text(&Value::Null), "");
        assert_eq!(cell_text(&serde_json::json!(3)), "3");
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("abcdef", 5), "ab...");
        assert_eq!(truncate("ab", 5), "ab");
    }
}
