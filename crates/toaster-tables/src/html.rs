//! HTML fragment helpers for column templates.

/// Escape text for use inside element content or a quoted attribute.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// `<a href="url">text</a>` with the text escaped.
pub fn link(url: &str, text: &str) -> String {
    format!("<a href=\"{}\">{}</a>", escape(url), escape(text))
}

/// Share icon pointing at an external page, or nothing without a URL.
pub fn external_icon(url: Option<&str>) -> String {
    match url {
        Some(url) if !url.is_empty() => format!(
            "<a target=\"_blank\" href=\"{}\"><i class=\"icon-share get-info\"></i></a>",
            escape(url)
        ),
        _ => String::new(),
    }
}

/// Greyed-out placeholder text.
pub fn muted(text: &str) -> String {
    format!("<span class=\"muted\">{}</span>", escape(text))
}
