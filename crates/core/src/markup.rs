//! HTML fragments and attribute values for the widget's DOM.

pub const IFRAME_ALLOW: &str = "microphone; camera";
pub const IFRAME_SANDBOX: &str = "allow-same-origin allow-scripts allow-forms allow-popups";
pub const IFRAME_TITLE: &str = "Chat";
pub const BUTTON_LABEL: &str = "Open chat";
pub const CLOSE_LABEL: &str = "Close chat";
pub const CLOSE_GLYPH: &str = "&times;";

/// Chevron shown on the button while the frame is open.
pub const ARROW_ICON_SVG: &str = r#"<svg width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" aria-hidden="true"><polyline points="6 9 12 15 18 9"></polyline></svg>"#;

/// `<img>` markup for the chat glyph.
pub fn chat_icon_html(src: &str) -> String {
    format!(
        r#"<img src="{}" alt="Chat" draggable="false">"#,
        html_escape::encode_double_quoted_attribute(src)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_icon_points_at_source() {
        assert_eq!(
            chat_icon_html("https://x/y.png"),
            r#"<img src="https://x/y.png" alt="Chat" draggable="false">"#
        );
    }

    #[test]
    fn attribute_breakout_is_escaped() {
        let html = chat_icon_html(r#"x" onerror="alert(1)"#);
        assert!(!html.contains(r#"" onerror"#));
        assert!(html.contains("&quot; onerror=&quot;alert(1)"));
    }

    #[test]
    fn logo_url_query_keeps_ampersands_encoded() {
        assert_eq!(
            chat_icon_html("https://cdn.example.com/logo.png?w=64&h=64"),
            r#"<img src="https://cdn.example.com/logo.png?w=64&amp;h=64" alt="Chat" draggable="false">"#
        );
    }

    #[test]
    fn tag_breakout_is_escaped() {
        let html = chat_icon_html(r#""><script>alert(1)</script>"#);
        assert!(!html.contains("<script>"));
        assert!(html.starts_with(r#"<img src="&quot;&gt;&lt;script&gt;"#));
    }
}
