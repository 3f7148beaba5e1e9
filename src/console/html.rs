//! HTML helpers shared by the views and the form renderer

/// Escape text for use in element content and quoted attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// A submit button inside its own POST form
pub fn action_button(action: &str, label: &str, class: &str) -> String {
    format!(
        r#"<form method="post" action="{}" class="inline"><button type="submit" class="{}">{}</button></form>"#,
        escape(action),
        class,
        escape(label)
    )
}

/// Percent-encode a path segment built from host-supplied keys
pub fn path_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<b class="x">Tom & 'Jerry'</b>"#),
            "&lt;b class=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_path_segment() {
        assert_eq!(path_segment("wp_product"), "wp_product");
        assert_eq!(path_segment("a b/c"), "a%20b%2Fc");
        assert_eq!(path_segment("café?x=1"), "caf%C3%A9%3Fx%3D1");
    }
}
