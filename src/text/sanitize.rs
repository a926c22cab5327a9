//! HTML allow-list sanitization
//!
//! Stored text may carry markup from its source. Only a fixed set of inline
//! study tags survives; every other tag is dropped (its text content is kept),
//! `<script>` elements are removed with their content, and event-handler
//! attributes are stripped from the tags that remain.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Tags that survive sanitization
pub const ALLOWED_TAGS: [&str; 9] = ["span", "b", "i", "br", "h3", "div", "mark", "a", "sup"];

static SCRIPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").unwrap());
static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
// Quoted attribute values may contain `>`; a tag with no closing `>` is
// captured without group 4 and escaped.
static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<(/?)([A-Za-z][A-Za-z0-9]*)\b((?:"[^"]*"|'[^']*'|[^'">])*)(>)?"#).unwrap()
});
static EVENT_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\s*\bon[a-z]+\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)"#).unwrap()
});

/// Restricts raw text to a safe markup subset
pub trait Sanitizer {
    fn sanitize(&self, raw: &str) -> String;
}

/// Default sanitizer keeping [`ALLOWED_TAGS`]
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowListSanitizer;

impl Sanitizer for AllowListSanitizer {
    fn sanitize(&self, raw: &str) -> String {
        if raw.is_empty() {
            return String::new();
        }

        let text = SCRIPT.replace_all(raw, "");
        let text = COMMENT.replace_all(&text, "");
        let text = TAG.replace_all(&text, |caps: &Captures| {
            if caps.get(4).is_none() {
                return format!("&lt;{}{}{}", &caps[1], &caps[2], &caps[3]);
            }
            let name = caps[2].to_ascii_lowercase();
            if !ALLOWED_TAGS.contains(&name.as_str()) {
                return String::new();
            }
            let attrs = EVENT_ATTR.replace_all(&caps[3], "");
            format!("<{}{}{}>", &caps[1], &caps[2], attrs)
        });
        // Handlers left in text the tag pass could not parse
        EVENT_ATTR.replace_all(&text, "").into_owned()
    }
}

impl<F: Fn(&str) -> String> Sanitizer for F {
    fn sanitize(&self, raw: &str) -> String {
        self(raw)
    }
}

/// Escape text for use inside markup or a double-quoted attribute
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sanitize(raw: &str) -> String {
        AllowListSanitizer.sanitize(raw)
    }

    #[test]
    fn test_allowed_tags_survive() {
        assert_eq!(sanitize("<b>Grace</b> and <i>truth</i><br/>"), "<b>Grace</b> and <i>truth</i><br/>");
        assert_eq!(sanitize("<SUP>1</SUP>"), "<SUP>1</SUP>");
    }

    #[test]
    fn test_disallowed_tags_dropped_text_kept() {
        assert_eq!(sanitize("<p>In the <em>beginning</em></p>"), "In the beginning");
        assert_eq!(sanitize("<img src=x onerror=alert(1)>"), "");
    }

    #[test]
    fn test_script_removed_with_content() {
        assert_eq!(sanitize("a<script type=\"x\">alert('x')</script>b"), "ab");
        assert_eq!(sanitize("a<SCRIPT>\nalert(1)\n</SCRIPT>b"), "ab");
    }

    #[test]
    fn test_event_handlers_stripped() {
        assert_eq!(
            sanitize(r#"<span class="x" onclick="steal()">t</span>"#),
            r#"<span class="x">t</span>"#
        );
        assert_eq!(
            sanitize(r##"<a href="#v1" onMouseOver='x()'>go</a>"##),
            r##"<a href="#v1">go</a>"##
        );
        assert_eq!(sanitize("<div onload=boom>x</div>"), "<div>x</div>");
    }

    #[test]
    fn test_quoted_angle_bracket_does_not_end_tag() {
        let out = sanitize(r#"<span title="a>b" onclick="steal()">x</span>"#);
        assert_eq!(out, r#"<span title="a>b">x</span>"#);
        assert!(!out.contains("onclick"));

        assert_eq!(sanitize(r#"<img alt='a>b' onerror="x()">t"#), "t");
        assert_eq!(sanitize(r#"<b title="x>y" onmouseover='z()'>bold</b>"#), r#"<b title="x>y">bold</b>"#);
    }

    #[test]
    fn test_unterminated_tag_escaped() {
        let out = sanitize(r#"<img alt="x onerror=alert(1)>"#);
        assert!(out.starts_with("&lt;img alt="));
        assert!(!out.contains("onerror"));
        assert!(!out.contains("<img"));
        assert_eq!(sanitize("Grace<b"), "Grace&lt;b");
    }

    #[test]
    fn test_control_characters_and_sentinels_untouched() {
        assert_eq!(sanitize("\x07bold\x07 \x030001\x03"), "\x07bold\x07 \x030001\x03");
        assert_eq!(sanitize("[[MARK]]light[[/MARK]]"), "[[MARK]]light[[/MARK]]");
        assert_eq!(sanitize("1 < 2 and 3 > 2"), "1 < 2 and 3 > 2");
    }

    #[test]
    fn test_closure_sanitizer() {
        let upper = |raw: &str| raw.to_uppercase();
        assert_eq!(upper.sanitize("abc"), "ABC");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }
}
