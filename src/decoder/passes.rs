//! Ordered decoding passes
//!
//! Text is carried as a sequence of segments. Every pass only rewrites `Raw`
//! segments and emits `Rendered` markup that later passes never see again, so a
//! citation produced by one pass cannot be re-matched by the next.

use crate::decoder::bare::decode_run;
use crate::decoder::resolve::{VerseLookup, render_token};
use crate::decoder::token::{EncodingKind, ReferenceToken};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Delimiter wrapping bold spans
pub const BOLD_MARKER: char = '\x07';

/// Delimiter wrapping italic spans
pub const ITALIC_MARKER: char = '\x06';

/// Delimiter around control-encoded references
pub const REFERENCE_MARKER: char = '\x03';

static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\x07(.*?)\x07").unwrap());
static ITALIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\x06(.*?)\x06").unwrap());
static CONTROL_SEQUENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\x03[0-9A-Fa-f-]+\x03)+").unwrap());
static CONTROL_SINGLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x03([0-9A-Fa-f-]+)\x03").unwrap());
static PARENTHESIZED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([0-9A-Fa-f]{4,})\)").unwrap());
static CONTROL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F]").unwrap());
static CHEVRON: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"»([0-9A-Fa-f]+)«").unwrap());
static BARE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9A-F]{3,}").unwrap());

/// A piece of text that is either still undecoded or final markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Raw(String),
    Rendered(String),
}

/// Text under decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segments(Vec<Segment>);

impl Segments {
    pub fn from_text(text: &str) -> Self {
        Segments(vec![Segment::Raw(text.to_string())])
    }

    /// Rewrite every raw segment, merging raw neighbours afterwards
    fn map_raw<F>(self, mut f: F) -> Self
    where
        F: FnMut(&str) -> Vec<Segment>,
    {
        let mut out: Vec<Segment> = Vec::with_capacity(self.0.len());
        for segment in self.0 {
            let produced = match segment {
                Segment::Raw(text) => f(&text),
                rendered => vec![rendered],
            };
            for piece in produced {
                if let Segment::Raw(text) = &piece {
                    if text.is_empty() {
                        continue;
                    }
                    if let Some(Segment::Raw(prev)) = out.last_mut() {
                        prev.push_str(text);
                        continue;
                    }
                }
                out.push(piece);
            }
        }
        Segments(out)
    }

    /// Replace every match of `re` in raw text with the segments `render` returns
    fn replace_matches<F>(self, re: &Regex, mut render: F) -> Self
    where
        F: FnMut(&Captures) -> Vec<Segment>,
    {
        self.map_raw(|text| {
            let mut pieces = Vec::new();
            let mut last = 0;
            for caps in re.captures_iter(text) {
                let whole = caps.get(0).expect("capture group 0 always exists");
                pieces.push(Segment::Raw(text[last..whole.start()].to_string()));
                pieces.extend(render(&caps));
                last = whole.end();
            }
            pieces.push(Segment::Raw(text[last..].to_string()));
            pieces
        })
    }

    /// Concatenate all segments
    pub fn into_string(self) -> String {
        self.0
            .into_iter()
            .map(|s| match s {
                Segment::Raw(t) | Segment::Rendered(t) => t,
            })
            .collect()
    }
}

/// One decoding pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// Bold and italic delimiter pairs
    Emphasis,
    /// Back-to-back control-delimited references, joined with ", "
    ControlSequence,
    /// Isolated control-delimited reference
    ControlSingle,
    /// `(` + 4 or more hex digits + `)`
    Parenthesized,
    /// Remove leftover non-printable control characters
    StripControl,
    /// `»payload«`
    Chevron,
    /// Undelimited runs of uppercase hex characters
    BareRun,
}

/// Passes applied to delimited study text, in precedence order
pub const DELIMITED_PIPELINE: [Pass; 6] = [
    Pass::Emphasis,
    Pass::ControlSequence,
    Pass::ControlSingle,
    Pass::Parenthesized,
    Pass::StripControl,
    Pass::Chevron,
];

/// Passes applied to text that carries no reference delimiters
pub const BARE_PIPELINE: [Pass; 3] = [Pass::StripControl, Pass::Chevron, Pass::BareRun];

fn wrap(open: &str, inner: &str, close: &str) -> Vec<Segment> {
    vec![
        Segment::Rendered(open.to_string()),
        Segment::Raw(inner.to_string()),
        Segment::Rendered(close.to_string()),
    ]
}

impl Pass {
    pub fn apply<L: VerseLookup + ?Sized>(self, segments: Segments, lookup: &L) -> Segments {
        match self {
            Pass::Emphasis => segments
                .replace_matches(&BOLD, |caps| wrap("<b>", &caps[1], "</b>"))
                .replace_matches(&ITALIC, |caps| wrap("<i>", &caps[1], "</i>")),
            Pass::ControlSequence => segments.replace_matches(&CONTROL_SEQUENCE, |caps| {
                let rendered = caps[0]
                    .split(REFERENCE_MARKER)
                    .filter(|p| !p.is_empty())
                    .map(|p| render_token(lookup, &ReferenceToken::new(EncodingKind::ControlDelimited, p)))
                    .collect::<Vec<_>>()
                    .join(", ");
                vec![Segment::Rendered(rendered)]
            }),
            Pass::ControlSingle => segments.replace_matches(&CONTROL_SINGLE, |caps| {
                let token = ReferenceToken::new(EncodingKind::ControlDelimited, &caps[1]);
                vec![Segment::Rendered(render_token(lookup, &token))]
            }),
            Pass::Parenthesized => segments.replace_matches(&PARENTHESIZED, |caps| {
                let token = ReferenceToken::new(EncodingKind::Parenthesized, &caps[1]);
                vec![Segment::Rendered(format!("({})", render_token(lookup, &token)))]
            }),
            Pass::StripControl => segments.map_raw(|text| {
                vec![Segment::Raw(CONTROL_CHARS.replace_all(text, "").into_owned())]
            }),
            Pass::Chevron => segments.replace_matches(&CHEVRON, |caps| {
                let token = ReferenceToken::new(EncodingKind::Chevron, &caps[1]);
                vec![Segment::Rendered(render_token(lookup, &token))]
            }),
            Pass::BareRun => segments.replace_matches(&BARE_RUN, |caps| decode_run(lookup, &caps[0])),
        }
    }
}

/// Run a pipeline of passes over text
pub fn run_pipeline<L: VerseLookup + ?Sized>(passes: &[Pass], text: &str, lookup: &L) -> String {
    passes
        .iter()
        .fold(Segments::from_text(text), |segments, pass| pass.apply(segments, lookup))
        .into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canon::VerseIndex;

    fn run(passes: &[Pass], text: &str) -> String {
        run_pipeline(passes, text, VerseIndex::global())
    }

    #[test]
    fn test_segments_merge_raw_neighbours() {
        let segments = Segments::from_text("a\x01b").map_raw(|t| {
            t.split('\x01').map(|p| Segment::Raw(p.to_string())).collect()
        });
        assert_eq!(segments, Segments(vec![Segment::Raw("ab".to_string())]));
    }

    #[test]
    fn test_emphasis() {
        let out = run(&[Pass::Emphasis], "\x07Note\x07 and \x06see\x06");
        assert_eq!(out, "<b>Note</b> and <i>see</i>");
    }

    #[test]
    fn test_reference_inside_bold_still_decodes() {
        let out = run(&DELIMITED_PIPELINE, "\x07See \x030001\x03\x07");
        assert!(out.starts_with("<b>See <span class=\"ref-link\""));
        assert!(out.ends_with("Genesis 1:1</span></b>"));
    }

    #[test]
    fn test_sequence_is_comma_joined() {
        let out = run(&[Pass::ControlSequence], "\x030001\x03\x030002\x03");
        assert_eq!(out.matches("ref-link").count(), 2);
        assert!(out.contains("Genesis 1:1</span>, <span"));
        assert!(out.contains("Genesis 1:2</span>"));
    }

    #[test]
    fn test_parenthesized_keeps_parentheses() {
        let out = run(&[Pass::Parenthesized], "(see 0001) (0001)");
        assert!(out.starts_with("(see 0001) (<span"));
        assert!(out.ends_with("Genesis 1:1</span>)"));
    }

    #[test]
    fn test_strip_control_keeps_line_breaks() {
        let out = run(&[Pass::StripControl], "a\x01b\x1Fc\nd");
        assert_eq!(out, "abc\nd");
    }

    #[test]
    fn test_rendered_markup_is_not_rematched() {
        // Psalm 119:119 puts "119" in attributes; the bare pass must not touch it
        let id = VerseIndex::global().to_id("Psalms", 119, 119).unwrap();
        let text = format!("\x03{:04X}\x03", id.get());
        let out = run(&[Pass::ControlSequence, Pass::BareRun], &text);
        assert_eq!(out.matches("ref-link").count(), 1);
        assert!(out.contains(r#"data-chapter="119" data-verse="119""#));
    }

    #[test]
    fn test_chevron_after_strip() {
        let out = run(&DELIMITED_PIPELINE, "»\x0131«");
        assert!(out.contains(">Genesis 1:31</span>"));
    }
}
