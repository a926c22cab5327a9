//! Reference tokens recognised in study text

use crate::canon::VerseRef;
use std::fmt;

/// How a reference was encoded in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodingKind {
    /// `»payload«`, decimal or hex
    Chevron,
    /// `\x03payload\x03`, possibly several groups back to back
    ControlDelimited,
    /// `(payload)` with four or more hex digits
    Parenthesized,
    /// Undelimited run of uppercase hex characters
    BareRun,
}

impl fmt::Display for EncodingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EncodingKind::Chevron => "chevron",
            EncodingKind::ControlDelimited => "controlDelimited",
            EncodingKind::Parenthesized => "parenthesized",
            EncodingKind::BareRun => "bareRun",
        };
        f.write_str(name)
    }
}

/// A recognised substring of raw text carrying one or more encoded references
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceToken {
    pub kind: EncodingKind,
    pub payload: String,
}

impl ReferenceToken {
    pub fn new<S: Into<String>>(kind: EncodingKind, payload: S) -> Self {
        Self {
            kind,
            payload: payload.into(),
        }
    }

    /// Whether the payload encodes a `start-end` range
    pub fn is_range(&self) -> bool {
        self.payload.contains('-')
    }

    /// Whether the payload splits into 4-digit verse ids
    pub fn is_list(&self) -> bool {
        !self.is_range() && self.payload.len() >= 4 && self.payload.len() % 4 == 0
    }

    /// Literal fallback emitted when the token cannot be resolved
    pub fn literal(&self) -> String {
        format!("[{}]", self.payload)
    }
}

/// What a token resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Single(VerseRef),
    Range { start: VerseRef, end: VerseRef },
    List(Vec<VerseRef>),
}

impl Resolution {
    /// Human-readable label, e.g. `Joel 3:1-21` for a same-chapter range
    pub fn label(&self) -> String {
        match self {
            Resolution::Single(r) => r.to_string(),
            Resolution::Range { start, end } => range_label(start, end),
            Resolution::List(refs) => refs
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}

/// Label for a range, collapsing the shared book and chapter
pub fn range_label(start: &VerseRef, end: &VerseRef) -> String {
    if start.book == end.book {
        if start.chapter == end.chapter {
            format!("{} {}:{}-{}", start.book, start.chapter, start.verse, end.verse)
        } else {
            format!(
                "{} {}:{}-{}:{}",
                start.book, start.chapter, start.verse, end.chapter, end.verse
            )
        }
    } else {
        format!("{} - {}", start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shape() {
        let range = ReferenceToken::new(EncodingKind::ControlDelimited, "5749-575D");
        assert!(range.is_range());
        assert!(!range.is_list());

        let list = ReferenceToken::new(EncodingKind::Parenthesized, "580458C3");
        assert!(list.is_list());

        let single = ReferenceToken::new(EncodingKind::Chevron, "31");
        assert!(!single.is_list());
        assert_eq!(single.literal(), "[31]");
    }

    #[test]
    fn test_range_labels() {
        let a = VerseRef::new("Joel", 3, 1);
        let b = VerseRef::new("Joel", 3, 21);
        assert_eq!(range_label(&a, &b), "Joel 3:1-21");

        let c = VerseRef::new("Joel", 2, 28);
        assert_eq!(range_label(&c, &b), "Joel 2:28-3:21");

        let d = VerseRef::new("Amos", 1, 1);
        assert_eq!(range_label(&b, &d), "Joel 3:21 - Amos 1:1");
    }

    #[test]
    fn test_list_label() {
        let list = Resolution::List(vec![
            VerseRef::new("Obadiah", 1, 21),
            VerseRef::new("Nahum", 3, 10),
        ]);
        assert_eq!(list.label(), "Obadiah 1:21; Nahum 3:10");
    }
}
