//! Study text rendering pipeline
//!
//! Every block of Scripture or study text reaching a reader passes through
//! here: sanitize, then decode references for commentary and dictionary
//! bodies, or reassemble word-by-word glosses for interlinear verses.

use crate::decoder::{ReferenceDecoder, VerseLookup};
use crate::storage::records::{DefinitionKind, InterlinearWord};
use crate::text::sanitize::{Sanitizer, escape_html};

/// What to render and how
#[derive(Debug, Clone, Copy)]
pub enum RenderInput<'a> {
    /// Sanitize only
    Plain(&'a str),
    /// Sanitize, then decode embedded references
    Annotated(&'a str),
    /// Sanitize each word and tag the ones carrying a lexicon id
    Interlinear(&'a [InterlinearWord]),
}

/// Sanitizer plus reference decoder
pub struct StudyTextPipeline<S, L> {
    sanitizer: S,
    decoder: ReferenceDecoder<L>,
}

impl<S: Sanitizer, L: VerseLookup> StudyTextPipeline<S, L> {
    pub fn new(sanitizer: S, lookup: L) -> Self {
        Self {
            sanitizer,
            decoder: ReferenceDecoder::new(lookup),
        }
    }

    pub fn render(&self, input: RenderInput<'_>) -> String {
        match input {
            RenderInput::Plain(raw) => self.sanitizer.sanitize(raw),
            RenderInput::Annotated(raw) => self.decoder.decode(&self.sanitizer.sanitize(raw)),
            RenderInput::Interlinear(words) => self.interlinear(words),
        }
    }

    pub fn plain(&self, raw: &str) -> String {
        self.render(RenderInput::Plain(raw))
    }

    pub fn annotated(&self, raw: &str) -> String {
        self.render(RenderInput::Annotated(raw))
    }

    pub fn decoder(&self) -> &ReferenceDecoder<L> {
        &self.decoder
    }

    fn interlinear(&self, words: &[InterlinearWord]) -> String {
        words
            .iter()
            .map(|w| {
                let word = self.sanitizer.sanitize(&w.word);
                match &w.lexicon_id {
                    Some(id) => {
                        let label = w.transliteration.as_deref().filter(|t| !t.is_empty()).unwrap_or(id);
                        format!(
                            r#"{} <span class="strongs-tag" data-strongs="{}" data-lex-type="{}">&lt;{}&gt;</span>"#,
                            word,
                            escape_html(id),
                            DefinitionKind::for_lexicon_id(id).as_str(),
                            escape_html(label)
                        )
                    }
                    None => word,
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string()
    }
}
