//! Payload resolution and citation rendering
//!
//! A token payload is resolved in three shapes, checked in order:
//! `start-end` ranges, lists of 4-digit ids, and single values. Resolution
//! failures are returned as [`LuminaError::DecodeFailure`] and turned into the
//! bracketed literal by [`render_token`]; nothing here panics on bad input.

use crate::canon::{VerseId, VerseIndex, VerseRef};
use crate::decoder::token::{EncodingKind, ReferenceToken, Resolution};
use crate::error::{LuminaError, Result};
use crate::text::escape_html;

/// Turns a canonical id into a displayable reference
pub trait VerseLookup {
    fn lookup(&self, id: VerseId) -> Option<VerseRef>;
}

impl VerseLookup for VerseIndex {
    fn lookup(&self, id: VerseId) -> Option<VerseRef> {
        Some(self.from_id(id))
    }
}

impl<T: VerseLookup + ?Sized> VerseLookup for &T {
    fn lookup(&self, id: VerseId) -> Option<VerseRef> {
        (**self).lookup(id)
    }
}

fn parse_hex(digits: &str) -> Option<i64> {
    if digits.is_empty() || digits.len() > 15 {
        return None;
    }
    i64::from_str_radix(digits, 16).ok()
}

/// Chevron payloads are decimal when every character is a digit
fn parse_chevron(digits: &str) -> Option<i64> {
    if !digits.is_empty() && digits.len() <= 15 && digits.bytes().all(|b| b.is_ascii_digit()) {
        digits.parse().ok()
    } else {
        parse_hex(digits)
    }
}

fn failure(token: &ReferenceToken, reason: &str) -> LuminaError {
    LuminaError::DecodeFailure(format!("{} token '{}': {}", token.kind, token.payload, reason))
}

fn lookup_raw<L: VerseLookup + ?Sized>(lookup: &L, raw: Option<i64>) -> Option<VerseRef> {
    let id = VerseId::new(raw?).ok()?;
    lookup.lookup(id)
}

/// Resolve a token to the references it encodes
pub fn resolve_token<L: VerseLookup + ?Sized>(
    lookup: &L,
    token: &ReferenceToken,
) -> Result<Resolution> {
    let payload = token.payload.as_str();

    if let Some((start_hex, end_hex)) = payload.split_once('-') {
        let start_id = parse_hex(start_hex);
        let end_id = parse_hex(end_hex);
        let in_range = |v: Option<i64>| v.is_some_and(|v| VerseId::new(v).is_ok());
        if !in_range(start_id) || !in_range(end_id) {
            log::error!(
                "Invalid range resolution: {} -> {:?}-{:?}",
                payload,
                start_id,
                end_id
            );
            return Err(failure(token, "range end outside the canonical id space"));
        }

        return match (lookup_raw(lookup, start_id), lookup_raw(lookup, end_id)) {
            (Some(start), Some(end)) => Ok(Resolution::Range { start, end }),
            _ => Err(failure(token, "range end has no verse")),
        };
    }

    if token.is_list() {
        let mut refs = Vec::new();
        for chunk in payload.as_bytes().chunks(4) {
            let chunk = std::str::from_utf8(chunk).unwrap_or_default();
            match lookup_raw(lookup, parse_hex(chunk)) {
                Some(r) => refs.push(r),
                None => log::warn!("Invalid list id: {} in '{}'", chunk, payload),
            }
        }
        if refs.is_empty() {
            return Err(failure(token, "no chunk resolved"));
        }
        return Ok(Resolution::List(refs));
    }

    let value = match token.kind {
        EncodingKind::Chevron => parse_chevron(payload),
        _ => parse_hex(payload),
    };
    lookup_raw(lookup, value)
        .map(Resolution::Single)
        .ok_or_else(|| failure(token, "value outside the canonical id space"))
}

/// Inline citation for one reference
pub fn citation(r: &VerseRef) -> String {
    format!(
        r#"<span class="ref-link" data-book="{}" data-chapter="{}" data-verse="{}">{}</span>"#,
        escape_html(&r.book),
        r.chapter,
        r.verse,
        escape_html(&r.to_string())
    )
}

/// Inline citation for a range; attributes carry both ends
pub fn range_citation(start: &VerseRef, end: &VerseRef, label: &str) -> String {
    format!(
        r#"<span class="ref-link" data-book="{}" data-chapter="{}" data-verse="{}" data-end-book="{}" data-end-chapter="{}" data-end-verse="{}">{}</span>"#,
        escape_html(&start.book),
        start.chapter,
        start.verse,
        escape_html(&end.book),
        end.chapter,
        end.verse,
        escape_html(label)
    )
}

/// Markup for a resolved token
pub fn render_resolution(resolution: &Resolution) -> String {
    match resolution {
        Resolution::Single(r) => citation(r),
        Resolution::Range { start, end } => range_citation(start, end, &resolution.label()),
        Resolution::List(refs) => refs.iter().map(citation).collect::<Vec<_>>().join("; "),
    }
}

/// Resolve and render a token, degrading to `[payload]` on failure
pub fn render_token<L: VerseLookup + ?Sized>(lookup: &L, token: &ReferenceToken) -> String {
    match resolve_token(lookup, token) {
        Ok(resolution) => render_resolution(&resolution),
        Err(e) => {
            log::warn!("{}", e);
            token.literal()
        }
    }
}
