//! Decoder for undelimited hex runs
//!
//! Some legacy text embeds verse ids as plain runs of uppercase hex digits with
//! no delimiter at all. A run is consumed greedily: a 4-character window that
//! decodes to a known verse wins, then a 3-character window, otherwise the
//! character passes through unchanged.

use crate::canon::VerseId;
use crate::decoder::passes::Segment;
use crate::decoder::resolve::{VerseLookup, citation};

/// Ordinary words that happen to be valid hex and must not be decoded
pub const DENYLIST: [&str; 10] = [
    "ACE", "ADD", "BAD", "BED", "BEEF", "DAD", "DEAD", "FACE", "FADE", "FEED",
];

fn window<L: VerseLookup + ?Sized>(lookup: &L, run: &str, start: usize, width: usize) -> Option<String> {
    let digits = run.get(start..start + width)?;
    let raw = i64::from_str_radix(digits, 16).ok()?;
    let id = VerseId::new(raw).ok()?;
    lookup.lookup(id).map(|r| citation(&r))
}

/// Decode one run of hex-legal characters
pub fn decode_run<L: VerseLookup + ?Sized>(lookup: &L, run: &str) -> Vec<Segment> {
    if DENYLIST.contains(&run) {
        return vec![Segment::Raw(run.to_string())];
    }

    let mut out = Vec::new();
    let mut i = 0;
    let mut previous_was_citation = false;
    while i < run.len() {
        let hit = window(lookup, run, i, 4)
            .map(|c| (c, 4))
            .or_else(|| window(lookup, run, i, 3).map(|c| (c, 3)));

        match hit {
            Some((citation, step)) => {
                if previous_was_citation {
                    out.push(Segment::Rendered(" ".to_string()));
                }
                out.push(Segment::Rendered(citation));
                previous_was_citation = true;
                i += step;
            }
            None => {
                out.push(Segment::Raw(run[i..i + 1].to_string()));
                previous_was_citation = false;
                i += 1;
            }
        }
    }
    out
}
