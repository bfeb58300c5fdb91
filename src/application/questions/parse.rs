//! Defensive parsing of generator output.
//!
//! The generator is untrusted: it may return a plain JSON array, JSON inside
//! a fenced code block, or JSON surrounded by prose. Anything unreadable
//! becomes an empty candidate list, never an error propagating into scoring
//! logic.

use serde::Deserialize;

/// One candidate statement as the generator emits it, prior to validation.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CandidateQuestion {
    pub text: String,
    #[serde(rename = "trait")]
    pub trait_name: String,
    pub direction: i32,
}

/// Extracts candidate questions from raw generator output.
///
/// Tries, in order: the whole response as JSON, the contents of the first
/// fenced code block, and the outermost `[...]` span. Returns an empty list
/// when none of those parse.
pub fn extract_candidates(raw: &str) -> Vec<CandidateQuestion> {
    let trimmed = raw.trim();

    if let Ok(candidates) = serde_json::from_str::<Vec<CandidateQuestion>>(trimmed) {
        return candidates;
    }

    if let Some(fenced) = extract_fenced_block(trimmed) {
        if let Ok(candidates) = serde_json::from_str::<Vec<CandidateQuestion>>(fenced.trim()) {
            return candidates;
        }
    }

    if let Some(span) = extract_array_span(trimmed) {
        if let Ok(candidates) = serde_json::from_str::<Vec<CandidateQuestion>>(span) {
            return candidates;
        }
    }

    Vec::new()
}

/// Returns the contents of the first ``` fence, tolerating a language tag.
fn extract_fenced_block(s: &str) -> Option<&str> {
    let open = s.find("```")?;
    let after_fence = &s[open + 3..];
    // Skip an optional language tag up to the first newline.
    let body_start = after_fence.find('\n')? + 1;
    let body = &after_fence[body_start..];
    let close = body.find("```")?;
    Some(&body[..close])
}

/// Returns the substring from the first '[' to the last ']', inclusive.
fn extract_array_span(s: &str) -> Option<&str> {
    let start = s.find('[')?;
    let end = s.rfind(']')?;
    (end > start).then(|| &s[start..=end])
}
