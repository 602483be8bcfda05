//! Completion response parsing.

use regex::Regex;

/// Pull the score out of a completion response.
///
/// The first run of ASCII digits is taken as the answer and clamped to
/// [0, 100]; later numbers are ignored, so "85 out of 100" reads as 85.
/// Other numeral systems do not count as digits here, so a reply without
/// an ASCII run yields `None`. Runs too long for `u64` are treated like
/// any other oversized value.
pub fn extract_score(response: &str) -> Option<u8> {
    let digits = Regex::new(r"[0-9]+").unwrap();
    let run = digits.find(response)?;
    let value = run.as_str().parse::<u64>().unwrap_or(u64::MAX);
    Some(value.min(100) as u8)
}
