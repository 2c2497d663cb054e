use crate::models::HealthcareFacility;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Errors produced while turning provider text into structured data
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("No JSON {0} found in response")]
    NoJson(&'static str),
}

/// Clean raw provider text before JSON parsing
///
/// Strips Markdown code fences, turns typographic quotes into plain ones and
/// collapses every newline (plus the indentation after it) into one space.
pub fn clean_response(raw: &str) -> String {
    let unfenced = raw
        .replace("```json", "")
        .replace("```JSON", "")
        .replace("```", "");

    let straightened = unfenced
        .replace(['\u{201C}', '\u{201D}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    let mut collapsed = String::with_capacity(straightened.len());
    let mut chars = straightened.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\n' || c == '\r' {
            while chars.peek().is_some_and(|next| next.is_whitespace()) {
                chars.next();
            }
            collapsed.push(' ');
        } else {
            collapsed.push(c);
        }
    }

    collapsed.trim().to_string()
}

/// Slice the outermost `open`..`close` span out of text that has prose around it
fn extract_span<'a>(text: &'a str, open: char, close: char) -> Option<&'a str> {
    if text.starts_with(open) {
        return Some(text);
    }
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

/// Parse provider text as a JSON array of facilities
pub fn parse_facilities(raw: &str) -> Result<Vec<HealthcareFacility>, ParseError> {
    let cleaned = clean_response(raw);
    let json = extract_span(&cleaned, '[', ']').ok_or(ParseError::NoJson("array"))?;
    let mut facilities: Vec<HealthcareFacility> = serde_json::from_str(json)?;

    for facility in &mut facilities {
        facility.rating = if facility.rating.is_finite() {
            facility.rating.clamp(0.0, 5.0)
        } else {
            0.0
        };
    }

    Ok(facilities)
}

/// A numeric field as providers actually send it
#[derive(Deserialize)]
#[serde(untagged)]
enum LenientNumber {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

impl LenientNumber {
    fn value(self) -> Option<f64> {
        let n = match self {
            LenientNumber::Number(n) => n,
            LenientNumber::Text(s) => s.trim().parse().ok()?,
            LenientNumber::Other(_) => return None,
        };
        n.is_finite().then_some(n)
    }
}

/// Deserialize a rating sent as a number or numeric string, 0.0 otherwise
pub fn deserialize_rating<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<LenientNumber>::deserialize(deserializer)?;
    Ok(raw.and_then(LenientNumber::value).unwrap_or(0.0))
}

/// Deserialize a review count that may arrive as a float or a string
pub fn deserialize_review_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<LenientNumber>::deserialize(deserializer)?;
    Ok(raw
        .and_then(LenientNumber::value)
        .filter(|n| *n >= 0.0)
        .map(|n| n.round().min(u32::MAX as f64) as u32))
}

/// Parse provider text as a single JSON object
pub fn parse_object<T: DeserializeOwned>(raw: &str) -> Result<T, ParseError> {
    let cleaned = clean_response(raw);
    let json = extract_span(&cleaned, '{', '}').ok_or(ParseError::NoJson("object"))?;
    Ok(serde_json::from_str(json)?)
}
