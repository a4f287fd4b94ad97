//! Isolating a JSON object from noisy model output.

use derive_more::Display;
use tracing::{debug, instrument};

/// Failure to locate a JSON object in the model's raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ExtractionError {
    /// No `{`..`}` span was found.
    #[display("no JSON object found in model response")]
    NoJsonObject,
}

impl std::error::Error for ExtractionError {}

/// Slices the candidate JSON object out of raw model text.
///
/// Takes the span from the first `{` to the last `}` inclusive, which
/// strips markdown fencing and prose on either side. Known limitation:
/// the span is not brace-balanced, so prose containing a stray brace
/// after the object widens the slice. The decoder is the layer that
/// rejects such candidates.
#[instrument(skip(text), fields(len = text.len()))]
pub fn extract_json_object(text: &str) -> Result<&str, ExtractionError> {
    let first = text.find('{').ok_or(ExtractionError::NoJsonObject)?;
    let last = text.rfind('}').ok_or(ExtractionError::NoJsonObject)?;
    if last <= first {
        return Err(ExtractionError::NoJsonObject);
    }
    let candidate = &text[first..=last];
    debug!(candidate_len = candidate.len(), "extracted candidate JSON object");
    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_markdown_fencing() {
        let raw = "```json\n{\"type\": \"end_turn\"}\n```";
        let candidate = extract_json_object(raw).expect("fenced object extracts");
        assert_eq!(candidate, "{\"type\": \"end_turn\"}");
    }

    #[test]
    fn test_bare_object_extracts_unchanged() {
        let raw = "{\"a\": 1}";
        assert_eq!(extract_json_object(raw).expect("bare object extracts"), raw);
    }

    #[test]
    fn test_no_braces_fails() {
        let err = extract_json_object("end turn sounds good")
            .expect_err("brace-free text must fail");
        assert_eq!(err, ExtractionError::NoJsonObject);
    }

    #[test]
    fn test_reversed_braces_fail() {
        let err = extract_json_object("} nonsense {")
            .expect_err("closing brace before opening must fail");
        assert_eq!(err, ExtractionError::NoJsonObject);
    }

    #[test]
    fn test_trailing_prose_brace_widens_the_slice() {
        // Documented permissiveness: the slice is not brace-balanced.
        let raw = "{\"a\": 1} and then }";
        let candidate = extract_json_object(raw).expect("span still extracts");
        assert_eq!(candidate, "{\"a\": 1} and then }");
    }
}
