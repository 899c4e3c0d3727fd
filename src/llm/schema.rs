//! JSON schemas for the structured spymaster and guesser outputs.
//!
//! The guesser schema is rebuilt on every call: its `word` enum must track
//! the currently unrevealed board words, never a stale list from an
//! earlier turn.

use serde_json::{json, Value};

/// Schema for one spymaster clue proposal.
pub fn spymaster_single_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "clue": {
                "type": "string",
                "description": "A single-word clue (no spaces)."
            },
            "number": {
                "type": "integer",
                "description": "How many words the clue is intended to connect (1-9)."
            },
            "intended_targets": {
                "type": "array",
                "items": {"type": "string"},
                "description": "Which board words you intended the team to guess (for analysis only)."
            },
            "danger_words": {
                "type": "array",
                "items": {"type": "string"},
                "description": "Board words you fear the guesser might confuse with the clue."
            }
        },
        "required": ["clue", "number", "intended_targets", "danger_words"],
        "additionalProperties": false
    })
}

/// Schema for one response carrying up to `max_candidates` proposals.
pub fn spymaster_list_schema(max_candidates: usize) -> Value {
    json!({
        "type": "object",
        "properties": {
            "candidates": {
                "type": "array",
                "items": spymaster_single_schema(),
                "minItems": 1,
                "maxItems": max_candidates,
                "description": "List of candidate clues. Prefer unique clues."
            }
        },
        "required": ["candidates"],
        "additionalProperties": false
    })
}

/// Schema for guesser output, constrained to the unrevealed board words.
pub fn guesser_schema(unrevealed_words: &[String], max_guesses: usize) -> Value {
    // Stable, de-duplicated enum ordering to reduce token churn
    let mut enum_words: Vec<&String> = Vec::new();
    for w in unrevealed_words {
        if !enum_words.contains(&w) {
            enum_words.push(w);
        }
    }

    json!({
        "type": "object",
        "properties": {
            "guesses": {
                "type": "array",
                "maxItems": max_guesses,
                "items": {
                    "type": "object",
                    "properties": {
                        "word": {
                            "type": "string",
                            "enum": enum_words,
                            "description": "One of the unrevealed board words."
                        },
                        "confidence": {
                            "type": "number",
                            "description": "Your confidence in this guess (0.0 to 1.0)."
                        }
                    },
                    "required": ["word", "confidence"],
                    "additionalProperties": false
                },
                "description": "Ordered list of guesses you would attempt this turn. Return fewer to stop early."
            },
            "stop_reason": {
                "type": "string",
                "description": "Explanation for why you stopped early (analysis only)."
            }
        },
        "required": ["guesses", "stop_reason"],
        "additionalProperties": false
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_schema_requires_all_fields() {
        let schema = spymaster_single_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(
            required,
            vec!["clue", "number", "intended_targets", "danger_words"]
        );
    }

    #[test]
    fn test_list_schema_bounds_candidates() {
        let schema = spymaster_list_schema(8);
        assert_eq!(schema["properties"]["candidates"]["maxItems"], 8);
        assert_eq!(schema["properties"]["candidates"]["minItems"], 1);
    }

    #[test]
    fn test_guesser_schema_tracks_unrevealed_enum() {
        let words: Vec<String> = ["APPLE", "MOON", "APPLE"].iter().map(|s| s.to_string()).collect();
        let schema = guesser_schema(&words, 3);

        let enum_words = &schema["properties"]["guesses"]["items"]["properties"]["word"]["enum"];
        assert_eq!(enum_words, &json!(["APPLE", "MOON"]));
        assert_eq!(schema["properties"]["guesses"]["maxItems"], 3);
    }
}
