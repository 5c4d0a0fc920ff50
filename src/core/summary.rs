//! Transcript summarization and sentiment scoring.
//!
//! Both helpers are deterministic word-lexicon passes over the caller side of
//! a transcript, good enough for history views and analytics without any
//! model dependency. Finalize accepts externally computed values as well;
//! these are the default producers.

use crate::core::session::{TranscriptTurn, TurnRole};
use serde::{Deserialize, Serialize};

/// Maximum length of the derived headline, in characters.
const HEADLINE_MAX_CHARS: usize = 120;

/// Phrases that indicate the caller wanted a message passed on.
const MESSAGE_MARKERS: &[&str] = &[
    "leave a message",
    "take a message",
    "tell him",
    "tell her",
    "tell them",
    "let him know",
    "let her know",
    "let them know",
    "pass along",
    "call me back",
    "call back",
];

const POSITIVE_WORDS: &[&str] = &[
    "thanks", "thank", "great", "good", "wonderful", "perfect", "appreciate", "happy", "lovely",
    "excellent", "helpful", "pleased",
];

const NEGATIVE_WORDS: &[&str] = &[
    "angry", "terrible", "awful", "bad", "unacceptable", "frustrated", "annoyed", "complaint",
    "problem", "broken", "horrible", "upset", "ridiculous",
];

/// Derived digest of a finished interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSummary {
    /// First caller utterance, truncated - what the interaction was about
    pub headline: String,
    /// Whether the caller asked for a message to be passed on
    pub message_taken: bool,
    /// Number of caller turns in the transcript
    pub caller_turns: usize,
    /// Total number of turns in the transcript
    pub total_turns: usize,
}

impl CallSummary {
    /// Serializes the summary for the interaction record's JSON column.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Parses a stored summary blob.
    #[must_use]
    pub fn from_json(raw: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(raw.clone()).ok()
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    text.chars().take(max_chars).collect()
}

/// Builds a summary from an ordered transcript.
///
/// The headline is the first caller utterance; `message_taken` is set when
/// any caller turn contains a message-taking phrase. An empty transcript
/// yields an empty headline and no message.
#[must_use]
pub fn summarize_transcript(transcript: &[TranscriptTurn]) -> CallSummary {
    let caller_turns: Vec<&TranscriptTurn> = transcript
        .iter()
        .filter(|turn| turn.role == TurnRole::Caller)
        .collect();

    let headline = caller_turns
        .first()
        .map(|turn| truncate_chars(turn.content.trim(), HEADLINE_MAX_CHARS))
        .unwrap_or_default();

    let message_taken = caller_turns.iter().any(|turn| {
        let text = turn.content.to_lowercase();
        MESSAGE_MARKERS.iter().any(|marker| text.contains(marker))
    });

    CallSummary {
        headline,
        message_taken,
        caller_turns: caller_turns.len(),
        total_turns: transcript.len(),
    }
}

/// Scores the caller side of a transcript in [-1.0, 1.0].
///
/// Counts positive and negative lexicon hits over the caller turns and
/// normalizes by the total hit count; a transcript with no sentiment words
/// scores a neutral 0.0.
#[must_use]
pub fn sentiment_score(transcript: &[TranscriptTurn]) -> f64 {
    let mut positive = 0_u32;
    let mut negative = 0_u32;

    for turn in transcript {
        if turn.role != TurnRole::Caller {
            continue;
        }
        for word in turn
            .content
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
        {
            if word.is_empty() {
                continue;
            }
            if POSITIVE_WORDS.contains(&word) {
                positive += 1;
            } else if NEGATIVE_WORDS.contains(&word) {
                negative += 1;
            }
        }
    }

    let total = positive + negative;
    if total == 0 {
        return 0.0;
    }
    (f64::from(positive) - f64::from(negative)) / f64::from(total)
}
