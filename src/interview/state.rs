//! Interview state machine — per-session progress through the question
//! catalogue.
//!
//! One `InterviewState` is owned exclusively by one session and lives only as
//! long as that session; there is no persistence. The only shared data is the
//! read-only question schema passed in at construction.

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::schema::{AnswerSet, Question, QuestionKind, QuestionSchema};

/// Outcome of a forward transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Moved to (or stayed within) a non-terminal position.
    Moved,
    /// The forward transition fired while already at the last question.
    /// The caller is expected to invoke the compositor with the answer set.
    /// Re-signaled on every further `advance` at the last step; invoking
    /// document generation exactly once is the caller's discipline.
    Finalize,
}

/// Per-session interview progress: current step plus the collected answers.
#[derive(Debug, Clone)]
pub struct InterviewState {
    schema: Arc<QuestionSchema>,
    step: usize,
    answers: AnswerSet,
}

impl InterviewState {
    /// Create a session at step 0 with an all-empty answer set.
    pub fn new(schema: Arc<QuestionSchema>) -> Self {
        let answers = schema.empty_answers();
        Self {
            schema,
            step: 0,
            answers,
        }
    }

    /// Reset to step 0 and clear every answer back to the empty string.
    pub fn start(&mut self) {
        self.step = 0;
        self.answers = self.schema.empty_answers();
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn total(&self) -> usize {
        self.schema.len()
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    /// The current question and its stored answer, for rendering.
    pub fn current(&self) -> (&Question, &str) {
        let question = self.schema.get(self.step);
        let value = self
            .answers
            .get(&question.key)
            .map(String::as_str)
            .unwrap_or_default();
        (question, value)
    }

    /// Normalize and store `raw` under the current question's key, then move
    /// forward one step. At the last step the position is unchanged and
    /// [`Transition::Finalize`] is returned instead; the value is saved
    /// before the signal so the last-entered answer is always included.
    pub fn advance(&mut self, raw: Option<&serde_json::Value>) -> Transition {
        self.store_current(raw);
        if self.step < self.schema.last_index() {
            self.step += 1;
            Transition::Moved
        } else {
            Transition::Finalize
        }
    }

    /// Normalize and store `raw` exactly as [`advance`](Self::advance) does,
    /// then move back one step, clamped at 0. Retreating at step 0 leaves the
    /// position alone but still persists the edited value.
    pub fn retreat(&mut self, raw: Option<&serde_json::Value>) {
        self.store_current(raw);
        self.step = self.step.saturating_sub(1);
    }

    fn store_current(&mut self, raw: Option<&serde_json::Value>) {
        let question = self.schema.get(self.step);
        let normalized = normalize_value(raw, question.kind);
        self.answers.insert(question.key.clone(), normalized);
    }
}

/// Type-aware coercion of a raw input value into its canonical stored string.
///
/// Never fails: a number that does not parse is stored verbatim as an opaque
/// string (documented fallback), and an absent value becomes the empty
/// string.
pub fn normalize_value(raw: Option<&serde_json::Value>, kind: QuestionKind) -> String {
    let text = match raw {
        None | Some(serde_json::Value::Null) => return String::new(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    match kind {
        QuestionKind::Number => normalize_number(&text),
        _ => text,
    }
}

/// Preserve whole numbers cleanly while supporting decimal entries:
/// `"1500.0"` → `"1500"`, `"1500.5"` → `"1500.50"`, `"abc"` → `"abc"`.
fn normalize_number(text: &str) -> String {
    match Decimal::from_str(text.trim()) {
        Ok(n) if n.fract().is_zero() => n.trunc().normalize().to_string(),
        Ok(n) => {
            let mut rounded = n.round_dp(2);
            rounded.rescale(2);
            rounded.to_string()
        }
        Err(_) => {
            tracing::debug!(value = text, "Numeric normalization fell back to raw text");
            text.to_string()
        }
    }
}
