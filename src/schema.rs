//! Question schema — the immutable ordered catalogue of intake questions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The input type of an intake question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Text,
    Number,
    Radio,
    Multiline,
    Date,
}

impl std::fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Radio => "radio",
            Self::Multiline => "multiline",
            Self::Date => "date",
        };
        write!(f, "{s}")
    }
}

/// A single intake question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Unique answer key, also the field-position lookup key.
    pub key: String,
    /// Label shown to the user.
    pub label: String,
    pub kind: QuestionKind,
    /// Choice set — present iff `kind == Radio`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
    #[serde(default)]
    pub placeholder: String,
}

impl Question {
    fn new(key: &str, label: &str, kind: QuestionKind) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            kind,
            choices: None,
            placeholder: String::new(),
        }
    }

    fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    fn with_choices(mut self, choices: &[&str]) -> Self {
        self.choices = Some(choices.iter().map(|c| c.to_string()).collect());
        self
    }
}

/// Full answer state for one session: every schema key is present from
/// session start with an empty-string default, and keys never change.
pub type AnswerSet = BTreeMap<String, String>;

/// Immutable ordered catalogue of intake questions.
///
/// Built once at startup and shared read-only across sessions.
#[derive(Debug, Clone)]
pub struct QuestionSchema {
    questions: Vec<Question>,
}

impl QuestionSchema {
    /// Build a schema, validating key uniqueness and radio choice sets.
    pub fn new(questions: Vec<Question>) -> Result<Self, ConfigError> {
        let mut seen = std::collections::HashSet::new();
        for q in &questions {
            if !seen.insert(q.key.clone()) {
                return Err(ConfigError::DuplicateQuestionKey(q.key.clone()));
            }
            if q.kind == QuestionKind::Radio
                && q.choices.as_ref().is_none_or(|c| c.is_empty())
            {
                return Err(ConfigError::RadioWithoutChoices { key: q.key.clone() });
            }
        }
        Ok(Self { questions })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Index of the last question.
    pub fn last_index(&self) -> usize {
        self.questions.len().saturating_sub(1)
    }

    /// Question at `index`, clamped into the valid range.
    pub fn get(&self, index: usize) -> &Question {
        &self.questions[index.min(self.last_index())]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    /// A fresh all-empty answer set covering the full key domain.
    pub fn empty_answers(&self) -> AnswerSet {
        self.questions
            .iter()
            .map(|q| (q.key.clone(), String::new()))
            .collect()
    }
}

/// The intake questions for the Missouri In Forma Pauperis fee-waiver form.
pub fn default_questions() -> QuestionSchema {
    use QuestionKind::*;
    let questions = vec![
        Question::new("full_name", "Your full legal name", Text).with_placeholder("Jane Doe"),
        Question::new("address", "Street address", Text).with_placeholder("123 Main St"),
        Question::new("city_state_zip", "City, State, ZIP", Text)
            .with_placeholder("Springfield, MO 65807"),
        Question::new("phone", "Phone number", Text).with_placeholder("(555) 555-5555"),
        Question::new("email", "Email (optional)", Text).with_placeholder("name@example.com"),
        Question::new("case_type", "Type of case", Radio).with_choices(&[
            "Dissolution of Marriage (Divorce)",
            "Legal Separation",
            "Modification/Post-Decree",
            "Other Family Law",
        ]),
        Question::new("employment_status", "Employment status", Radio).with_choices(&[
            "Employed",
            "Unemployed",
            "Self-employed",
            "Disabled",
            "Retired",
        ]),
        Question::new("monthly_income", "Total monthly income (USD)", Number)
            .with_placeholder("0"),
        Question::new("cash_on_hand", "Cash on hand (USD)", Number).with_placeholder("0"),
        Question::new("bank_balance", "Total bank account balances (USD)", Number)
            .with_placeholder("0"),
        Question::new("monthly_expenses", "Average monthly expenses (USD)", Number)
            .with_placeholder("0"),
        Question::new("dependents", "Number of dependents you support", Number)
            .with_placeholder("0"),
        Question::new(
            "government_assistance",
            "Do you receive public benefits? If yes, list programs.",
            Multiline,
        )
        .with_placeholder("Example: SNAP, Medicaid, TANF"),
        Question::new("debts", "Briefly list significant debts", Multiline)
            .with_placeholder("Credit cards, medical bills, etc."),
        Question::new(
            "hardship_explanation",
            "Explain why you cannot afford filing fees",
            Multiline,
        )
        .with_placeholder("Briefly describe your financial hardship."),
        Question::new("date_signed", "Date (MM/DD/YYYY)", Text).with_placeholder("MM/DD/YYYY"),
        Question::new("signature_name", "Type your name as signature", Text)
            .with_placeholder("Jane Doe"),
    ];
    QuestionSchema::new(questions).expect("default question catalogue is valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schema_has_seventeen_questions() {
        let schema = default_questions();
        assert_eq!(schema.len(), 17);
        assert_eq!(schema.last_index(), 16);
        assert_eq!(schema.get(0).key, "full_name");
        assert_eq!(schema.get(16).key, "signature_name");
    }

    #[test]
    fn radio_questions_carry_choices() {
        let schema = default_questions();
        for q in schema.iter() {
            match q.kind {
                QuestionKind::Radio => {
                    assert!(
                        q.choices.as_ref().is_some_and(|c| !c.is_empty()),
                        "{} should have choices",
                        q.key
                    );
                }
                _ => assert!(q.choices.is_none(), "{} should not have choices", q.key),
            }
        }
    }

    #[test]
    fn get_clamps_out_of_range_index() {
        let schema = default_questions();
        assert_eq!(schema.get(usize::MAX).key, "signature_name");
    }

    #[test]
    fn empty_answers_cover_full_domain() {
        let schema = default_questions();
        let answers = schema.empty_answers();
        assert_eq!(answers.len(), schema.len());
        for q in schema.iter() {
            assert_eq!(answers.get(&q.key).map(String::as_str), Some(""));
        }
    }

    #[test]
    fn duplicate_keys_rejected() {
        let questions = vec![
            Question::new("name", "Name", QuestionKind::Text),
            Question::new("name", "Name again", QuestionKind::Text),
        ];
        assert!(matches!(
            QuestionSchema::new(questions),
            Err(ConfigError::DuplicateQuestionKey(k)) if k == "name"
        ));
    }

    #[test]
    fn radio_without_choices_rejected() {
        let questions = vec![Question::new("pick", "Pick one", QuestionKind::Radio)];
        assert!(matches!(
            QuestionSchema::new(questions),
            Err(ConfigError::RadioWithoutChoices { key }) if key == "pick"
        ));
    }

    #[test]
    fn kind_display_matches_serde() {
        use QuestionKind::*;
        for kind in [Text, Number, Radio, Multiline, Date] {
            let display = format!("{kind}");
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(format!("\"{display}\""), json);
        }
    }
}
