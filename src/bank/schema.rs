use std::fmt;

use serde::{Deserialize, Serialize};

/// Question identifier as it appears in the data file. Files in the wild mix
/// integer and string ids, so both are accepted and compared as-is.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionId {
    Number(i64),
    Text(String),
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionId::Number(n) => write!(f, "{n}"),
            QuestionId::Text(s) => write!(f, "{s}"),
        }
    }
}

/// A pair of parallel English / Marathi strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Localized {
    pub en: String,
    pub mr: String,
}

impl Localized {
    pub fn new(en: &str, mr: &str) -> Self {
        Self {
            en: en.to_string(),
            mr: mr.to_string(),
        }
    }
}

/// One question exactly as stored on disk.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawQuestion {
    pub id: QuestionId,
    pub question_en: String,
    pub question_mr: String,
    pub options_en: Vec<String>,
    pub options_mr: Vec<String>,
    pub correct: i64,
}

/// A validated, immutable question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionRecord {
    pub id: QuestionId,
    pub prompt: Localized,
    pub options: Vec<Localized>,
    pub correct: usize,
}

impl QuestionRecord {
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct
    }

    pub fn correct_option(&self) -> &Localized {
        &self.options[self.correct]
    }
}

impl RawQuestion {
    /// Check the record against the bank invariants. The error string is the
    /// reason only; the caller attaches the category.
    pub(crate) fn validate(self) -> Result<QuestionRecord, String> {
        if self.options_en.is_empty() {
            return Err(format!("question {} has no options", self.id));
        }
        if self.options_en.len() != self.options_mr.len() {
            return Err(format!(
                "question {} has {} English options but {} Marathi options",
                self.id,
                self.options_en.len(),
                self.options_mr.len()
            ));
        }
        let correct = usize::try_from(self.correct)
            .ok()
            .filter(|&idx| idx < self.options_en.len())
            .ok_or_else(|| {
                format!(
                    "question {} has correct index {} but only {} options",
                    self.id,
                    self.correct,
                    self.options_en.len()
                )
            })?;

        let options = self
            .options_en
            .into_iter()
            .zip(self.options_mr)
            .map(|(en, mr)| Localized { en, mr })
            .collect();

        Ok(QuestionRecord {
            id: self.id,
            prompt: Localized {
                en: self.question_en,
                mr: self.question_mr,
            },
            options,
            correct,
        })
    }
}
