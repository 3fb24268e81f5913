use crate::bank::{Localized, QuestionRecord};

/// How a question was resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Correct { selected: usize },
    Wrong { selected: usize, correct: usize },
    Timeout { correct: usize },
}

impl Outcome {
    pub fn is_correct(&self) -> bool {
        matches!(self, Outcome::Correct { .. })
    }

    pub fn correct_index(&self) -> usize {
        match *self {
            Outcome::Correct { selected } => selected,
            Outcome::Wrong { correct, .. } | Outcome::Timeout { correct } => correct,
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        match *self {
            Outcome::Correct { selected } | Outcome::Wrong { selected, .. } => Some(selected),
            Outcome::Timeout { .. } => None,
        }
    }

    /// Feedback banner text shown under the question.
    pub fn banner(&self, correct_option: &Localized) -> String {
        match self {
            Outcome::Correct { .. } => "Correct! Well done!".to_string(),
            Outcome::Wrong { .. } => {
                format!("Wrong! The correct answer is: {}", correct_option.en)
            }
            Outcome::Timeout { .. } => {
                format!("Time's up! The correct answer is: {}", correct_option.en)
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Selecting,
    QuestionActive,
    Answered(Outcome),
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Selecting => "selecting",
            Phase::QuestionActive => "question-active",
            Phase::Answered(_) => "answered",
        }
    }
}

/// What the presenter needs to draw a phase change.
#[derive(Clone, Debug, PartialEq)]
pub enum PhasePayload {
    None,
    /// Wheels are turning.
    Spinning,
    /// Wheels stopped; the pick is on screen before the question loads.
    Selection {
        category: String,
        question_number: u32,
    },
    Question {
        category: String,
        question_number: u32,
        points: u32,
        question: QuestionRecord,
    },
    Feedback {
        outcome: Outcome,
        correct_option: Localized,
        message: String,
    },
    /// The round was dropped because of a logic error.
    Aborted { reason: String },
}
