pub mod schema;
pub mod tracker;

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::{info, warn};
use rand::Rng;
use rust_embed::Embed;

use crate::error::{QuizError, QuizResult};
pub use schema::{Localized, QuestionId, QuestionRecord, RawQuestion};
pub use tracker::UsedQuestionTracker;

#[derive(Embed)]
#[folder = "assets/bank/"]
struct BankAssets;

#[derive(Clone, Debug)]
pub struct Category {
    pub name: String,
    pub questions: Vec<QuestionRecord>,
}

/// Questions indexed by category, in data-file order, plus the record of
/// which ones have been served since the last reset.
#[derive(Clone, Debug)]
pub struct QuestionBank {
    categories: Vec<Category>,
    tracker: UsedQuestionTracker,
}

impl QuestionBank {
    /// Validate every record before building anything: either the whole
    /// dataset is accepted or an error is returned.
    pub fn load(raw: Vec<(String, Vec<RawQuestion>)>) -> QuizResult<Self> {
        if raw.is_empty() {
            return Err(QuizError::format("", "dataset has no categories"));
        }

        let mut categories = Vec::with_capacity(raw.len());
        for (name, questions) in raw {
            if questions.is_empty() {
                return Err(QuizError::format(&name, "category has no questions"));
            }
            if categories.iter().any(|c: &Category| c.name == name) {
                return Err(QuizError::format(&name, "category appears twice"));
            }

            let mut seen = HashSet::new();
            let mut records = Vec::with_capacity(questions.len());
            for question in questions {
                let record = question
                    .validate()
                    .map_err(|reason| QuizError::format(&name, reason))?;
                if !seen.insert(record.id.clone()) {
                    return Err(QuizError::format(
                        &name,
                        format!("duplicate question id {}", record.id),
                    ));
                }
                records.push(record);
            }
            categories.push(Category {
                name,
                questions: records,
            });
        }

        let tracker = UsedQuestionTracker::new(categories.iter().map(|c| c.name.as_str()));
        info!(
            "Question bank loaded: {} categories, {} questions",
            categories.len(),
            categories.iter().map(|c| c.questions.len()).sum::<usize>()
        );
        Ok(Self {
            categories,
            tracker,
        })
    }

    pub fn from_json(json: &str) -> QuizResult<Self> {
        // preserve_order keeps the categories in file order, which is the
        // order the category wheel lays its segments out in.
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
        let mut raw = Vec::with_capacity(map.len());
        for (name, value) in map {
            let questions: Vec<RawQuestion> = serde_json::from_value(value)
                .map_err(|e| QuizError::DataLoad(format!("category '{name}': {e}")))?;
            raw.push((name, questions));
        }
        Self::load(raw)
    }

    pub fn from_path(path: &Path) -> QuizResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| QuizError::DataLoad(format!("{}: {e}", path.display())))?;
        Self::from_json(&content)
    }

    /// The question set compiled into the binary.
    pub fn bundled() -> QuizResult<Self> {
        let file = BankAssets::get("questions.json")
            .ok_or_else(|| QuizError::DataLoad("bundled questions.json missing".to_string()))?;
        let content = std::str::from_utf8(file.data.as_ref())
            .map_err(|e| QuizError::DataLoad(e.to_string()))?;
        Self::from_json(content)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn category_at(&self, index: usize) -> Option<&str> {
        self.categories.get(index).map(|c| c.name.as_str())
    }

    pub fn contains(&self, category: &str) -> bool {
        self.find(category).is_some()
    }

    pub fn questions(&self, category: &str) -> Option<&[QuestionRecord]> {
        self.find(category).map(|c| c.questions.as_slice())
    }

    pub fn question_count(&self, category: &str) -> usize {
        self.find(category).map_or(0, |c| c.questions.len())
    }

    pub fn used_count(&self, category: &str) -> usize {
        self.tracker.used_count(category)
    }

    fn find(&self, category: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == category)
    }

    /// Pick a question from `category` that has not been served since the
    /// category was last reset. An exhausted category is cleared and picked
    /// from again.
    pub fn pick_unused<R: Rng + ?Sized>(
        &mut self,
        category: &str,
        rng: &mut R,
    ) -> QuizResult<&QuestionRecord> {
        let idx = self
            .categories
            .iter()
            .position(|c| c.name == category)
            .ok_or_else(|| QuizError::UnknownCategory(category.to_string()))?;
        let questions = &self.categories[idx].questions;

        let mut available: Vec<&QuestionRecord> = questions
            .iter()
            .filter(|q| !self.tracker.is_used(category, &q.id))
            .collect();

        if available.is_empty() {
            info!("All questions used in '{category}', resetting");
            self.tracker.clear(category);
            available = questions.iter().collect();
        }

        if available.is_empty() {
            // load() rejects empty categories, so this is unreachable for a
            // bank built through it.
            warn!("Category '{category}' has no questions");
            return Err(QuizError::NoQuestionsAvailable(category.to_string()));
        }

        let question = available[rng.gen_range(0..available.len())];
        self.tracker.mark_used(category, question.id.clone());
        Ok(question)
    }

    /// Forget served questions for one category, or for all of them.
    pub fn reset(&mut self, category: Option<&str>) {
        match category {
            Some(name) => self.tracker.clear(name),
            None => self.tracker.clear_all(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::io::Write;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    const SAMPLE: &str = r#"{
        "Fire Safety": [
            {"id": 1, "question_en": "Q1", "question_mr": "प्र1", "options_en": ["a", "b"], "options_mr": ["अ", "ब"], "correct": 0},
            {"id": 2, "question_en": "Q2", "question_mr": "प्र2", "options_en": ["a", "b"], "options_mr": ["अ", "ब"], "correct": 1},
            {"id": "fs-3", "question_en": "Q3", "question_mr": "प्र3", "options_en": ["a", "b", "c"], "options_mr": ["अ", "ब", "क"], "correct": 2}
        ],
        "First Aid": [
            {"id": 1, "question_en": "Q1", "question_mr": "प्र1", "options_en": ["a"], "options_mr": ["अ"], "correct": 0}
        ]
    }"#;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(7)
    }

    #[test]
    fn test_from_json_preserves_category_order() {
        let bank = QuestionBank::from_json(SAMPLE).unwrap();
        let names: Vec<&str> = bank.categories().collect();
        assert_eq!(names, vec!["Fire Safety", "First Aid"]);
        assert_eq!(bank.question_count("Fire Safety"), 3);
        assert_eq!(bank.category_at(1), Some("First Aid"));
        assert_eq!(bank.used_count("Fire Safety"), 0);
    }

    #[test]
    fn test_pick_unused_exhausts_then_resets() {
        let mut bank = QuestionBank::from_json(SAMPLE).unwrap();
        let mut rng = rng();

        let mut seen = HashSet::new();
        for _ in 0..3 {
            let q = bank.pick_unused("Fire Safety", &mut rng).unwrap();
            assert!(seen.insert(q.id.clone()), "repeated {} before exhaustion", q.id);
        }
        assert_eq!(bank.used_count("Fire Safety"), 3);

        let fourth = bank.pick_unused("Fire Safety", &mut rng).unwrap().id.clone();
        assert!(seen.contains(&fourth));
        assert_eq!(bank.used_count("Fire Safety"), 1);
    }

    #[test]
    fn test_single_question_category_repeats_forever() {
        let mut bank = QuestionBank::from_json(SAMPLE).unwrap();
        let mut rng = rng();
        for _ in 0..5 {
            let q = bank.pick_unused("First Aid", &mut rng).unwrap();
            assert_eq!(q.id, QuestionId::Number(1));
            assert!(bank.used_count("First Aid") <= 1);
        }
    }

    #[test]
    fn test_pick_unknown_category() {
        let mut bank = QuestionBank::from_json(SAMPLE).unwrap();
        let err = bank.pick_unused("Road Safety", &mut rng()).unwrap_err();
        assert_eq!(err, QuizError::UnknownCategory("Road Safety".to_string()));
    }

    #[test]
    fn test_reset_one_and_all() {
        let mut bank = QuestionBank::from_json(SAMPLE).unwrap();
        let mut rng = rng();
        bank.pick_unused("Fire Safety", &mut rng).unwrap();
        bank.pick_unused("First Aid", &mut rng).unwrap();

        bank.reset(Some("Fire Safety"));
        assert_eq!(bank.used_count("Fire Safety"), 0);
        assert_eq!(bank.used_count("First Aid"), 1);

        bank.reset(None);
        assert_eq!(bank.used_count("First Aid"), 0);
    }

    #[test]
    fn test_load_rejects_empty_category() {
        let err = QuestionBank::from_json(r#"{"Fire Safety": []}"#).unwrap_err();
        assert!(matches!(err, QuizError::DataFormat { ref category, .. } if category == "Fire Safety"));
        assert!(err.is_startup_fatal());
    }

    #[test]
    fn test_load_rejects_bad_correct_index() {
        let json = r#"{"Fire Safety": [
            {"id": 1, "question_en": "Q", "question_mr": "प्र", "options_en": ["a"], "options_mr": ["अ"], "correct": 3}
        ]}"#;
        assert!(matches!(
            QuestionBank::from_json(json),
            Err(QuizError::DataFormat { .. })
        ));
    }

    #[test]
    fn test_load_rejects_duplicate_ids() {
        let json = r#"{"Fire Safety": [
            {"id": 1, "question_en": "Q", "question_mr": "प्र", "options_en": ["a"], "options_mr": ["अ"], "correct": 0},
            {"id": 1, "question_en": "Q", "question_mr": "प्र", "options_en": ["a"], "options_mr": ["अ"], "correct": 0}
        ]}"#;
        assert!(matches!(
            QuestionBank::from_json(json),
            Err(QuizError::DataFormat { .. })
        ));
    }

    #[test]
    fn test_malformed_json_is_load_error() {
        assert!(matches!(
            QuestionBank::from_json("{not json"),
            Err(QuizError::DataLoad(_))
        ));
        assert!(matches!(
            QuestionBank::from_json(r#"{"Fire Safety": [{"id": 1}]}"#),
            Err(QuizError::DataLoad(_))
        ));
    }

    #[test]
    fn test_from_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = QuestionBank::from_path(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, QuizError::DataLoad(_)));
    }

    #[test]
    fn test_from_path_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let bank = QuestionBank::from_path(file.path()).unwrap();
        assert_eq!(bank.category_count(), 2);
    }

    #[test]
    fn test_bundled_bank_has_ten_categories() {
        let bank = QuestionBank::bundled().unwrap();
        assert_eq!(bank.category_count(), 10);
        for name in bank.categories() {
            assert!(bank.question_count(name) >= 3, "{name} is too small");
        }
    }
}
