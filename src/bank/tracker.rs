use std::collections::{HashMap, HashSet};

use crate::bank::schema::QuestionId;

/// Per-category record of question ids already served this game.
#[derive(Clone, Debug, Default)]
pub struct UsedQuestionTracker {
    used: HashMap<String, HashSet<QuestionId>>,
}

impl UsedQuestionTracker {
    pub fn new<'a>(categories: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            used: categories
                .into_iter()
                .map(|c| (c.to_string(), HashSet::new()))
                .collect(),
        }
    }

    pub fn is_used(&self, category: &str, id: &QuestionId) -> bool {
        self.used.get(category).is_some_and(|set| set.contains(id))
    }

    pub fn mark_used(&mut self, category: &str, id: QuestionId) {
        self.used.entry(category.to_string()).or_default().insert(id);
    }

    pub fn used_count(&self, category: &str) -> usize {
        self.used.get(category).map_or(0, HashSet::len)
    }

    pub fn clear(&mut self, category: &str) {
        if let Some(set) = self.used.get_mut(category) {
            set.clear();
        }
    }

    pub fn clear_all(&mut self) {
        for set in self.used.values_mut() {
            set.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_and_clear() {
        let mut tracker = UsedQuestionTracker::new(["Fire Safety", "First Aid"]);
        tracker.mark_used("Fire Safety", QuestionId::Number(1));
        tracker.mark_used("Fire Safety", QuestionId::Number(1));
        tracker.mark_used("First Aid", QuestionId::Text("a".to_string()));

        assert_eq!(tracker.used_count("Fire Safety"), 1);
        assert!(tracker.is_used("Fire Safety", &QuestionId::Number(1)));
        assert!(!tracker.is_used("First Aid", &QuestionId::Number(1)));

        tracker.clear("Fire Safety");
        assert_eq!(tracker.used_count("Fire Safety"), 0);
        assert_eq!(tracker.used_count("First Aid"), 1);

        tracker.clear_all();
        assert_eq!(tracker.used_count("First Aid"), 0);
    }
}
