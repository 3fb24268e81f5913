pub const POINTS_PER_SLOT: u32 = 10;
pub const MAX_QUESTION_NUMBER: u32 = 10;

/// Consecutive correct answers needed for a celebration.
pub const CELEBRATION_STREAK: u32 = 2;

/// Reward for the question-number wheel's slot, independent of difficulty.
pub fn points_for(question_number: u32) -> u32 {
    question_number * POINTS_PER_SLOT
}

pub fn is_valid_question_number(question_number: u32) -> bool {
    (1..=MAX_QUESTION_NUMBER).contains(&question_number)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Streak {
    count: u32,
}

impl Streak {
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Count a correct answer. Returns true when the streak reached the
    /// celebration length; the count then starts over from zero.
    pub fn record_correct(&mut self) -> bool {
        self.count += 1;
        if self.count == CELEBRATION_STREAK {
            self.count = 0;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_scale_with_slot() {
        assert_eq!(points_for(1), 10);
        assert_eq!(points_for(7), 70);
        assert_eq!(points_for(10), 100);
    }

    #[test]
    fn test_question_number_range() {
        assert!(!is_valid_question_number(0));
        assert!(is_valid_question_number(1));
        assert!(is_valid_question_number(10));
        assert!(!is_valid_question_number(11));
    }

    #[test]
    fn test_streak_celebrates_every_pair() {
        let mut streak = Streak::default();
        let fired: Vec<bool> = (0..5).map(|_| streak.record_correct()).collect();
        assert_eq!(fired, vec![false, true, false, true, false]);
        assert_eq!(streak.count(), 1);
    }

    #[test]
    fn test_miss_breaks_streak() {
        let mut streak = Streak::default();
        assert!(!streak.record_correct());
        streak.reset();
        assert!(!streak.record_correct());
        assert!(streak.record_correct());
    }
}
