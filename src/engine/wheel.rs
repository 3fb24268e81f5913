use std::time::Duration;

use log::debug;
use rand::Rng;

pub const QUESTION_SEGMENTS: usize = 10;

const MIN_FULL_TURNS: f64 = 5.0;
const EXTRA_TURNS: f64 = 3.0;

/// Bring any accumulated angle into [0, 360).
pub fn normalize(degrees: f64) -> f64 {
    ((degrees % 360.0) + 360.0) % 360.0
}

/// Segment under the fixed pointer at 0° for a wheel turned by `rotation`
/// degrees. Both wheels resolve through this one function.
pub fn segment_at(rotation: f64, segment_count: usize) -> usize {
    if segment_count == 0 {
        return 0;
    }
    let segment_angle = 360.0 / segment_count as f64;
    let raw = ((360.0 - normalize(rotation)) / segment_angle).floor() as usize;
    raw % segment_count
}

/// Rotation that parks the middle of `index` under the pointer.
pub fn rotation_for_segment(index: usize, segment_count: usize) -> f64 {
    if segment_count == 0 {
        return 0.0;
    }
    let segment_angle = 360.0 / segment_count as f64;
    normalize(360.0 - (index as f64 + 0.5) * segment_angle)
}

fn ease_out_cubic(progress: f64) -> f64 {
    1.0 - (1.0 - progress).powi(3)
}

#[derive(Clone, Debug)]
pub struct Wheel {
    pub segment_count: usize,
    pub rotation: f64,
    start_rotation: f64,
    target_rotation: f64,
    pub selected: Option<usize>,
}

impl Wheel {
    pub fn new(segment_count: usize) -> Self {
        Self {
            segment_count,
            rotation: 0.0,
            start_rotation: 0.0,
            target_rotation: 0.0,
            selected: None,
        }
    }

    fn aim(&mut self, target: f64) {
        self.start_rotation = self.rotation;
        self.target_rotation = target;
        self.selected = None;
    }

    fn settle(&mut self) -> usize {
        self.rotation = self.target_rotation;
        let index = segment_at(self.rotation, self.segment_count);
        self.selected = Some(index);
        index
    }

    fn reset(&mut self) {
        self.rotation = 0.0;
        self.start_rotation = 0.0;
        self.target_rotation = 0.0;
        self.selected = None;
    }

    /// Animated angle `progress` of the way through a spin. Display only.
    pub fn rotation_at(&self, progress: f64) -> f64 {
        let eased = ease_out_cubic(progress.clamp(0.0, 1.0));
        self.start_rotation + (self.target_rotation - self.start_rotation) * eased
    }

    /// Segment currently under the pointer at the animated angle.
    pub fn segment_under_pointer(&self, progress: f64) -> usize {
        segment_at(self.rotation_at(progress), self.segment_count)
    }
}

/// Proof that a spin was started in the current generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpinTicket {
    generation: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpinOutcome {
    pub category_index: usize,
    /// 1-based question slot.
    pub question_number: u32,
}

/// The category wheel and the question-number wheel, spun together.
#[derive(Clone, Debug)]
pub struct Spinner {
    pub category: Wheel,
    pub question: Wheel,
    spinning: bool,
    generation: u64,
    duration: Duration,
}

impl Spinner {
    pub fn new(category_segments: usize, question_segments: usize, duration: Duration) -> Self {
        Self {
            category: Wheel::new(category_segments),
            question: Wheel::new(question_segments),
            spinning: false,
            generation: 0,
            duration,
        }
    }

    pub fn is_spinning(&self) -> bool {
        self.spinning
    }

    /// Start both wheels toward random resting angles. Returns `None` while a
    /// previous spin is still waiting to be completed.
    pub fn spin<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<SpinTicket> {
        let category_target = self.category.rotation
            + (MIN_FULL_TURNS + rng.r#gen::<f64>() * EXTRA_TURNS) * 360.0
            + rng.r#gen::<f64>() * 360.0;
        let question_target = self.question.rotation
            + (MIN_FULL_TURNS + rng.r#gen::<f64>() * EXTRA_TURNS) * 360.0
            + rng.r#gen::<f64>() * 360.0;
        self.spin_to(category_target, question_target)
    }

    /// Start both wheels toward explicit resting angles.
    pub fn spin_to(&mut self, category_target: f64, question_target: f64) -> Option<SpinTicket> {
        if self.spinning {
            debug!("Spin ignored: wheels already spinning");
            return None;
        }
        self.spinning = true;
        self.category.aim(category_target);
        self.question.aim(question_target);
        Some(SpinTicket {
            generation: self.generation,
        })
    }

    /// Fraction of the spin animation completed after `elapsed`.
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Commit the final angles and resolve both selections. A ticket issued
    /// before the last `reset` yields `None` and changes nothing.
    pub fn complete(&mut self, ticket: SpinTicket) -> Option<SpinOutcome> {
        if ticket.generation != self.generation || !self.spinning {
            debug!(
                "Discarding stale spin (ticket generation {}, current {})",
                ticket.generation, self.generation
            );
            return None;
        }
        self.spinning = false;
        let category_index = self.category.settle();
        let question_index = self.question.settle();
        debug!(
            "Wheels stopped at {:.2}° / {:.2}°: category {category_index}, question {}",
            normalize(self.category.rotation),
            normalize(self.question.rotation),
            question_index + 1
        );
        Some(SpinOutcome {
            category_index,
            question_number: question_index as u32 + 1,
        })
    }

    pub fn reset(&mut self) {
        self.category.reset();
        self.question.reset();
        self.spinning = false;
        self.generation = self.generation.wrapping_add(1);
    }
}
