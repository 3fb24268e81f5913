use std::time::Duration;

use crate::engine::timer::TimerSettings;

/// Timing knobs the session runs with. Built from `Config` by the binary;
/// tests use `Default` or tweak fields directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSettings {
    pub timer: TimerSettings,
    pub spin_duration: Duration,
    /// Pause after the wheels stop before the pick is shown.
    pub settle_delay: Duration,
    /// How long the pick stays on screen before the question loads.
    pub reveal_delay: Duration,
    pub celebration_delay: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            timer: TimerSettings::default(),
            spin_duration: Duration::from_millis(4000),
            settle_delay: Duration::from_millis(500),
            reveal_delay: Duration::from_millis(2000),
            celebration_delay: Duration::from_millis(1000),
        }
    }
}
