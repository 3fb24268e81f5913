use log::debug;
use thiserror::Error;

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum TimerError {
    #[error("countdown timer is already running")]
    AlreadyRunning,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerSettings {
    pub duration_secs: u32,
    pub warning_secs: u32,
    pub critical_secs: u32,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            duration_secs: 30,
            warning_secs: 10,
            critical_secs: 5,
        }
    }
}

/// What a single tick did. Warning and Critical are presentation hints and
/// carry the remaining seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerSignal {
    /// Ticked while stopped.
    Idle,
    Running(u32),
    Warning(u32),
    Critical(u32),
    /// Reached zero. Reported once per start.
    Expired,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerLevel {
    Normal,
    Warning,
    Critical,
}

#[derive(Clone, Debug)]
pub struct CountdownTimer {
    settings: TimerSettings,
    remaining: u32,
    running: bool,
}

impl CountdownTimer {
    pub fn new(settings: TimerSettings) -> Self {
        Self {
            settings,
            remaining: settings.duration_secs,
            running: false,
        }
    }

    pub fn start(&mut self) -> Result<(), TimerError> {
        if self.running {
            return Err(TimerError::AlreadyRunning);
        }
        self.remaining = self.settings.duration_secs;
        self.running = true;
        debug!("Timer started at {}s", self.remaining);
        Ok(())
    }

    /// Safe to call in any state. Returns whether the timer was running.
    pub fn stop(&mut self) -> bool {
        let was_running = self.running;
        self.running = false;
        if was_running {
            debug!("Timer stopped with {}s left", self.remaining);
        }
        was_running
    }

    pub fn tick(&mut self) -> TimerSignal {
        if !self.running {
            return TimerSignal::Idle;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            return TimerSignal::Expired;
        }
        if self.remaining == self.settings.critical_secs {
            TimerSignal::Critical(self.remaining)
        } else if self.remaining == self.settings.warning_secs {
            TimerSignal::Warning(self.remaining)
        } else {
            TimerSignal::Running(self.remaining)
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Share of the full duration still left, for the countdown gauge.
    pub fn fraction_remaining(&self) -> f64 {
        if self.settings.duration_secs == 0 {
            return 0.0;
        }
        self.remaining as f64 / self.settings.duration_secs as f64
    }

    pub fn level(&self) -> TimerLevel {
        if self.remaining <= self.settings.critical_secs {
            TimerLevel::Critical
        } else if self.remaining <= self.settings.warning_secs {
            TimerLevel::Warning
        } else {
            TimerLevel::Normal
        }
    }
}
