use std::io::{self, Write};
use std::time::{Duration, Instant};

use log::debug;

use crate::presenter::{Cue, Presenter, SoundError, SoundSink};
use crate::session::{Phase, PhasePayload};

pub fn category_icon(category: &str) -> &'static str {
    match category {
        "Fire Safety" => "🔥",
        "Electrical Safety" => "⚡",
        "Road Safety" => "🚗",
        "Lockout Tagout" => "🔒",
        "Material Handling" => "📦",
        "Working at Height" => "🪜",
        "First Aid" => "🏥",
        "Machine Guarding" => "⚙",
        "Chemical Safety" => "🧪",
        "Sustainability" => "♻",
        _ => "📋",
    }
}

/// Rings the terminal bell. Spin and tick cues stay silent, a bell per
/// animation frame is just noise.
pub struct BellSink;

impl SoundSink for BellSink {
    fn play(&mut self, cue: Cue) -> Result<(), SoundError> {
        if matches!(cue, Cue::Spin | Cue::Tick) {
            return Ok(());
        }
        let mut out = io::stdout();
        out.write_all(b"\x07")
            .and_then(|_| out.flush())
            .map_err(|e| SoundError::Unavailable(e.to_string()))
    }
}

/// Keeps what the session last reported so the render pass can draw it.
pub struct TuiPresenter {
    sink: Box<dyn SoundSink>,
    muted: bool,
    payload: PhasePayload,
    celebration_display: Duration,
    celebration_until: Option<Instant>,
}

impl TuiPresenter {
    pub fn new(sink: Box<dyn SoundSink>, muted: bool, celebration_display: Duration) -> Self {
        Self {
            sink,
            muted,
            payload: PhasePayload::None,
            celebration_display,
            celebration_until: None,
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        debug!("Sound {}", if self.muted { "muted" } else { "unmuted" });
        self.muted
    }

    pub fn payload(&self) -> &PhasePayload {
        &self.payload
    }

    /// Feedback or error line for the current phase, if any.
    pub fn banner(&self) -> Option<&str> {
        match &self.payload {
            PhasePayload::Feedback { message, .. } => Some(message),
            PhasePayload::Aborted { reason } => Some(reason),
            _ => None,
        }
    }

    pub fn is_celebrating(&self, now: Instant) -> bool {
        self.celebration_until.is_some_and(|until| now < until)
    }

    pub fn expire_celebration(&mut self, now: Instant) {
        if self.celebration_until.is_some_and(|until| now >= until) {
            self.celebration_until = None;
        }
    }
}

impl Presenter for TuiPresenter {
    fn show_phase(&mut self, _phase: &Phase, payload: &PhasePayload) {
        self.payload = payload.clone();
    }

    fn show_celebration(&mut self) {
        self.celebration_until = Some(Instant::now() + self.celebration_display);
    }

    fn play_cue(&mut self, cue: Cue) {
        if self.muted {
            return;
        }
        if let Err(err) = self.sink.play(cue) {
            debug!("Could not play {} cue: {err}", cue.as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::presenter::SilentSink;

    struct CountingSink(Rc<RefCell<Vec<Cue>>>);

    impl SoundSink for CountingSink {
        fn play(&mut self, cue: Cue) -> Result<(), SoundError> {
            self.0.borrow_mut().push(cue);
            Err(SoundError::Unavailable("no audio device".to_string()))
        }
    }

    #[test]
    fn test_muted_presenter_plays_nothing() {
        let played = Rc::new(RefCell::new(Vec::new()));
        let mut presenter = TuiPresenter::new(
            Box::new(CountingSink(played.clone())),
            true,
            Duration::from_millis(2500),
        );
        presenter.play_cue(Cue::Correct);
        assert!(played.borrow().is_empty());

        assert!(!presenter.toggle_mute());
        // Failures are swallowed.
        presenter.play_cue(Cue::Wrong);
        assert_eq!(*played.borrow(), vec![Cue::Wrong]);
    }

    #[test]
    fn test_celebration_expires() {
        let mut presenter =
            TuiPresenter::new(Box::new(SilentSink), true, Duration::from_millis(2500));
        presenter.show_celebration();
        let now = Instant::now();
        assert!(presenter.is_celebrating(now));
        let later = now + Duration::from_secs(3);
        assert!(!presenter.is_celebrating(later));
        presenter.expire_celebration(later);
        assert!(!presenter.is_celebrating(now));
    }

    #[test]
    fn test_banner_follows_payload() {
        let mut presenter =
            TuiPresenter::new(Box::new(SilentSink), true, Duration::from_millis(2500));
        assert_eq!(presenter.banner(), None);
        presenter.show_phase(
            &Phase::Idle,
            &PhasePayload::Aborted {
                reason: "unknown category: Space".to_string(),
            },
        );
        assert_eq!(presenter.banner(), Some("unknown category: Space"));
    }

    #[test]
    fn test_every_known_category_has_icon() {
        assert_eq!(category_icon("Fire Safety"), "🔥");
        assert_eq!(category_icon("Unknown"), "📋");
    }
}
