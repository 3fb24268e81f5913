use thiserror::Error;

use crate::session::phase::{Phase, PhasePayload};

/// Sound cues the session asks for. Playback is up to the front end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cue {
    Spin,
    Correct,
    Wrong,
    Timeout,
    Tick,
    Warning,
    Critical,
    Celebrate,
}

impl Cue {
    pub fn as_str(self) -> &'static str {
        match self {
            Cue::Spin => "spin",
            Cue::Correct => "correct",
            Cue::Wrong => "wrong",
            Cue::Timeout => "timeout",
            Cue::Tick => "tick",
            Cue::Warning => "warning",
            Cue::Critical => "critical",
            Cue::Celebrate => "celebrate",
        }
    }
}

/// Receives semantic events from the session. Implementations render them;
/// they never reach back into the session. Every method defaults to a no-op.
pub trait Presenter {
    fn show_phase(&mut self, _phase: &Phase, _payload: &PhasePayload) {}
    fn update_score(&mut self, _score: u32) {}
    fn show_celebration(&mut self) {}
    fn play_cue(&mut self, _cue: Cue) {}
}

#[derive(Clone, Debug, PartialEq)]
pub enum PresenterEvent {
    Phase(Phase, PhasePayload),
    Score(u32),
    Celebration,
    Cue(Cue),
}

/// Keeps every event in order. Used by tests and by headless runs.
#[derive(Clone, Debug, Default)]
pub struct RecordingPresenter {
    pub events: Vec<PresenterEvent>,
}

impl RecordingPresenter {
    pub fn celebrations(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, PresenterEvent::Celebration))
            .count()
    }

    pub fn cues(&self) -> Vec<Cue> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PresenterEvent::Cue(cue) => Some(*cue),
                _ => None,
            })
            .collect()
    }

    pub fn last_payload(&self) -> Option<&PhasePayload> {
        self.events.iter().rev().find_map(|e| match e {
            PresenterEvent::Phase(_, payload) => Some(payload),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Presenter for RecordingPresenter {
    fn show_phase(&mut self, phase: &Phase, payload: &PhasePayload) {
        self.events.push(PresenterEvent::Phase(*phase, payload.clone()));
    }

    fn update_score(&mut self, score: u32) {
        self.events.push(PresenterEvent::Score(score));
    }

    fn show_celebration(&mut self) {
        self.events.push(PresenterEvent::Celebration);
    }

    fn play_cue(&mut self, cue: Cue) {
        self.events.push(PresenterEvent::Cue(cue));
    }
}

#[derive(Debug, Error)]
pub enum SoundError {
    #[error("audio output unavailable: {0}")]
    Unavailable(String),
}

/// Plays cues. A failure is an environment limitation and must not affect
/// the game.
pub trait SoundSink {
    fn play(&mut self, cue: Cue) -> Result<(), SoundError>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SilentSink;

impl SoundSink for SilentSink {
    fn play(&mut self, _cue: Cue) -> Result<(), SoundError> {
        Ok(())
    }
}
