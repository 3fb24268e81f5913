pub mod game;
pub mod phase;
pub mod schedule;
pub mod settings;

pub use game::{ActiveQuestion, GameSession};
pub use phase::{Outcome, Phase, PhasePayload};
pub use settings::SessionSettings;
