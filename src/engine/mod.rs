pub mod scoring;
pub mod timer;
pub mod wheel;

pub use timer::{CountdownTimer, TimerError, TimerLevel, TimerSettings, TimerSignal};
pub use wheel::{SpinOutcome, SpinTicket, Spinner, Wheel};
