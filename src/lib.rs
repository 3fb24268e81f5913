// Game core (bank, engine, session, presenter) plus the terminal front end
// the `quizwheel` binary drives. Integration tests and benches use the core
// through this crate.

pub mod auth;
pub mod bank;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod presenter;
pub mod session;

pub mod app;
pub mod event;
pub mod ui;
