use std::time::Duration;

use log::{debug, error, info};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::bank::{QuestionBank, QuestionRecord};
use crate::engine::scoring::{self, Streak};
use crate::engine::timer::{CountdownTimer, TimerSignal};
use crate::engine::wheel::{QUESTION_SEGMENTS, SpinOutcome, Spinner};
use crate::error::{QuizError, QuizResult};
use crate::presenter::{Cue, Presenter};
use crate::session::phase::{Outcome, Phase, PhasePayload};
use crate::session::schedule::{Deferred, Schedule};
use crate::session::settings::SessionSettings;

const TICK: Duration = Duration::from_secs(1);

#[derive(Clone, Debug)]
pub struct ActiveQuestion {
    pub category: String,
    pub question_number: u32,
    pub points: u32,
    pub question: QuestionRecord,
}

/// One player's game: score, streak, the question in play, and the wheels,
/// timer and bank that feed it. All mutation goes through the transition
/// methods; each checks the phase first and does nothing when called out of
/// turn.
pub struct GameSession<P: Presenter> {
    bank: QuestionBank,
    spinner: Spinner,
    timer: CountdownTimer,
    schedule: Schedule,
    settings: SessionSettings,
    presenter: P,
    rng: SmallRng,
    clock: Duration,
    next_tick_at: Option<Duration>,
    spin_started_at: Option<Duration>,
    phase: Phase,
    score: u32,
    streak: Streak,
    selection: Option<SpinOutcome>,
    current: Option<ActiveQuestion>,
}

impl<P: Presenter> GameSession<P> {
    pub fn new(bank: QuestionBank, settings: SessionSettings, presenter: P) -> Self {
        Self::with_rng(bank, settings, presenter, SmallRng::from_entropy())
    }

    pub fn with_rng(
        bank: QuestionBank,
        settings: SessionSettings,
        presenter: P,
        rng: SmallRng,
    ) -> Self {
        let spinner = Spinner::new(
            bank.category_count(),
            QUESTION_SEGMENTS,
            settings.spin_duration,
        );
        Self {
            bank,
            spinner,
            timer: CountdownTimer::new(settings.timer),
            schedule: Schedule::default(),
            settings,
            presenter,
            rng,
            clock: Duration::ZERO,
            next_tick_at: None,
            spin_started_at: None,
            phase: Phase::Idle,
            score: 0,
            streak: Streak::default(),
            selection: None,
            current: None,
        }
    }

    // -- accessors --

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn streak(&self) -> u32 {
        self.streak.count()
    }

    pub fn current(&self) -> Option<&ActiveQuestion> {
        self.current.as_ref()
    }

    pub fn current_question(&self) -> Option<&QuestionRecord> {
        self.current.as_ref().map(|c| &c.question)
    }

    pub fn current_category(&self) -> Option<&str> {
        self.current.as_ref().map(|c| c.category.as_str())
    }

    pub fn current_points(&self) -> u32 {
        self.current.as_ref().map_or(0, |c| c.points)
    }

    pub fn selection(&self) -> Option<SpinOutcome> {
        self.selection
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn timer(&self) -> &CountdownTimer {
        &self.timer
    }

    pub fn spinner(&self) -> &Spinner {
        &self.spinner
    }

    /// How far the current spin animation has progressed, 0.0..=1.0.
    pub fn spin_progress(&self) -> f64 {
        match self.spin_started_at {
            Some(start) => self.spinner.progress(self.clock.saturating_sub(start)),
            None => 1.0,
        }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn pending_actions(&self) -> usize {
        self.schedule.len()
    }

    // -- transitions --

    /// Spin both wheels. Only valid from Idle.
    pub fn begin_selection(&mut self) -> bool {
        if self.phase != Phase::Idle {
            debug!("Spin ignored in phase {}", self.phase.as_str());
            return false;
        }
        let Some(ticket) = self.spinner.spin(&mut self.rng) else {
            return false;
        };

        info!("Spinning wheels");
        self.phase = Phase::Selecting;
        self.selection = None;
        self.spin_started_at = Some(self.clock);
        self.schedule.push(
            self.clock + self.settings.spin_duration,
            Deferred::WheelsStopped(ticket),
        );
        self.presenter.play_cue(Cue::Spin);
        self.presenter.show_phase(&self.phase, &PhasePayload::Spinning);
        true
    }

    /// Put a question from `category` in play, worth `question_number * 10`.
    pub fn load_question(&mut self, category: &str, question_number: u32) -> QuizResult<()> {
        if !scoring::is_valid_question_number(question_number) {
            return Err(QuizError::InvalidQuestionNumber(question_number));
        }
        let question = self.bank.pick_unused(category, &mut self.rng)?.clone();

        self.stop_timer();
        self.timer.start()?;
        self.next_tick_at = Some(self.clock + TICK);

        let points = scoring::points_for(question_number);
        info!(
            "Loading question {} from '{category}' (#{question_number}, {points} pts)",
            question.id
        );
        let active = ActiveQuestion {
            category: category.to_string(),
            question_number,
            points,
            question,
        };
        let payload = PhasePayload::Question {
            category: active.category.clone(),
            question_number,
            points,
            question: active.question.clone(),
        };
        self.current = Some(active);
        self.selection = None;
        self.spin_started_at = None;
        self.phase = Phase::QuestionActive;
        self.presenter.show_phase(&self.phase, &payload);
        Ok(())
    }

    /// Answer the active question. Returns `None` if no question is waiting
    /// for an answer.
    pub fn submit_answer(&mut self, selected: usize) -> Option<Outcome> {
        if self.phase != Phase::QuestionActive {
            debug!("Answer {selected} ignored in phase {}", self.phase.as_str());
            return None;
        }
        // Stop first so a tick already due cannot expire this question.
        self.stop_timer();

        let Some(active) = self.current.as_ref() else {
            error!("Question active without a current question");
            self.abort(&QuizError::NoQuestionsAvailable(String::new()));
            return None;
        };
        let correct = active.question.correct;
        let points = active.points;

        let outcome = if active.question.is_correct(selected) {
            self.score += points;
            info!("Correct answer, +{points} (score {})", self.score);
            if self.streak.record_correct() {
                self.schedule.push(
                    self.clock + self.settings.celebration_delay,
                    Deferred::Celebrate,
                );
            }
            self.presenter.update_score(self.score);
            self.presenter.play_cue(Cue::Correct);
            Outcome::Correct { selected }
        } else {
            info!("Wrong answer {selected}, correct was {correct}");
            self.streak.reset();
            self.presenter.play_cue(Cue::Wrong);
            Outcome::Wrong { selected, correct }
        };

        self.resolve(outcome);
        Some(outcome)
    }

    /// Time ran out on the active question. Does nothing if it was already
    /// answered.
    pub fn on_timeout(&mut self) -> bool {
        if self.phase != Phase::QuestionActive {
            debug!("Timeout ignored in phase {}", self.phase.as_str());
            return false;
        }
        self.stop_timer();

        let Some(correct) = self.current.as_ref().map(|a| a.question.correct) else {
            self.abort(&QuizError::NoQuestionsAvailable(String::new()));
            return false;
        };
        info!("Time's up");
        self.streak.reset();
        self.presenter.play_cue(Cue::Timeout);
        self.resolve(Outcome::Timeout { correct });
        true
    }

    /// Leave the feedback screen for the wheels.
    pub fn next_question(&mut self) -> bool {
        if !matches!(self.phase, Phase::Answered(_)) {
            debug!("Next ignored in phase {}", self.phase.as_str());
            return false;
        }
        self.current = None;
        self.spinner.reset();
        self.enter_idle(PhasePayload::None);
        true
    }

    /// Start over: score, streak and served questions are all cleared and any
    /// spin or timer in flight is dropped. Valid in every phase.
    pub fn reset_game(&mut self) {
        info!("Resetting game (score was {})", self.score);
        self.stop_timer();
        self.schedule.clear();
        self.spinner.reset();
        self.bank.reset(None);
        self.score = 0;
        self.streak.reset();
        self.current = None;
        self.selection = None;
        self.presenter.update_score(self.score);
        self.enter_idle(PhasePayload::None);
    }

    /// Navigate away from the game. The round in play is abandoned, the score
    /// and served questions are kept.
    pub fn leave(&mut self) {
        if self.phase == Phase::Idle && !self.spinner.is_spinning() {
            return;
        }
        info!("Leaving game in phase {}", self.phase.as_str());
        self.stop_timer();
        self.schedule.retain_celebrations();
        self.spinner.reset();
        self.current = None;
        self.selection = None;
        self.enter_idle(PhasePayload::None);
    }

    /// Move the session clock forward, firing timer ticks and deferred
    /// actions in the order they fall due.
    pub fn advance(&mut self, elapsed: Duration) {
        let target = self.clock + elapsed;
        loop {
            let tick_at = self.next_tick_at.filter(|&t| t <= target);
            let action_at = self.schedule.next_deadline().filter(|&t| t <= target);
            match (tick_at, action_at) {
                (None, None) => break,
                (Some(t), Some(a)) if a < t => self.run_deferred_at(a),
                (Some(t), _) => self.run_tick_at(t),
                (None, Some(a)) => self.run_deferred_at(a),
            }
        }
        self.clock = target;
    }

    // -- internals --

    fn run_tick_at(&mut self, at: Duration) {
        self.clock = at;
        match self.timer.tick() {
            TimerSignal::Idle => self.next_tick_at = None,
            TimerSignal::Running(_) => self.next_tick_at = Some(at + TICK),
            TimerSignal::Warning(_) => {
                self.next_tick_at = Some(at + TICK);
                self.presenter.play_cue(Cue::Warning);
            }
            TimerSignal::Critical(_) => {
                self.next_tick_at = Some(at + TICK);
                self.presenter.play_cue(Cue::Critical);
            }
            TimerSignal::Expired => {
                self.next_tick_at = None;
                self.on_timeout();
            }
        }
    }

    fn run_deferred_at(&mut self, at: Duration) {
        self.clock = at;
        let Some(action) = self.schedule.pop_due(at) else {
            return;
        };
        match action {
            Deferred::Celebrate => {
                info!("Two in a row");
                self.presenter.show_celebration();
                self.presenter.play_cue(Cue::Celebrate);
            }
            Deferred::WheelsStopped(ticket) => {
                if self.phase != Phase::Selecting {
                    return;
                }
                let Some(outcome) = self.spinner.complete(ticket) else {
                    return;
                };
                self.selection = Some(outcome);
                self.spin_started_at = None;
                self.presenter.play_cue(Cue::Tick);
                self.schedule
                    .push(at + self.settings.settle_delay, Deferred::Reveal(outcome));
            }
            Deferred::Reveal(outcome) => {
                if self.phase != Phase::Selecting {
                    return;
                }
                let Some(category) = self.bank.category_at(outcome.category_index) else {
                    let index = outcome.category_index.to_string();
                    self.abort(&QuizError::UnknownCategory(index));
                    return;
                };
                let category = category.to_string();
                info!(
                    "Selected '{category}' question #{}",
                    outcome.question_number
                );
                self.presenter.show_phase(
                    &self.phase,
                    &PhasePayload::Selection {
                        category: category.clone(),
                        question_number: outcome.question_number,
                    },
                );
                self.schedule.push(
                    at + self.settings.reveal_delay,
                    Deferred::LoadSelection {
                        category,
                        question_number: outcome.question_number,
                    },
                );
            }
            Deferred::LoadSelection {
                category,
                question_number,
            } => {
                if self.phase != Phase::Selecting {
                    return;
                }
                if let Err(err) = self.load_question(&category, question_number) {
                    self.abort(&err);
                }
            }
        }
    }

    fn stop_timer(&mut self) {
        self.timer.stop();
        self.next_tick_at = None;
    }

    fn resolve(&mut self, outcome: Outcome) {
        self.phase = Phase::Answered(outcome);
        let payload = match self.current.as_ref() {
            Some(active) => {
                let correct_option = active.question.correct_option().clone();
                PhasePayload::Feedback {
                    outcome,
                    message: outcome.banner(&correct_option),
                    correct_option,
                }
            }
            None => PhasePayload::None,
        };
        self.presenter.show_phase(&self.phase, &payload);
    }

    /// Drop the round after a logic error and go back to the wheels.
    fn abort(&mut self, err: &QuizError) {
        error!("Aborting question: {err}");
        self.stop_timer();
        self.spinner.reset();
        self.current = None;
        self.selection = None;
        self.enter_idle(PhasePayload::Aborted {
            reason: err.to_string(),
        });
    }

    fn enter_idle(&mut self, payload: PhasePayload) {
        self.spin_started_at = None;
        self.phase = Phase::Idle;
        self.presenter.show_phase(&self.phase, &payload);
    }
}
