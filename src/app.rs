use std::time::Instant;

use log::info;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::auth::{SessionGate, StaticCredentials};
use crate::bank::QuestionBank;
use crate::config::Config;
use crate::presenter::SoundSink;
use crate::session::{GameSession, Phase};
use crate::ui::components::menu::Menu;
use crate::ui::line_input::{InputResult, LineInput, LoginField};
use crate::ui::theme::Theme;
use crate::ui::view::TuiPresenter;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Login,
    Home,
    Game,
    ConfirmReset,
}

impl AppScreen {
    /// Screens behind the login gate.
    pub fn requires_auth(self) -> bool {
        !matches!(self, AppScreen::Login)
    }
}

pub struct App {
    pub screen: AppScreen,
    pub menu: Menu<'static>,
    pub theme: &'static Theme,
    pub config: Config,
    pub gate: SessionGate<StaticCredentials>,
    pub session: GameSession<TuiPresenter>,
    pub username_input: LineInput,
    pub password_input: LineInput,
    pub login_focus: LoginField,
    pub login_error: Option<String>,
    pub should_quit: bool,
    last_tick: Instant,
}

impl App {
    pub fn new(
        config: Config,
        theme: &'static Theme,
        bank: QuestionBank,
        sink: Box<dyn SoundSink>,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let presenter =
            TuiPresenter::new(sink, !config.sound_enabled, config.celebration_display());
        let session = GameSession::with_rng(bank, config.session_settings(), presenter, rng);
        let gate = SessionGate::new(StaticCredentials::new(
            config.username.clone(),
            config.password.clone(),
        ));

        Self {
            screen: AppScreen::Login,
            menu: Menu::new(theme),
            theme,
            config,
            gate,
            session,
            username_input: LineInput::new(""),
            password_input: LineInput::masked(),
            login_focus: LoginField::Username,
            login_error: None,
            should_quit: false,
            last_tick: Instant::now(),
        }
    }

    /// Send the user to `screen`, or to the login screen if it is gated and
    /// nobody is signed in.
    pub fn navigate(&mut self, screen: AppScreen) {
        self.screen = if screen.requires_auth() && !self.gate.is_authenticated() {
            AppScreen::Login
        } else {
            screen
        };
    }

    pub fn focused_input(&mut self) -> &mut LineInput {
        match self.login_focus {
            LoginField::Username => &mut self.username_input,
            LoginField::Password => &mut self.password_input,
        }
    }

    pub fn handle_login_input(&mut self, key: crossterm::event::KeyEvent) {
        match self.focused_input().handle(key) {
            InputResult::Submit => {
                if self.login_focus == LoginField::Username {
                    self.login_focus = LoginField::Password;
                } else {
                    self.submit_login();
                }
            }
            InputResult::Switch => self.login_focus = self.login_focus.toggle(),
            InputResult::Cancel => self.should_quit = true,
            InputResult::Continue => self.login_error = None,
        }
    }

    pub fn submit_login(&mut self) {
        let result = self
            .gate
            .login(self.username_input.value(), self.password_input.value());
        self.password_input.clear();
        match result {
            Ok(()) => {
                self.login_error = None;
                self.login_focus = LoginField::Username;
                self.navigate(AppScreen::Home);
            }
            Err(err) => {
                self.login_error = Some(err.to_string());
                self.login_focus = LoginField::Password;
            }
        }
    }

    pub fn logout(&mut self) {
        self.session.reset_game();
        self.gate.logout();
        self.username_input.clear();
        self.navigate(AppScreen::Login);
    }

    pub fn start_game(&mut self) {
        self.navigate(AppScreen::Game);
    }

    /// Back to home. The round in play is dropped, the score is kept.
    pub fn leave_game(&mut self) {
        self.session.leave();
        self.navigate(AppScreen::Home);
    }

    pub fn request_reset(&mut self) {
        self.navigate(AppScreen::ConfirmReset);
    }

    pub fn confirm_reset(&mut self, confirmed: bool) {
        if confirmed {
            self.session.reset_game();
        }
        self.navigate(AppScreen::Game);
    }

    pub fn spin(&mut self) {
        self.session.begin_selection();
    }

    /// Answer by 1-based option number as typed.
    pub fn answer(&mut self, number: usize) {
        self.answer_at(number, Instant::now());
    }

    /// Catch the session clock up to `now` first, so a key pressed after the
    /// deadline loses to the timeout. Numbers past the last option are ignored.
    pub fn answer_at(&mut self, number: usize, now: Instant) {
        self.tick(now);
        if self.session.phase() != Phase::QuestionActive {
            return;
        }
        let options = self
            .session
            .current_question()
            .map_or(0, |q| q.option_count());
        if (1..=options).contains(&number) {
            self.session.submit_answer(number - 1);
        }
    }

    pub fn next_question(&mut self) {
        self.session.next_question();
    }

    pub fn toggle_mute(&mut self) {
        let muted = self.session.presenter_mut().toggle_mute();
        self.config.sound_enabled = !muted;
        info!("Sound {}", if muted { "off" } else { "on" });
    }

    /// Advance the session clock by the wall time since the last call. The
    /// clock holds still while the reset dialog is open.
    pub fn tick(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_tick);
        self.last_tick = self.last_tick.max(now);
        if self.screen != AppScreen::ConfirmReset {
            self.session.advance(elapsed);
        }
        self.session.presenter_mut().expire_celebration(now);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::*;
    use crate::presenter::SilentSink;
    use crate::session::Outcome;

    fn app() -> App {
        let theme: &'static Theme = Box::leak(Box::new(Theme::default()));
        let bank = QuestionBank::bundled().unwrap();
        App::new(Config::default(), theme, bank, Box::new(SilentSink), Some(9))
    }

    fn type_into(app: &mut App, s: &str) {
        for ch in s.chars() {
            app.handle_login_input(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE));
        }
    }

    fn enter(app: &mut App) {
        app.handle_login_input(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
    }

    fn signed_in() -> App {
        let mut app = app();
        type_into(&mut app, "admin");
        enter(&mut app);
        type_into(&mut app, "admin123");
        enter(&mut app);
        app
    }

    #[test]
    fn test_gated_screens_redirect_to_login() {
        let mut app = app();
        app.navigate(AppScreen::Game);
        assert_eq!(app.screen, AppScreen::Login);
        app.start_game();
        assert_eq!(app.screen, AppScreen::Login);
    }

    #[test]
    fn test_login_flow() {
        let app = signed_in();
        assert_eq!(app.screen, AppScreen::Home);
        assert_eq!(app.gate.user(), Some("admin"));
        assert_eq!(app.password_input.value(), "");
    }

    #[test]
    fn test_failed_login_shows_error() {
        let mut app = app();
        type_into(&mut app, "admin");
        enter(&mut app);
        type_into(&mut app, "nope");
        enter(&mut app);
        assert_eq!(app.screen, AppScreen::Login);
        assert!(app.login_error.is_some());
        assert_eq!(app.login_focus, LoginField::Password);
    }

    #[test]
    fn test_leave_keeps_score_logout_clears_it() {
        let mut app = signed_in();
        app.start_game();
        let category = app.session.bank().category_at(0).unwrap().to_string();
        app.session.load_question(&category, 3).unwrap();
        let correct = app.session.current_question().unwrap().correct;
        app.answer(correct + 1);
        assert_eq!(app.session.score(), 30);

        app.leave_game();
        assert_eq!(app.screen, AppScreen::Home);
        assert_eq!(app.session.score(), 30);

        app.logout();
        assert_eq!(app.screen, AppScreen::Login);
        assert_eq!(app.session.score(), 0);
        app.start_game();
        assert_eq!(app.screen, AppScreen::Login);
    }

    #[test]
    fn test_reset_needs_confirmation() {
        let mut app = signed_in();
        app.start_game();
        let category = app.session.bank().category_at(1).unwrap().to_string();
        app.session.load_question(&category, 2).unwrap();
        let correct = app.session.current_question().unwrap().correct;
        app.answer(correct + 1);

        app.request_reset();
        assert_eq!(app.screen, AppScreen::ConfirmReset);
        app.confirm_reset(false);
        assert_eq!(app.session.score(), 20);
        app.request_reset();
        app.confirm_reset(true);
        assert_eq!(app.screen, AppScreen::Game);
        assert_eq!(app.session.score(), 0);
    }

    #[test]
    fn test_tick_drives_spin_to_question() {
        let mut app = signed_in();
        app.start_game();
        app.spin();
        assert_eq!(app.session.phase(), Phase::Selecting);

        let start = Instant::now();
        app.last_tick = start;
        app.tick(start + Duration::from_millis(4000));
        app.tick(start + Duration::from_millis(4500));
        app.tick(start + Duration::from_millis(6500));
        assert_eq!(app.session.phase(), Phase::QuestionActive);
    }

    #[test]
    fn test_sound_starts_muted() {
        let mut app = app();
        assert!(app.session.presenter().is_muted());
        app.toggle_mute();
        assert!(!app.session.presenter().is_muted());
        assert!(app.config.sound_enabled);
    }

    fn question_in_play(app: &mut App, start: Instant) -> usize {
        app.start_game();
        let category = app.session.bank().category_at(0).unwrap().to_string();
        app.last_tick = start;
        app.session.load_question(&category, 5).unwrap();
        app.session.current_question().unwrap().correct
    }

    #[test]
    fn test_late_answer_loses_to_timeout() {
        let mut app = signed_in();
        let start = Instant::now();
        let correct = question_in_play(&mut app, start);

        app.tick(start + Duration::from_millis(29_950));
        assert_eq!(app.session.phase(), Phase::QuestionActive);

        app.answer_at(correct + 1, start + Duration::from_millis(30_050));
        assert!(matches!(
            app.session.phase(),
            Phase::Answered(Outcome::Timeout { .. })
        ));
        assert_eq!(app.session.score(), 0);
    }

    #[test]
    fn test_answer_just_before_deadline_counts() {
        let mut app = signed_in();
        let start = Instant::now();
        let correct = question_in_play(&mut app, start);

        app.answer_at(correct + 1, start + Duration::from_millis(29_950));
        assert!(matches!(
            app.session.phase(),
            Phase::Answered(Outcome::Correct { .. })
        ));
        assert_eq!(app.session.score(), 50);
    }

    #[test]
    fn test_key_past_last_option_is_ignored() {
        let mut app = signed_in();
        let start = Instant::now();
        question_in_play(&mut app, start);
        let options = app.session.current_question().unwrap().option_count();

        app.answer_at(options + 1, start);
        app.answer_at(9, start);
        app.answer_at(0, start);
        assert_eq!(app.session.phase(), Phase::QuestionActive);
        assert_eq!(app.session.score(), 0);
    }

    #[test]
    fn test_clock_holds_while_reset_dialog_is_open() {
        let mut app = signed_in();
        let start = Instant::now();
        question_in_play(&mut app, start);

        app.request_reset();
        app.tick(start + Duration::from_secs(45));
        app.confirm_reset(false);
        assert_eq!(app.session.phase(), Phase::QuestionActive);

        app.tick(start + Duration::from_secs(46));
        assert_eq!(app.session.phase(), Phase::QuestionActive);
        assert_eq!(app.session.timer().remaining(), 29);
    }
}
