use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::{error, info, warn};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Wrap};

use quizwheel::app::{App, AppScreen};
use quizwheel::bank::QuestionBank;
use quizwheel::config::Config;
use quizwheel::event::{AppEvent, EventHandler};
use quizwheel::logging;
use quizwheel::session::{Phase, PhasePayload};
use quizwheel::ui;
use quizwheel::ui::components::celebration::Celebration;
use quizwheel::ui::components::login_form::LoginForm;
use quizwheel::ui::components::menu::MenuAction;
use quizwheel::ui::components::question_card::QuestionCard;
use quizwheel::ui::components::timer_gauge::TimerGauge;
use quizwheel::ui::components::wheel::WheelView;
use quizwheel::ui::layout::{AppLayout, pack_hint_lines, wheel_areas};
use quizwheel::ui::theme::Theme;
use quizwheel::ui::view::{BellSink, category_icon};

#[derive(Parser)]
#[command(
    name = "quizwheel",
    version,
    about = "Terminal trivia game with spinning selection wheels"
)]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Question bank JSON file (defaults to the bundled set)")]
    questions: Option<PathBuf>,

    #[arg(long, help = "Seconds allowed per question")]
    timer: Option<u32>,

    #[arg(long, help = "Seed for the wheels and question picks")]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_default();
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(path) = cli.questions {
        config.question_bank = Some(path);
    }
    if let Some(secs) = cli.timer {
        config.timer_duration_secs = secs;
    }
    config.normalize();

    if let Err(err) = logging::init_file_logger(&logging::log_dir(), config.log_level_filter()) {
        eprintln!("Warning: logging disabled: {err:#}");
    }

    let bank = match &config.question_bank {
        Some(path) => QuestionBank::from_path(path),
        None => QuestionBank::bundled(),
    };
    let bank = bank
        .inspect_err(|err| error!("Cannot start: {err}"))
        .context("failed to load question bank")?;

    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        warn!("Theme '{}' not found, using default", config.theme);
        Theme::default()
    });
    let theme: &'static Theme = Box::leak(Box::new(theme));

    let mut app = App::new(config, theme, bank, Box::new(BellSink), cli.seed);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        error!("Exited with error: {err:?}");
        eprintln!("Error: {err:?}");
    }
    info!("Bye");

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        let event = events.next()?;
        app.tick(Instant::now());
        if let AppEvent::Key(key) = event {
            handle_key(app, key);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Login => app.handle_login_input(key),
        AppScreen::Home => handle_home_key(app, key),
        AppScreen::Game => handle_game_key(app, key),
        AppScreen::ConfirmReset => handle_confirm_key(app, key),
    }
}

fn run_menu_action(app: &mut App, action: MenuAction) {
    match action {
        MenuAction::Play => app.start_game(),
        MenuAction::ToggleSound => toggle_sound(app),
        MenuAction::Logout => app.logout(),
        MenuAction::Quit => app.should_quit = true,
    }
}

fn toggle_sound(app: &mut App) {
    app.toggle_mute();
    if let Err(err) = app.config.save() {
        warn!("Could not save config: {err:#}");
    }
}

fn handle_home_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => run_menu_action(app, MenuAction::Quit),
        KeyCode::Char('p') => run_menu_action(app, MenuAction::Play),
        KeyCode::Char('m') => run_menu_action(app, MenuAction::ToggleSound),
        KeyCode::Char('l') => run_menu_action(app, MenuAction::Logout),
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => run_menu_action(app, app.menu.selected_action()),
        _ => {}
    }
}

fn handle_game_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.leave_game(),
        KeyCode::Char(' ') | KeyCode::Char('s') => app.spin(),
        KeyCode::Char(ch @ '1'..='9') => {
            if let Some(n) = ch.to_digit(10) {
                app.answer(n as usize);
            }
        }
        KeyCode::Char('n') | KeyCode::Enter => app.next_question(),
        KeyCode::Char('r') => app.request_reset(),
        KeyCode::Char('m') => toggle_sound(app),
        KeyCode::Char('l') => app.logout(),
        _ => {}
    }
}

fn handle_confirm_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') => app.confirm_reset(true),
        KeyCode::Char('n') | KeyCode::Esc => app.confirm_reset(false),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Login => render_login(frame, app),
        AppScreen::Home => render_home(frame, app),
        AppScreen::Game => render_game(frame, app),
        AppScreen::ConfirmReset => {
            render_game(frame, app);
            render_confirm_reset(frame, app);
        }
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;
    let sound = if app.session.presenter().is_muted() {
        "🔇 muted"
    } else {
        "🔊 sound"
    };
    let header_info = format!(
        " {} | Score {} | Streak {} | {sound}",
        app.gate.user().unwrap_or("-"),
        app.session.score(),
        app.session.streak(),
    );
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " quizwheel ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            &*header_info,
            Style::default()
                .fg(colors.text_muted())
                .bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_footer(
    frame: &mut ratatui::Frame,
    app: &App,
    hints: &[&str],
    area: ratatui::layout::Rect,
) {
    let colors = &app.theme.colors;
    let lines: Vec<Line> = pack_hint_lines(hints, area.width as usize)
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.text_muted()))))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_login(frame: &mut ratatui::Frame, app: &App) {
    let area = ui::layout::centered_rect(40, 50, frame.area());
    let form = LoginForm {
        username: &app.username_input,
        password: &app.password_input,
        focus: app.login_focus,
        error: app.login_error.as_deref(),
        theme: app.theme,
    };
    frame.render_widget(Clear, area);
    frame.render_widget(form, area);
}

fn render_home(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());
    render_header(frame, app, layout.header);

    let menu_area = ui::layout::centered_rect(50, 80, layout.main);
    frame.render_widget(&app.menu, menu_area);

    render_footer(
        frame,
        app,
        &["[p] Play", "[m] Sound", "[l] Log out", "[q] Quit"],
        layout.footer,
    );
}

fn render_game(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());
    render_header(frame, app, layout.header);

    let hints: &[&str] = match app.session.phase() {
        Phase::Idle | Phase::Selecting => {
            render_wheels(frame, app, &layout);
            &["[Space] Spin", "[r] Reset", "[m] Sound", "[Esc] Home", "[l] Log out"]
        }
        Phase::QuestionActive => {
            render_question(frame, app, layout.main);
            &["[1-9] Answer", "[r] Reset", "[m] Sound", "[Esc] Home"]
        }
        Phase::Answered(_) => {
            render_question(frame, app, layout.main);
            &["[n] Next question", "[r] Reset", "[m] Sound", "[Esc] Home"]
        }
    };
    render_footer(frame, app, hints, layout.footer);

    if app.session.presenter().is_celebrating(Instant::now()) {
        let popup = ui::layout::centered_rect(30, 30, frame.area());
        frame.render_widget(
            Celebration {
                score: app.session.score(),
                theme: app.theme,
            },
            popup,
        );
    }
}

fn render_wheels(frame: &mut ratatui::Frame, app: &App, layout: &AppLayout) {
    let colors = &app.theme.colors;
    let session = &app.session;
    let spinner = session.spinner();
    let progress = session.spin_progress();

    let (category_area, question_area, reveal_area) = wheel_areas(layout.main, layout.tier);

    let category_labels: Vec<String> = session
        .bank()
        .categories()
        .map(|c| format!("{} {c}", category_icon(c)))
        .collect();
    let question_labels: Vec<String> = (1..=spinner.question.segment_count)
        .map(|n| format!("Question {n}"))
        .collect();

    frame.render_widget(
        WheelView::new("Category", category_labels, &spinner.category, progress, app.theme),
        category_area,
    );
    frame.render_widget(
        WheelView::new("Number", question_labels, &spinner.question, progress, app.theme),
        question_area,
    );

    let lines: Vec<Line> = match session.presenter().payload() {
        PhasePayload::Spinning => vec![Line::from(Span::styled(
            "Spinning…",
            Style::default().fg(colors.accent()),
        ))],
        PhasePayload::Selection {
            category,
            question_number,
        } => vec![
            Line::from(Span::styled(
                format!("{} {category}", category_icon(category)),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("Question #{question_number}")),
            Line::from(Span::styled(
                format!("for {} points", question_number * 10),
                Style::default().fg(colors.success()),
            )),
        ],
        PhasePayload::Aborted { reason } => vec![Line::from(Span::styled(
            reason.as_str(),
            Style::default().fg(colors.error()),
        ))],
        _ => vec![Line::from(Span::styled(
            "Press [Space] to spin the wheels",
            Style::default().fg(colors.text_muted()),
        ))],
    };

    match reveal_area {
        Some(area) => {
            let block = Block::bordered()
                .title(" Selection ")
                .border_style(Style::default().fg(colors.border()));
            let mut padded = vec![Line::from("")];
            padded.extend(lines);
            frame.render_widget(
                Paragraph::new(padded)
                    .block(block)
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true }),
                area,
            );
        }
        None => {
            // Narrow: first line goes on the category wheel's bottom border.
            if let Some(first) = lines.into_iter().next() {
                let row = ratatui::layout::Rect::new(
                    category_area.x + 2,
                    category_area.y + category_area.height.saturating_sub(1),
                    category_area.width.saturating_sub(4),
                    1,
                );
                frame.render_widget(Paragraph::new(first).alignment(Alignment::Right), row);
            }
        }
    }
}

fn render_question(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;
    let session = &app.session;
    let Some(active) = session.current() else {
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(2),
        ])
        .split(area);

    frame.render_widget(TimerGauge::new(session.timer(), app.theme), rows[0]);

    let outcome = match session.phase() {
        Phase::Answered(outcome) => Some(outcome),
        _ => None,
    };
    frame.render_widget(
        QuestionCard {
            category: &active.category,
            points: active.points,
            question: &active.question,
            outcome,
            theme: app.theme,
        },
        rows[1],
    );

    if let (Some(banner), Some(outcome)) = (session.presenter().banner(), outcome) {
        let color = if outcome.is_correct() {
            colors.success()
        } else {
            colors.error()
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                banner,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center),
            rows[2],
        );
    }
}

fn render_confirm_reset(frame: &mut ratatui::Frame, app: &App) {
    let colors = &app.theme.colors;
    let area = ui::layout::centered_rect(40, 25, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::bordered()
        .title(" Reset game ")
        .border_style(Style::default().fg(colors.warning()))
        .style(Style::default().bg(colors.bg()));
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Start over? Score and used questions will be cleared.",
            Style::default().fg(colors.fg()),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "[y] Reset   [n] Cancel",
            Style::default().fg(colors.accent()),
        )),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}
