use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::line_input::{LineInput, LoginField};
use crate::ui::theme::Theme;

pub struct LoginForm<'a> {
    pub username: &'a LineInput,
    pub password: &'a LineInput,
    pub focus: LoginField,
    pub error: Option<&'a str>,
    pub theme: &'a Theme,
}

impl LoginForm<'_> {
    fn field_line(&self, label: &str, input: &LineInput, focused: bool) -> Line<'static> {
        let colors = &self.theme.colors;
        let label_style = if focused {
            Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.text_muted())
        };
        let mut spans = vec![Span::styled(format!("{label:>10}: "), label_style)];

        if focused {
            let (before, cursor, after) = input.render_parts();
            let cursor_style = Style::default().fg(colors.bg()).bg(colors.fg());
            spans.push(Span::styled(before, Style::default().fg(colors.fg())));
            spans.push(Span::styled(
                cursor.map_or(" ".to_string(), |c| c.to_string()),
                cursor_style,
            ));
            spans.push(Span::styled(after, Style::default().fg(colors.fg())));
        } else {
            spans.push(Span::styled(input.display(), Style::default().fg(colors.fg())));
        }
        Line::from(spans)
    }
}

impl Widget for LoginForm<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Sign in ")
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(2),
                Constraint::Min(0),
            ])
            .split(inner);

        Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "quizwheel",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        Paragraph::new(self.field_line(
            "Username",
            self.username,
            self.focus == LoginField::Username,
        ))
        .render(layout[1], buf);
        Paragraph::new(self.field_line(
            "Password",
            self.password,
            self.focus == LoginField::Password,
        ))
        .render(layout[3], buf);

        if let Some(error) = self.error {
            Paragraph::new(Line::from(Span::styled(
                error,
                Style::default().fg(colors.error()),
            )))
            .alignment(Alignment::Center)
            .render(layout[4], buf);
        }

        Paragraph::new(Line::from(Span::styled(
            "[Tab] Switch field  [Enter] Sign in  [Esc] Quit",
            Style::default().fg(colors.text_muted()),
        )))
        .alignment(Alignment::Center)
        .render(layout[5], buf);
    }
}
