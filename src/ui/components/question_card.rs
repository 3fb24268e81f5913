use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::bank::QuestionRecord;
use crate::session::Outcome;
use crate::ui::theme::Theme;
use crate::ui::view::category_icon;

pub struct QuestionCard<'a> {
    pub category: &'a str,
    pub points: u32,
    pub question: &'a QuestionRecord,
    pub outcome: Option<Outcome>,
    pub theme: &'a Theme,
}

impl Widget for QuestionCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(
                " {} {} · {} pts ",
                category_icon(self.category),
                self.category,
                self.points
            ))
            .border_style(Style::default().fg(colors.border_focused()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![
            Line::from(Span::styled(
                self.question.prompt.en.as_str(),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                self.question.prompt.mr.as_str(),
                Style::default().fg(colors.text_muted()),
            )),
            Line::from(""),
        ];

        for (i, option) in self.question.options.iter().enumerate() {
            let style = match self.outcome {
                Some(outcome) if outcome.correct_index() == i => {
                    Style::default().fg(colors.success()).add_modifier(Modifier::BOLD)
                }
                Some(outcome) if outcome.selected_index() == Some(i) => {
                    Style::default().fg(colors.error()).add_modifier(Modifier::CROSSED_OUT)
                }
                Some(_) => Style::default().fg(colors.text_muted()),
                None => Style::default().fg(colors.fg()),
            };
            lines.push(Line::from(vec![
                Span::styled(format!(" [{}] ", i + 1), Style::default().fg(colors.accent())),
                Span::styled(option.en.as_str(), style),
                Span::styled(
                    format!("  {}", option.mr),
                    Style::default().fg(colors.text_muted()),
                ),
            ]));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
