use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};

use crate::engine::timer::{CountdownTimer, TimerLevel};
use crate::ui::theme::Theme;

pub struct TimerGauge<'a> {
    pub remaining: u32,
    pub ratio: f64,
    pub level: TimerLevel,
    pub theme: &'a Theme,
}

impl<'a> TimerGauge<'a> {
    pub fn new(timer: &CountdownTimer, theme: &'a Theme) -> Self {
        Self {
            remaining: timer.remaining(),
            ratio: timer.fraction_remaining().clamp(0.0, 1.0),
            level: timer.level(),
            theme,
        }
    }
}

impl Widget for TimerGauge<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let fill = match self.level {
            TimerLevel::Normal => colors.bar_filled(),
            TimerLevel::Warning => colors.warning(),
            TimerLevel::Critical => colors.error(),
        };

        let block = Block::bordered()
            .title(" Time ")
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let filled_width = (self.ratio * inner.width as f64) as u16;
        let label = format!("{}s", self.remaining);

        for x in inner.x..inner.x + inner.width {
            let style = if x < inner.x + filled_width {
                Style::default().fg(colors.bg()).bg(fill)
            } else {
                Style::default().fg(colors.fg()).bg(colors.bar_empty())
            };
            buf[(x, inner.y)].set_style(style);
        }

        let label_x = inner.x + (inner.width.saturating_sub(label.len() as u16)) / 2;
        buf.set_string(label_x, inner.y, &label, Style::default().fg(colors.fg()));
    }
}
