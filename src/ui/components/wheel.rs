use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Widget};

use crate::engine::wheel::{Wheel, normalize};
use crate::ui::theme::Theme;

/// A wheel drawn as a vertical drum: the segment under the pointer sits on
/// the middle row, its neighbours above and below.
pub struct WheelView<'a> {
    pub title: &'a str,
    pub labels: Vec<String>,
    pub wheel: &'a Wheel,
    pub progress: f64,
    pub theme: &'a Theme,
}

impl<'a> WheelView<'a> {
    pub fn new(
        title: &'a str,
        labels: Vec<String>,
        wheel: &'a Wheel,
        progress: f64,
        theme: &'a Theme,
    ) -> Self {
        Self {
            title,
            labels,
            wheel,
            progress,
            theme,
        }
    }

    fn label(&self, index: usize) -> String {
        self.labels
            .get(index)
            .cloned()
            .unwrap_or_else(|| (index + 1).to_string())
    }
}

impl Widget for WheelView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let count = self.wheel.segment_count;
        let angle = normalize(self.wheel.rotation_at(self.progress));

        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .title_bottom(format!(" {angle:>5.1}° "))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < 4 || inner.height == 0 || count == 0 {
            return;
        }

        let current = self.wheel.segment_under_pointer(self.progress);
        let mid = inner.height / 2;
        let settled = self.progress >= 1.0 && self.wheel.selected.is_some();

        for row in 0..inner.height {
            let offset = row as i64 - mid as i64;
            // Segments run backwards past the pointer as rotation grows.
            let index = (current as i64 - offset).rem_euclid(count as i64) as usize;
            let is_pointer = row == mid;

            let marker = if is_pointer { "▶ " } else { "  " };
            let text = format!("{marker}{}", self.label(index));
            let max = inner.width as usize;
            let text: String = text.chars().take(max).collect();

            let swatch = colors.wheel_segment(index);
            let style = if is_pointer {
                let s = Style::default()
                    .fg(colors.bg())
                    .bg(swatch)
                    .add_modifier(Modifier::BOLD);
                if settled {
                    s.add_modifier(Modifier::UNDERLINED)
                } else {
                    s
                }
            } else {
                Style::default().fg(swatch)
            };

            let y = inner.y + row;
            if is_pointer {
                for x in inner.x..inner.x + inner.width {
                    buf[(x, y)].set_style(style);
                }
                buf.set_string(inner.x + inner.width - 1, y, "◀", style.fg(colors.pointer()));
            }
            buf.set_string(inner.x, y, &text, style);
        }
    }
}
