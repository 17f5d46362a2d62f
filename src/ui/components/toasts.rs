use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use keynav::notify::Notifier;

use crate::ui::layout::pack_hint_lines;
use crate::ui::theme::Theme;

const HINTS: &[&str] = &[
    "[i] focus mode",
    "[q] exit",
    "[Esc] back",
    "[/] help",
    "[1-6] pages",
    "[Ctrl+C] quit",
];

/// Newest toasts, or key hints when there are none.
pub struct Toasts<'a> {
    notifier: &'a Notifier,
    floating: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> Toasts<'a> {
    pub fn new(notifier: &'a Notifier, floating: Option<&'a str>, theme: &'a Theme) -> Self {
        Self {
            notifier,
            floating,
            theme,
        }
    }
}

impl Widget for Toasts<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered().border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        let active = self.notifier.active();
        let mut lines: Vec<Line> = if active.is_empty() {
            pack_hint_lines(HINTS, inner.width as usize)
                .into_iter()
                .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.muted()))))
                .collect()
        } else {
            active
                .iter()
                .rev()
                .map(|n| {
                    Line::from(Span::styled(
                        format!(" {} {}", n.level.icon(), n.message),
                        Style::default().fg(colors.notice(n.level)),
                    ))
                })
                .collect()
        };
        lines.truncate(inner.height as usize);
        Paragraph::new(lines).render(inner, buf);

        if let Some(text) = self.floating {
            let width = text.chars().count() as u16 + 2;
            if inner.width > width {
                let x = inner.x + inner.width - width;
                buf.set_string(x, inner.y, format!("✦{text}"), Style::default().fg(colors.marked()));
            }
        }
    }
}
