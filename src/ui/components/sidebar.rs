use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use keynav::KeyboardContext;
use keynav::site::Site;

use crate::ui::theme::Theme;

/// Player status, focus-mode state and document markers.
pub struct Sidebar<'a> {
    site: &'a Site,
    context: &'a KeyboardContext,
    theme: &'a Theme,
}

impl<'a> Sidebar<'a> {
    pub fn new(site: &'a Site, context: &'a KeyboardContext, theme: &'a Theme) -> Self {
        Self {
            site,
            context,
            theme,
        }
    }
}

impl Widget for Sidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Min(6)])
            .split(area);

        let label = Style::default().fg(colors.muted());
        let value = Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD);

        let player_lines = match &self.site.player {
            Some(player) => vec![
                Line::from(vec![
                    Span::styled(if player.playing { "▶ " } else { "⏸ " }, value),
                    Span::styled(player.current_track().unwrap_or("-").to_string(), value),
                ]),
                Line::from(vec![
                    Span::styled("Volume ", label),
                    Span::styled(format!("{:.0}%", player.volume * 100.0), value),
                    Span::styled(if player.muted { "  muted" } else { "" }, label),
                ]),
                Line::from(Span::styled(
                    if player.playlist_open {
                        "Playlist open (↑ ↓ belong to it)"
                    } else {
                        ""
                    },
                    label,
                )),
            ],
            None => vec![Line::from(Span::styled("Music player disabled", label))],
        };
        Paragraph::new(player_lines)
            .block(
                Block::bordered()
                    .title(" Music ")
                    .border_style(Style::default().fg(colors.border())),
            )
            .render(sections[0], buf);

        let mut lines = Vec::new();
        match self.context.controller() {
            Some(controller) => {
                let session = controller.session();
                let mode = if session.is_active() {
                    "active"
                } else if session.is_paused() {
                    "paused"
                } else {
                    "inactive"
                };
                lines.push(Line::from(vec![
                    Span::styled("Focus mode ", label),
                    Span::styled(mode, value),
                ]));
                lines.push(Line::from(vec![
                    Span::styled("Levels ", label),
                    Span::styled(session.levels().join(" › "), value),
                ]));
                lines.push(Line::from(vec![
                    Span::styled("Cursor ", label),
                    Span::styled(format!("{}/{}", controller.cursor(), controller.items().len()), value),
                ]));
            }
            None => lines.push(Line::from(Span::styled("No focus mode on this page", label))),
        }
        if let Some(overlay) = self.context.observer().active() {
            lines.push(Line::from(vec![
                Span::styled("Dialog ", label),
                Span::styled(overlay.to_string(), value),
            ]));
        }
        let shortcuts = if self.context.dispatcher().is_enabled() {
            "on"
        } else {
            "silenced"
        };
        lines.push(Line::from(vec![
            Span::styled("Site shortcuts ", label),
            Span::styled(shortcuts, value),
        ]));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Markers", label)));
        for marker in self.site.markers() {
            lines.push(Line::from(Span::styled(
                format!("  .{marker}"),
                Style::default().fg(colors.accent()),
            )));
        }
        Paragraph::new(lines)
            .block(
                Block::bordered()
                    .title(" Keyboard ")
                    .border_style(Style::default().fg(colors.border())),
            )
            .render(sections[1], buf);
    }
}
