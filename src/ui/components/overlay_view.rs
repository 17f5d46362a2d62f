use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

use keynav::focus::ElementRef;
use keynav::host::Host;
use keynav::keyboard::ActiveElement;
use keynav::overlay::OverlayButtons;
use keynav::site::{Site, SiteOverlay};

use crate::ui::layout::centered_rect;
use crate::ui::theme::Theme;

/// The open dialog drawn on top of the page. The help dialog shows the
/// sheet the host was last given.
pub struct OverlayView<'a> {
    id: &'a str,
    overlay: &'a SiteOverlay,
    site: &'a Site,
    theme: &'a Theme,
}

impl<'a> OverlayView<'a> {
    pub fn new(id: &'a str, overlay: &'a SiteOverlay, site: &'a Site, theme: &'a Theme) -> Self {
        Self {
            id,
            overlay,
            site,
            theme,
        }
    }

    fn help_lines(&self) -> Vec<Line<'a>> {
        let colors = &self.theme.colors;
        let Some(sheet) = self.site.help() else {
            return Vec::new();
        };
        let mut lines = Vec::new();
        for section in &sheet.sections {
            lines.push(Line::from(Span::styled(
                section.title.clone(),
                Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
            )));
            for entry in &section.entries {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("  {:>8}  ", entry.keys),
                        Style::default().fg(colors.warning()),
                    ),
                    Span::styled(entry.label.clone(), Style::default().fg(colors.fg())),
                ]));
            }
            if let Some(note) = &section.note {
                lines.push(Line::from(Span::styled(
                    format!("  {note}"),
                    Style::default().fg(colors.muted()),
                )));
            }
            lines.push(Line::from(""));
        }
        lines
    }

    fn control_lines(&self) -> Vec<Line<'a>> {
        let colors = &self.theme.colors;
        let focused = self.site.focused();
        self.overlay
            .candidates
            .iter()
            .filter(|c| c.is_focusable())
            .map(|candidate| {
                let label = control_label(
                    candidate.element,
                    &self.overlay.buttons,
                    self.site.element_kind(candidate.element),
                );
                let style = if focused == Some(candidate.element) {
                    Style::default()
                        .fg(colors.selected_fg())
                        .bg(colors.selected_bg())
                } else {
                    Style::default().fg(colors.fg())
                };
                Line::from(Span::styled(format!("  {label}"), style))
            })
            .collect()
    }
}

fn control_label(
    element: ElementRef,
    buttons: &OverlayButtons,
    kind: Option<ActiveElement>,
) -> &'static str {
    let is = |b: Option<keynav::overlay::OverlayButton>| b.is_some_and(|b| b.element == element);
    if is(buttons.confirm) {
        "[ Confirm ]"
    } else if is(buttons.submit) {
        "[ Submit ]"
    } else if is(buttons.cancel) {
        "[ Cancel ]"
    } else if is(buttons.primary) {
        "[ OK ]"
    } else {
        match kind {
            Some(ActiveElement::TextInput) => "▭ text field",
            Some(ActiveElement::TextArea) => "▭ text area",
            Some(ActiveElement::Checkbox) => "☐ checkbox",
            Some(ActiveElement::Radio) => "○ option",
            Some(ActiveElement::Select) => "▾ select",
            _ => "[ button ]",
        }
    }
}

impl Widget for OverlayView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let is_help = self.id == "help";
        let popup = if is_help {
            centered_rect(70, 80, 50, 16, area)
        } else {
            centered_rect(50, 40, 36, 10, area)
        };
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(format!(" {} ", self.overlay.title))
            .title_bottom(" Enter confirm · c cancel · Esc close ")
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let lines = if is_help {
            self.help_lines()
        } else {
            self.control_lines()
        };
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(popup, buf);
    }
}
