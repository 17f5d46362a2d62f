use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use keynav::focus::ElementRef;
use keynav::focus::pages::ADMIN_TABS;
use keynav::host::Host;
use keynav::site::{Node, Site};
use keynav::PageKind;

use crate::ui::theme::Theme;

/// The current page of the demo site, with focus-mode markers applied.
pub struct PageView<'a> {
    site: &'a Site,
    theme: &'a Theme,
}

impl<'a> PageView<'a> {
    pub fn new(site: &'a Site, theme: &'a Theme) -> Self {
        Self { site, theme }
    }

    fn block(&self, title: &str, focused: bool) -> Block<'a> {
        let colors = &self.theme.colors;
        let border = if focused {
            colors.border_focused()
        } else {
            colors.border()
        };
        Block::bordered()
            .title(format!(" {title} "))
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg()).fg(colors.fg()))
    }

    fn item_line(&self, element: ElementRef, node: &Node, selected: Option<ElementRef>) -> Line<'a> {
        let colors = &self.theme.colors;
        let indent = "  ".repeat(self.site.depth(element));
        let icon = match node.kind.as_str() {
            "folder" if node.expanded => "▾ ",
            "folder" => "▸ ",
            "filter-card" | "timeline-card" | "tag-card" => "◆ ",
            _ => "",
        };
        let marked = self.site.marked_rows().contains(&element);
        let mut style = Style::default().fg(if marked { colors.marked() } else { colors.fg() });
        if selected == Some(element) {
            style = style
                .fg(colors.selected_fg())
                .bg(colors.selected_bg())
                .add_modifier(Modifier::BOLD);
        }
        let mark = if marked { "● " } else { "" };
        Line::from(Span::styled(
            format!(" {indent}{mark}{icon}{}", node.label),
            style,
        ))
    }

    fn list(
        &self,
        page: &str,
        level: &str,
        parent: Option<ElementRef>,
        tab: Option<&str>,
        selected: Option<ElementRef>,
    ) -> Vec<Line<'a>> {
        self.site
            .nodes_in(page, level, parent, tab)
            .into_iter()
            .map(|(el, node)| self.item_line(el, node, selected))
            .collect()
    }

    fn render_home(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  {}", self.site.current_path()),
                Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "  This page has no focus mode. Use 1-6 to move around the site, / for help.",
                Style::default().fg(colors.muted()),
            )),
        ];
        Paragraph::new(lines)
            .block(self.block("Page", false))
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }

    fn render_article(&self, area: Rect, buf: &mut Buffer) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);
        let selected = self.site.selected("focus-selected");
        let left = self.list("article", "left", None, None, selected);
        Paragraph::new(left)
            .block(self.block("Files", self.site.has_marker("focus-mode-left")))
            .render(columns[0], buf);

        let right = self.list("article", "right", None, None, selected);
        let title = format!("Article · scroll {}", self.site.scroll_offset());
        Paragraph::new(right)
            .block(self.block(&title, self.site.has_marker("focus-mode-right")))
            .render(columns[1], buf);
    }

    fn render_archive(&self, area: Rect, buf: &mut Buffer) {
        let selected = self.site.selected("collect-focus-selected");
        let mut lines = Vec::new();
        for (el, node) in self.site.nodes_in("archive", "main", None, None) {
            lines.push(self.item_line(el, node, selected));
            for (child, child_node) in self.site.nodes_in("archive", "sub", Some(el), None) {
                let mut line = self.item_line(child, child_node, selected);
                line.spans.insert(0, Span::raw("    "));
                lines.push(line);
            }
        }
        let focused = self.site.has_marker("collect-focus-mode-main")
            || self.site.has_marker("collect-focus-mode-sub");
        Paragraph::new(lines)
            .block(self.block("Archive", focused))
            .render(area, buf);
    }

    fn render_about(&self, area: Rect, buf: &mut Buffer) {
        let selected = self.site.selected("about-focus-selected");
        let lines = self.list("about", "cards", None, None, selected);
        Paragraph::new(lines)
            .block(self.block("About", self.site.has_marker("about-focus-mode")))
            .render(area, buf);
    }

    fn render_admin(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(3)])
            .split(area);

        let active = self.site.active_tab();
        let tabs: Vec<Span> = ADMIN_TABS
            .iter()
            .enumerate()
            .map(|(i, (id, label))| {
                let digit = (i + 1) % 10;
                let style = if active == Some(*id) {
                    Style::default()
                        .fg(colors.header_fg())
                        .bg(colors.accent_dim())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors.muted())
                };
                Span::styled(format!(" {digit}:{label} "), style)
            })
            .collect();
        Paragraph::new(Line::from(tabs)).render(rows[0], buf);

        let focused = self.site.has_marker("admin-focus-mode");
        if active == Some("settings") {
            let visible = self.site.visible_section_index();
            let lines: Vec<Line> = self
                .site
                .sections()
                .enumerate()
                .map(|(i, title)| {
                    let style = if visible == Some(i) {
                        Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(colors.fg())
                    };
                    Line::from(Span::styled(format!(" {}. {title}", i + 1), style))
                })
                .collect();
            Paragraph::new(lines)
                .block(self.block("Settings", focused))
                .render(rows[1], buf);
            return;
        }

        let selected = self.site.selected("selected");
        let mut lines = Vec::new();
        let mut group: Option<&str> = None;
        for (el, node) in self.site.nodes_in("admin", "rows", None, active) {
            if node.group.as_deref() != group {
                group = node.group.as_deref();
                if let Some(name) = group {
                    lines.push(Line::from(Span::styled(
                        format!(" [{name}]"),
                        Style::default().fg(colors.muted()),
                    )));
                }
            }
            let mut line = self.item_line(el, node, selected);
            if !node.buttons.is_empty() {
                line.spans.push(Span::styled(
                    format!("  ({})", node.buttons.join(" ")),
                    Style::default().fg(colors.muted()),
                ));
            }
            lines.push(line);
        }
        if let Some(files) = &self.site.files
            && active == Some("filemanager")
        {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!(" cwd {}  reloads {}", files.path(), files.reloads),
                Style::default().fg(colors.muted()),
            )));
        }
        let title = match active {
            Some(id) => format!("Admin · {id}"),
            None => "Admin".to_string(),
        };
        Paragraph::new(lines)
            .block(self.block(&title, focused))
            .render(rows[1], buf);
    }
}

impl Widget for PageView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let page = PageKind::for_path(&self.site.current_path())
            .filter(|p| *p != PageKind::Admin || self.site.is_admin());
        match page {
            Some(PageKind::Article) => self.render_article(area, buf),
            Some(PageKind::Archive) => self.render_archive(area, buf),
            Some(PageKind::About) => self.render_about(area, buf),
            Some(PageKind::Admin) => self.render_admin(area, buf),
            None => self.render_home(area, buf),
        }
    }
}
