mod app;
mod event;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use keynav::PageKind;
use keynav::config::Config;
use keynav::host::Host;

use app::App;
use event::{AppEvent, EventHandler};
use ui::components::overlay_view::OverlayView;
use ui::components::page_view::PageView;
use ui::components::sidebar::Sidebar;
use ui::components::toasts::Toasts;
use ui::layout::AppLayout;

#[derive(Parser)]
#[command(
    name = "keynav",
    version,
    about = "Keyboard focus-mode navigation demo in the terminal"
)]
struct Cli {
    #[arg(short, long, value_enum, help = "Page to open")]
    page: Option<PageKind>,

    #[arg(long, help = "Open an exact path instead, e.g. /passage/ownership")]
    path: Option<String>,

    #[arg(short, long, help = "Browse as an administrator")]
    admin: bool,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Log file or directory")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log = keynav::logging::init(cli.log_file.clone())?;

    let mut config = Config::load().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "invalid config, using defaults");
        Config::default()
    });
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    let path = cli
        .path
        .or_else(|| cli.page.map(|p| p.path().to_string()))
        .unwrap_or_else(|| "/".to_string());
    // The admin page is only reachable by administrators.
    let admin = cli.admin || cli.page == Some(PageKind::Admin);

    let mut app = App::new(config, &path, admin);
    tracing::info!(%path, admin, "keynav started");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(50));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => app.handle_key(key),
            AppEvent::Tick => app.tick(),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let layout = AppLayout::new(area);
    let buf = frame.buffer_mut();

    Block::default()
        .style(Style::default().bg(colors.bg()))
        .render(area, buf);

    render_header(app, layout.header, buf);
    PageView::new(&app.site, app.theme).render(layout.main, buf);
    if let Some(sidebar) = layout.sidebar {
        Sidebar::new(&app.site, &app.context, app.theme).render(sidebar, buf);
    }
    Toasts::new(app.context.notifier(), app.floating_text(), app.theme).render(layout.footer, buf);

    if let Some((id, overlay)) = app.site.open_overlays().into_iter().last() {
        OverlayView::new(id, overlay, &app.site, app.theme).render(layout.main, buf);
    }
}

fn render_header(app: &App, area: ratatui::layout::Rect, buf: &mut ratatui::buffer::Buffer) {
    let colors = &app.theme.colors;
    let current = app.site.current_path();
    let registry = app.context.dispatcher().registry();
    let mut spans = vec![Span::styled(
        " keynav ",
        Style::default()
            .fg(colors.header_fg())
            .bg(colors.accent_dim())
            .add_modifier(Modifier::BOLD),
    )];
    for (url, label) in [
        ("/", "Home"),
        ("/passage", "Articles"),
        ("/collect", "Archive"),
        ("/about", "About"),
        ("/admin", "Admin"),
    ] {
        let key = registry
            .key_for_url(url)
            .map(|k| format!("{}:", k.label()))
            .unwrap_or_default();
        let style = if current == url || (url != "/" && current.starts_with(url)) {
            Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.header_fg())
        };
        spans.push(Span::styled(format!("  {key}{label}"), style));
    }
    let user = if app.site.is_admin() { "admin" } else { "visitor" };
    spans.push(Span::styled(
        format!("   {current} · {user}"),
        Style::default().fg(colors.muted()),
    ));

    Paragraph::new(Line::from(spans))
        .block(Block::bordered().border_style(Style::default().fg(colors.border())))
        .style(Style::default().bg(colors.header_bg()))
        .render(area, buf);
}
