//! The four page variants, expressed as profiles of the one controller.

use crate::focus::item::ScrollBlock;
use crate::focus::profile::{
    FocusProfile, ItemAction, LevelCommand, LevelSpec, OverlayPolicy, RowCapabilities, RowTable,
    TabSpec, ToolbarAction,
};
use crate::keyboard::Key;
use crate::keyboard::key::SPACE;
use crate::shortcuts::action::{Capability, FileCommand};
use crate::shortcuts::help::HelpSection;

/// Default distance the article pane scrolls per arrow press.
pub const ARTICLE_SCROLL_STEP: i32 = 200;

/// Level pushed while a dialog is open in admin focus mode.
pub const ADMIN_MODAL_LEVEL: &str = "modal";

/// Admin tabs in digit order: `1` is articles, `0` is settings.
pub const ADMIN_TABS: [(&str, &str); 10] = [
    ("articles", "Articles"),
    ("users", "Users"),
    ("comments", "Comments"),
    ("categories", "Categories"),
    ("tags", "Tags"),
    ("analytics", "Analytics"),
    ("about", "About"),
    ("filemanager", "File manager"),
    ("attachments", "Attachments"),
    ("settings", "Settings"),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum PageKind {
    Article,
    Archive,
    About,
    Admin,
}

impl PageKind {
    /// Picks the page variant for a location, if it has a focus mode.
    pub fn for_path(path: &str) -> Option<Self> {
        let path = path.trim_end_matches('/');
        if path == "/admin" || path.starts_with("/admin/") {
            Some(PageKind::Admin)
        } else if path.starts_with("/passage") {
            Some(PageKind::Article)
        } else if path.starts_with("/collect") {
            Some(PageKind::Archive)
        } else if path.starts_with("/about") {
            Some(PageKind::About)
        } else {
            None
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            PageKind::Article => "/passage",
            PageKind::Archive => "/collect",
            PageKind::About => "/about",
            PageKind::Admin => "/admin",
        }
    }

    pub fn profile(self, scroll_step: i32) -> FocusProfile {
        match self {
            PageKind::Article => article(scroll_step),
            PageKind::Archive => archive(),
            PageKind::About => about(),
            PageKind::Admin => admin(),
        }
    }
}

fn base(name: &str, marker: &str, selected_class: &str, levels: Vec<LevelSpec>) -> FocusProfile {
    FocusProfile {
        name: name.to_string(),
        marker: marker.to_string(),
        selected_class: selected_class.to_string(),
        enter_key: Key::Char('i'),
        exit_key: Key::Char('q'),
        levels,
        rows: RowTable::new(RowCapabilities::on_enter(vec![ItemAction::Click])),
        tabs: Vec::new(),
        overlay_policy: OverlayPolicy::Suspend,
        overlay_level: None,
        silences_global: false,
        enter_message: "Entered focus mode (press q to exit)".to_string(),
        exit_message: "Exited focus mode".to_string(),
        pause_message: "Focus mode paused (press i to resume)".to_string(),
        help: HelpSection::new(""),
    }
}

fn mode_help(title: &str, escape: &str, note: &str) -> HelpSection {
    HelpSection::new(title)
        .entry(&[&Key::Char('i')], "Enter focus mode")
        .entry(&[&Key::Char('q')], "Exit focus mode")
        .entry(&[&Key::Escape], escape)
        .note(note)
}

/// Reading page: a file tree on the left, the article on the right.
pub fn article(scroll_step: i32) -> FocusProfile {
    let left = LevelSpec::list("left")
        .marker("focus-mode-left")
        .scroll(ScrollBlock::Nearest)
        .bind(Key::Left, LevelCommand::Panel("left".into()))
        .bind(Key::Right, LevelCommand::Panel("right".into()))
        .bind(Key::Char('u'), LevelCommand::ToggleExpand);
    let right = LevelSpec::list("right")
        .marker("focus-mode-right")
        .bind(Key::Up, LevelCommand::Scroll(-scroll_step))
        .bind(Key::Down, LevelCommand::Scroll(scroll_step))
        .bind(Key::Left, LevelCommand::Panel("left".into()))
        .bind(Key::Right, LevelCommand::Panel("right".into()))
        .bind(Key::Enter, LevelCommand::Announce("Article reading mode".into()));

    let mut profile = base("article", "focus-mode", "focus-selected", vec![left, right]);
    profile.rows = RowTable::new(RowCapabilities::on_enter(vec![ItemAction::Click]))
        .with(
            "folder",
            RowCapabilities::on_enter(vec![ItemAction::ToggleExpand]).expandable(),
        )
        .with(
            "file",
            RowCapabilities::on_enter(vec![
                ItemAction::Click,
                ItemAction::SwitchPanel("right".into()),
            ]),
        );
    profile.enter_message = "Entered reading focus mode (press q to exit)".to_string();
    profile.exit_message = "Exited reading focus mode".to_string();
    profile.help = mode_help(
        "Article page focus mode",
        "Pause focus mode (closes dialogs)",
        "← → switch panel, ↑ ↓ move, Enter activate, u expand or collapse",
    );
    profile
}

/// Archive page: cards on the main level, their buttons and tags below.
pub fn archive() -> FocusProfile {
    let main = LevelSpec::list("main")
        .lateral_step()
        .marker("collect-focus-mode-main");
    let sub = LevelSpec::list("sub")
        .lateral_step()
        .marker("collect-focus-mode-sub");

    let descend = RowCapabilities::on_enter(vec![ItemAction::Descend("sub".into())]);
    let mut profile = base(
        "archive",
        "collect-focus-mode",
        "collect-focus-selected",
        vec![main, sub],
    );
    profile.rows = RowTable::new(RowCapabilities::on_enter(vec![ItemAction::Click]))
        .with("article", RowCapabilities::on_enter(vec![ItemAction::Follow]))
        .with("filter-card", descend.clone())
        .with("timeline-card", descend.clone())
        .with("tag-card", descend);
    profile.help = mode_help(
        "Archive page focus mode",
        "Back one level or pause",
        "↑ ↓ ← → move, Enter open or activate, ESC back",
    );
    profile
}

/// About page: one list of cards.
pub fn about() -> FocusProfile {
    let mut profile = base(
        "about",
        "about-focus-mode",
        "about-focus-selected",
        vec![LevelSpec::list("cards")],
    );
    profile.rows = RowTable::new(RowCapabilities::on_enter(vec![ItemAction::Reveal]));
    profile.help = mode_help(
        "About page focus mode",
        "Pause focus mode (closes dialogs)",
        "↑ ↓ move between cards, Enter view card",
    );
    profile
}

fn press(role: &str) -> ItemAction {
    ItemAction::Press(role.to_string())
}

fn edit_or_view() -> RowCapabilities {
    RowCapabilities::on_enter(vec![ItemAction::FirstOf(vec![press("edit"), press("view")])])
}

fn admin_tab(id: &str, label: &str, rows: RowCapabilities) -> TabSpec {
    TabSpec::new(id, label, RowTable::new(rows))
        .tool('r', ToolbarAction::Button("refresh".into()))
        .tool('n', ToolbarAction::Button("new".into()))
        .tool('u', ToolbarAction::Button("upload".into()))
        .tool('f', ToolbarAction::Button("search".into()))
        .tool('?', ToolbarAction::Help)
}

fn admin_tabs() -> Vec<TabSpec> {
    ADMIN_TABS
        .iter()
        .map(|&(id, label)| match id {
            "articles" => admin_tab(
                id,
                label,
                RowCapabilities::on_enter(vec![press("view")])
                    .key('e', press("edit"))
                    .key('d', press("delete"))
                    .key('v', press("view"))
                    .key('a', press("attach"))
                    .key('p', press("publish")),
            ),
            "users" => admin_tab(
                id,
                label,
                edit_or_view()
                    .key('e', press("edit"))
                    .key('d', press("delete")),
            ),
            "comments" => admin_tab(
                id,
                label,
                edit_or_view()
                    .key('a', press("approve"))
                    .key('d', press("delete")),
            ),
            "categories" | "tags" => admin_tab(
                id,
                label,
                edit_or_view()
                    .key('e', press("edit"))
                    .key('d', press("delete")),
            )
            .tool('a', ToolbarAction::Button("add".into())),
            "about" => admin_tab(
                id,
                label,
                edit_or_view()
                    .key('e', press("edit"))
                    .key('d', press("toggle"))
                    .key('c', press("delete")),
            ),
            "filemanager" => admin_tab(
                id,
                label,
                RowCapabilities::on_enter(vec![ItemAction::OpenFile])
                    .key('r', ItemAction::Invoke(Capability::Files(FileCommand::Rename)))
                    .key_named(
                        Key::Delete,
                        ItemAction::Invoke(Capability::Files(FileCommand::Delete)),
                    ),
            )
            .tool(
                'r',
                ToolbarAction::ButtonOr(
                    "refresh".into(),
                    Capability::Files(FileCommand::Reload),
                ),
            )
            .tool_key(
                Key::Backspace,
                ToolbarAction::Invoke(Capability::Files(FileCommand::Back)),
            ),
            "attachments" => admin_tab(
                id,
                label,
                RowCapabilities::on_enter(vec![press("view")])
                    .key('v', press("view"))
                    .key('e', press("edit"))
                    .key('d', press("delete")),
            ),
            "settings" => admin_tab(id, label, RowCapabilities::default())
                .tool('r', ToolbarAction::Button("reset".into()))
                .with_sections(settings_help()),
            _ => admin_tab(id, label, edit_or_view()),
        })
        .collect()
}

fn settings_help() -> HelpSection {
    HelpSection::new("Settings shortcuts")
        .entry(&[&Key::Char('1'), &Key::Char('7')], "Jump to settings section")
        .entry(&[&Key::Char('s')], "Save the section in view")
        .entry(&[&Key::Char('r')], "Reset to defaults")
        .entry(&[&Key::Tab], "Next form control")
        .entry(&[&Key::Char('q')], "Exit focus mode")
        .note("Digits and s also work while editing a field; s commits the field before saving")
}

/// Admin dashboard: ten tabs of tables, a settings form, and dialogs that
/// nest inside focus mode instead of pausing it.
pub fn admin() -> FocusProfile {
    let rows = LevelSpec::list("rows")
        .wrapping()
        .paging()
        .scroll(ScrollBlock::Nearest)
        .bind(SPACE, LevelCommand::ToggleMark)
        .bind(Key::Tab, LevelCommand::NextGroup)
        .bind(Key::Left, LevelCommand::PrevTab)
        .bind(Key::Right, LevelCommand::NextTab);
    let modal = LevelSpec::pseudo(ADMIN_MODAL_LEVEL);

    let mut profile = base("admin", "admin-focus-mode", "selected", vec![rows, modal]);
    profile.rows = RowTable::new(edit_or_view());
    profile.tabs = admin_tabs();
    profile.overlay_policy = OverlayPolicy::Nest;
    profile.overlay_level = Some(ADMIN_MODAL_LEVEL.to_string());
    profile.silences_global = true;
    profile.enter_message = "Entered admin focus mode".to_string();
    profile.exit_message = "Exited admin focus mode".to_string();
    profile.help = HelpSection::new("Admin focus mode")
        .entry(&[&Key::Char('i')], "Enter focus mode")
        .entry(&[&Key::Char('q')], "Exit focus mode")
        .entry(&[&Key::Char('1'), &Key::Char('0')], "Switch tab")
        .entry(&[&Key::Left, &Key::Right], "Previous or next tab")
        .entry(&[&Key::Up, &Key::Down], "Move between rows")
        .entry(&[&Key::Enter], "Open the selected row")
        .entry(&[&SPACE], "Mark row")
        .entry(&[&Key::Char('r')], "Refresh")
        .entry(&[&Key::Char('n')], "New item")
        .entry(&[&Key::Char('f')], "Search")
        .note("Rows also take e edit, d delete, v view where the tab supports them");
    profile
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_for_path() {
        assert_eq!(PageKind::for_path("/admin"), Some(PageKind::Admin));
        assert_eq!(PageKind::for_path("/admin/users"), Some(PageKind::Admin));
        assert_eq!(PageKind::for_path("/passage/rust"), Some(PageKind::Article));
        assert_eq!(PageKind::for_path("/collect"), Some(PageKind::Archive));
        assert_eq!(PageKind::for_path("/about/"), Some(PageKind::About));
        assert_eq!(PageKind::for_path("/"), None);
        assert_eq!(PageKind::for_path("/administrator"), None);
    }

    #[test]
    fn test_profiles_name_their_markers() {
        let markers: Vec<String> = [
            PageKind::Article,
            PageKind::Archive,
            PageKind::About,
            PageKind::Admin,
        ]
        .iter()
        .map(|p| p.profile(ARTICLE_SCROLL_STEP).marker)
        .collect();
        assert_eq!(
            markers,
            vec![
                "focus-mode",
                "collect-focus-mode",
                "about-focus-mode",
                "admin-focus-mode"
            ]
        );
    }

    #[test]
    fn test_admin_tabs_in_digit_order() {
        let profile = admin();
        assert_eq!(profile.tabs.len(), 10);
        assert_eq!(profile.tab_index("articles"), Some(0));
        assert_eq!(profile.tab_index("settings"), Some(9));
        assert!(profile.tabs[9].sections);
        assert!(profile.tabs.iter().filter(|t| t.sections).count() == 1);
    }

    #[test]
    fn test_filemanager_row_keys_before_toolbar() {
        let profile = admin();
        let files = &profile.tabs[profile.tab_index("filemanager").unwrap()];
        assert_eq!(
            files.rows.get("file").action_for(&Key::Char('r')),
            Some(&ItemAction::Invoke(Capability::Files(FileCommand::Rename)))
        );
        assert!(matches!(
            files.toolbar_action(&Key::Char('r')),
            Some(ToolbarAction::ButtonOr(_, _))
        ));
    }

    #[test]
    fn test_settings_reset_replaces_refresh() {
        let profile = admin();
        let settings = &profile.tabs[9];
        assert_eq!(
            settings.toolbar_action(&Key::Char('r')),
            Some(&ToolbarAction::Button("reset".into()))
        );
    }

    #[test]
    fn test_article_right_panel_scrolls() {
        let profile = article(120);
        let right = profile.level("right").unwrap();
        assert_eq!(right.command_for(&Key::Down), Some(&LevelCommand::Scroll(120)));
        assert_eq!(right.command_for(&Key::Up), Some(&LevelCommand::Scroll(-120)));
    }
}
