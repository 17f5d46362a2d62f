//! Configuration for the focus-mode state machine.
//!
//! Every page variant is a [`FocusProfile`]: level names with their key maps
//! and motion policy, a capability table keyed by item kind, and for the
//! admin page a strip of tabs with their toolbar keys.

use std::collections::HashMap;

use crate::focus::item::ScrollBlock;
use crate::keyboard::Key;
use crate::shortcuts::action::Capability;
use crate::shortcuts::help::HelpSection;

/// What happens at the ends of a list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Motion {
    #[default]
    Clamp,
    Wrap,
}

/// A key's meaning inside one level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LevelCommand {
    Prev,
    Next,
    First,
    Last,
    PagePrev,
    PageNext,
    Activate,
    ToggleExpand,
    ToggleMark,
    /// Jump to the first item of the next group (the other table).
    NextGroup,
    /// Replace the root level with a sibling panel.
    Panel(String),
    /// Scroll the reading pane instead of moving a cursor.
    Scroll(i32),
    Announce(String),
    PrevTab,
    NextTab,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelSpec {
    pub name: String,
    pub motion: Motion,
    pub keymap: Vec<(Key, LevelCommand)>,
    /// Root marker present while this level is current.
    pub marker: Option<String>,
    pub scroll: ScrollBlock,
    /// Whether the level's items come from the page. Pseudo levels such as
    /// an admin dialog have none.
    pub collects: bool,
}

impl LevelSpec {
    /// ↑/↓ move the cursor, Enter activates.
    pub fn list(name: &str) -> Self {
        Self {
            name: name.to_string(),
            motion: Motion::Clamp,
            keymap: vec![
                (Key::Up, LevelCommand::Prev),
                (Key::Down, LevelCommand::Next),
                (Key::Enter, LevelCommand::Activate),
            ],
            marker: None,
            scroll: ScrollBlock::Center,
            collects: true,
        }
    }

    /// A level with no items and no keys of its own.
    pub fn pseudo(name: &str) -> Self {
        Self {
            name: name.to_string(),
            motion: Motion::Clamp,
            keymap: Vec::new(),
            marker: None,
            scroll: ScrollBlock::Nearest,
            collects: false,
        }
    }

    pub fn wrapping(mut self) -> Self {
        self.motion = Motion::Wrap;
        self
    }

    /// ←/→ behave like ↑/↓.
    pub fn lateral_step(self) -> Self {
        self.bind(Key::Left, LevelCommand::Prev)
            .bind(Key::Right, LevelCommand::Next)
    }

    pub fn paging(self) -> Self {
        self.bind(Key::Home, LevelCommand::First)
            .bind(Key::End, LevelCommand::Last)
            .bind(Key::PageUp, LevelCommand::PagePrev)
            .bind(Key::PageDown, LevelCommand::PageNext)
    }

    pub fn marker(mut self, marker: &str) -> Self {
        self.marker = Some(marker.to_string());
        self
    }

    pub fn scroll(mut self, block: ScrollBlock) -> Self {
        self.scroll = block;
        self
    }

    /// Adds or replaces the meaning of `key`.
    pub fn bind(mut self, key: Key, command: LevelCommand) -> Self {
        self.keymap.retain(|(k, _)| k != &key);
        self.keymap.push((key, command));
        self
    }

    pub fn command_for(&self, key: &Key) -> Option<&LevelCommand> {
        self.keymap.iter().find(|(k, _)| k == key).map(|(_, c)| c)
    }
}

/// One step run against the selected item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemAction {
    Click,
    /// Navigate to the item's link.
    Follow,
    /// Push `level` populated from the item's children; with no children the
    /// item is clicked instead.
    Descend(String),
    SwitchPanel(String),
    ToggleExpand,
    /// Scroll the item to the top and name it in a toast.
    Reveal,
    Notify(String),
    /// Activate the row's button with this role.
    Press(String),
    /// Open the item's link in the file manager.
    OpenFile,
    Invoke(Capability),
    /// Try each action in turn until one finds its target.
    FirstOf(Vec<ItemAction>),
}

/// What a kind of item can do: its Enter behaviour and its own keys.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowCapabilities {
    pub primary: Vec<ItemAction>,
    pub keys: Vec<(Key, ItemAction)>,
    pub expandable: bool,
}

impl RowCapabilities {
    pub fn on_enter(actions: Vec<ItemAction>) -> Self {
        Self {
            primary: actions,
            ..Self::default()
        }
    }

    pub fn key(mut self, key: char, action: ItemAction) -> Self {
        self.keys.push((Key::Char(key), action));
        self
    }

    pub fn key_named(mut self, key: Key, action: ItemAction) -> Self {
        self.keys.push((key, action));
        self
    }

    pub fn expandable(mut self) -> Self {
        self.expandable = true;
        self
    }

    pub fn action_for(&self, key: &Key) -> Option<&ItemAction> {
        self.keys.iter().find(|(k, _)| k == key).map(|(_, a)| a)
    }
}

/// Item kind → capabilities, with a fallback for unlisted kinds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowTable {
    kinds: HashMap<String, RowCapabilities>,
    fallback: RowCapabilities,
}

impl RowTable {
    pub fn new(fallback: RowCapabilities) -> Self {
        Self {
            kinds: HashMap::new(),
            fallback,
        }
    }

    pub fn with(mut self, kind: &str, caps: RowCapabilities) -> Self {
        self.kinds.insert(kind.to_string(), caps);
        self
    }

    pub fn get(&self, kind: &str) -> &RowCapabilities {
        self.kinds.get(kind).unwrap_or(&self.fallback)
    }
}

/// Toolbar command of an admin tab, independent of the selected row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ToolbarAction {
    /// Press the tab's toolbar button with this role.
    Button(String),
    /// Press the button, falling back to a collaborator when it is missing.
    ButtonOr(String, Capability),
    Invoke(Capability),
    Help,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabSpec {
    pub id: String,
    pub label: String,
    pub rows: RowTable,
    pub toolbar: Vec<(Key, ToolbarAction)>,
    /// Settings-style tab: digits jump to sections, `s` saves the section
    /// in view, Tab cycles the form controls.
    pub sections: bool,
    pub help: Option<HelpSection>,
}

impl TabSpec {
    pub fn new(id: &str, label: &str, rows: RowTable) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            rows,
            toolbar: Vec::new(),
            sections: false,
            help: None,
        }
    }

    pub fn tool(self, key: char, action: ToolbarAction) -> Self {
        self.tool_key(Key::Char(key), action)
    }

    pub fn tool_key(mut self, key: Key, action: ToolbarAction) -> Self {
        self.toolbar.retain(|(k, _)| k != &key);
        self.toolbar.push((key, action));
        self
    }

    pub fn with_sections(mut self, help: HelpSection) -> Self {
        self.sections = true;
        self.help = Some(help);
        self
    }

    pub fn toolbar_action(&self, key: &Key) -> Option<&ToolbarAction> {
        self.toolbar.iter().find(|(k, _)| k == key).map(|(_, a)| a)
    }
}

/// How a controller reacts when a dialog opens while it is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverlayPolicy {
    /// Pause, keeping state for the next enter key.
    #[default]
    Suspend,
    /// Stay active and push the named dialog level.
    Nest,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FocusProfile {
    pub name: String,
    /// Root marker while the mode is active, e.g. `"collect-focus-mode"`.
    pub marker: String,
    /// Marker class moved onto the selected item.
    pub selected_class: String,
    pub enter_key: Key,
    pub exit_key: Key,
    /// Every level this controller can be in; the first is the root.
    pub levels: Vec<LevelSpec>,
    pub rows: RowTable,
    pub tabs: Vec<TabSpec>,
    pub overlay_policy: OverlayPolicy,
    /// Name of the level pushed under [`OverlayPolicy::Nest`].
    pub overlay_level: Option<String>,
    /// While active, keys this controller declines never reach the
    /// site-wide shortcuts.
    pub silences_global: bool,
    pub enter_message: String,
    pub exit_message: String,
    pub pause_message: String,
    pub help: HelpSection,
}

impl FocusProfile {
    pub fn root(&self) -> &LevelSpec {
        &self.levels[0]
    }

    pub fn level(&self, name: &str) -> Option<&LevelSpec> {
        self.levels.iter().find(|l| l.name == name)
    }

    pub fn has_tabs(&self) -> bool {
        !self.tabs.is_empty()
    }

    pub fn tab_index(&self, id: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }

    /// Rebinds the enter and exit keys, renaming them in the toasts and
    /// help entries that mention them.
    pub fn with_mode_keys(mut self, enter: Key, exit: Key) -> Self {
        let (old_enter, old_exit) = (self.enter_key.label(), self.exit_key.label());
        let (new_enter, new_exit) = (enter.label(), exit.label());
        let press = |label: &str| format!("press {label}");
        self.enter_message = self.enter_message.replace(&press(&old_exit), &press(&new_exit));
        self.pause_message = self.pause_message.replace(&press(&old_enter), &press(&new_enter));

        let sections = std::iter::once(&mut self.help)
            .chain(self.tabs.iter_mut().filter_map(|t| t.help.as_mut()));
        for section in sections {
            for entry in &mut section.entries {
                if entry.keys == old_enter {
                    entry.keys = new_enter.clone();
                } else if entry.keys == old_exit {
                    entry.keys = new_exit.clone();
                }
            }
        }
        self.enter_key = enter;
        self.exit_key = exit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_keymap() {
        let level = LevelSpec::list("main");
        assert_eq!(level.command_for(&Key::Up), Some(&LevelCommand::Prev));
        assert_eq!(level.command_for(&Key::Enter), Some(&LevelCommand::Activate));
        assert_eq!(level.command_for(&Key::Left), None);
    }

    #[test]
    fn test_bind_replaces() {
        let level = LevelSpec::list("right")
            .bind(Key::Up, LevelCommand::Scroll(-200))
            .bind(Key::Down, LevelCommand::Scroll(200));
        assert_eq!(level.command_for(&Key::Up), Some(&LevelCommand::Scroll(-200)));
        assert_eq!(level.keymap.len(), 3);
    }

    #[test]
    fn test_row_table_fallback() {
        let table = RowTable::new(RowCapabilities::on_enter(vec![ItemAction::Click]))
            .with("article", RowCapabilities::on_enter(vec![ItemAction::Follow]));
        assert_eq!(table.get("article").primary, vec![ItemAction::Follow]);
        assert_eq!(table.get("other").primary, vec![ItemAction::Click]);
    }

    #[test]
    fn test_mode_keys_renamed_in_messages() {
        let profile = crate::focus::pages::about().with_mode_keys(Key::Char('f'), Key::Escape);
        assert_eq!(profile.enter_key, Key::Char('f'));
        assert!(profile.enter_message.contains("press ESC"));
        assert!(profile.pause_message.contains("press f"));
        assert_eq!(profile.help.entries[0].keys, "f");
        assert_eq!(profile.help.entries[1].keys, "ESC");
    }

    #[test]
    fn test_tab_tool_replaces() {
        let tab = TabSpec::new("files", "Files", RowTable::default())
            .tool('r', ToolbarAction::Button("refresh".into()))
            .tool('r', ToolbarAction::Help);
        assert_eq!(tab.toolbar_action(&Key::Char('r')), Some(&ToolbarAction::Help));
        assert_eq!(tab.toolbar.len(), 1);
    }
}
