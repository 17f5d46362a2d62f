//! The focus-mode state machine shared by every page.
//!
//! A controller is `Inactive` until its enter key, then routes keys through
//! the current level's key map, the selected item's capabilities and, on
//! tabbed pages, the tab toolbar. Escape pops one level or pauses at the
//! root; a paused controller resumes with the same levels and cursors.

use std::ops::Range;
use std::time::{Duration, Instant};

use crate::error::CapabilityError;
use crate::focus::item::{NavigableItem, ScrollBlock};
use crate::focus::profile::{
    FocusProfile, ItemAction, LevelCommand, LevelSpec, Motion, OverlayPolicy, RowCapabilities,
    TabSpec, ToolbarAction,
};
use crate::focus::session::FocusSession;
use crate::host::{CollectScope, Host};
use crate::keyboard::{DocumentState, Key, KeyPress};
use crate::notify::Notifier;
use crate::overlay::trap::cycle_index;
use crate::shortcuts::action::{Capability, FileCommand};
use crate::shortcuts::dispatcher::invoke_capability;
use crate::shortcuts::help::{HelpSection, HelpSheet};
use crate::timers::TimerQueue;

/// Settings sections reachable by digit on a sectioned tab.
const SECTION_DIGITS: std::ops::RangeInclusive<u32> = 1..=7;

/// Work postponed until a blurred input has committed its value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Deferred {
    JumpToSection(usize),
    SaveSection,
}

pub struct FocusEnv<'a> {
    pub host: &'a mut dyn Host,
    pub notifier: &'a mut Notifier,
    pub timers: &'a mut TimerQueue<Deferred>,
    pub now: Instant,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControllerOptions {
    /// Rows moved by PageUp/PageDown.
    pub page_jump: usize,
    /// Delay between blurring an input and acting on its value.
    pub input_settle: Duration,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            page_jump: 10,
            input_settle: Duration::from_millis(100),
        }
    }
}

pub struct FocusModeController {
    profile: FocusProfile,
    options: ControllerOptions,
    session: FocusSession,
    items: Vec<NavigableItem>,
    tab: usize,
}

impl FocusModeController {
    pub fn new(profile: FocusProfile, options: ControllerOptions) -> Self {
        Self {
            profile,
            options,
            session: FocusSession::new(),
            items: Vec::new(),
            tab: 0,
        }
    }

    pub fn profile(&self) -> &FocusProfile {
        &self.profile
    }

    pub fn session(&self) -> &FocusSession {
        &self.session
    }

    pub fn is_active(&self) -> bool {
        self.session.is_active()
    }

    /// Items of the current level, rebuilt on every level change.
    pub fn items(&self) -> &[NavigableItem] {
        &self.items
    }

    pub fn cursor(&self) -> usize {
        self.session.cursor()
    }

    pub fn selected(&self) -> Option<&NavigableItem> {
        if !self.session.is_active() {
            return None;
        }
        self.items.get(self.session.cursor())
    }

    pub fn current_tab(&self) -> Option<&TabSpec> {
        self.profile.tabs.get(self.tab)
    }

    /// While true, keys this controller declines must not reach the
    /// site-wide shortcuts.
    pub fn silences_global(&self) -> bool {
        self.profile.silences_global && self.session.is_active()
    }

    /// Keys that still reach this controller while a text field has focus.
    pub fn input_exempt(&self) -> Vec<Key> {
        let mut keys = vec![Key::Escape];
        if self.on_sections_tab() {
            keys.push(self.profile.exit_key.clone());
            keys.push(Key::Char('s'));
            keys.extend(SECTION_DIGITS.filter_map(|d| char::from_digit(d, 10)).map(Key::Char));
        }
        keys
    }

    pub fn page_help(&self) -> HelpSection {
        self.profile.help.clone()
    }

    fn on_sections_tab(&self) -> bool {
        self.session.is_active() && self.current_tab().is_some_and(|t| t.sections)
    }

    fn current_level(&self) -> Option<&LevelSpec> {
        self.session.level().and_then(|name| self.profile.level(name))
    }

    fn row_caps(&self, kind: &str) -> &RowCapabilities {
        match self.current_tab() {
            Some(tab) => tab.rows.get(kind),
            None => self.profile.rows.get(kind),
        }
    }

    /// Returns whether the key was consumed.
    pub fn handle(&mut self, press: &KeyPress, doc: &DocumentState, env: &mut FocusEnv<'_>) -> bool {
        let key = &press.key;
        let typing = doc.active.captures_typing();

        if *key == self.profile.enter_key {
            return self.enter(env);
        }
        if *key == self.profile.exit_key {
            if !self.session.is_active() && !self.session.is_paused() {
                return false;
            }
            if typing {
                env.host.blur();
            }
            self.exit(env);
            return true;
        }
        if !self.session.is_active() {
            return false;
        }
        if *key == Key::Escape {
            if typing {
                env.host.blur();
            }
            self.escape(env);
            return true;
        }
        if self.profile.has_tabs() && self.handle_tab_keys(press, typing, env) {
            return true;
        }

        if let Some(command) = self.current_level().and_then(|l| l.command_for(key)).cloned() {
            self.run_command(command, env);
            return true;
        }
        if let Some(item) = self.selected().cloned()
            && let Some(action) = self.row_caps(&item.kind).action_for(key).cloned()
        {
            self.run_item_action(&action, &item, env);
            return true;
        }
        if let Some(action) = self.current_tab().and_then(|t| t.toolbar_action(key)).cloned() {
            self.run_toolbar(action, env);
            return true;
        }
        false
    }

    /// Enter key. A no-op while active; declined while an overlay holds the
    /// focus trap; resumes a paused session instead of restarting it.
    fn enter(&mut self, env: &mut FocusEnv<'_>) -> bool {
        if self.session.is_active() {
            return true;
        }
        if self.session.active_overlay().is_some() {
            return false;
        }
        if self.session.is_paused() {
            self.session.resume();
            tracing::info!(page = %self.profile.name, levels = ?self.session.levels(), "focus mode resumed");
        } else {
            let root = self.profile.root().name.clone();
            self.session.activate(&root);
            tracing::info!(page = %self.profile.name, "focus mode entered");
        }
        self.set_markers(true, env);
        self.rebuild(env);
        self.apply_selection(env);
        env.notifier.success(self.profile.enter_message.clone());
        true
    }

    fn exit(&mut self, env: &mut FocusEnv<'_>) {
        if self.session.is_active() {
            self.set_markers(false, env);
            env.host.mark_selected(&self.profile.selected_class, None);
        }
        self.clear_marks(env);
        self.session.deactivate();
        self.items.clear();
        tracing::info!(page = %self.profile.name, "focus mode exited");
        env.notifier.info(self.profile.exit_message.clone());
    }

    /// Temporary exit: state stays for the next enter key.
    fn suspend(&mut self, env: &mut FocusEnv<'_>) {
        self.set_markers(false, env);
        env.host.mark_selected(&self.profile.selected_class, None);
        self.session.pause();
        tracing::info!(page = %self.profile.name, cursor = self.session.cursor(), "focus mode paused");
        env.notifier.info(self.profile.pause_message.clone());
    }

    fn escape(&mut self, env: &mut FocusEnv<'_>) {
        if self.session.depth() > 1 {
            self.pop_level(env);
        } else {
            self.suspend(env);
        }
    }

    /// A dialog opened somewhere on the page.
    pub fn on_overlay_opened(&mut self, id: &str, env: &mut FocusEnv<'_>) {
        self.session.set_active_overlay(Some(id.to_string()));
        if !self.session.is_active() {
            return;
        }
        match self.profile.overlay_policy {
            OverlayPolicy::Suspend => self.suspend(env),
            OverlayPolicy::Nest => {
                if let Some(level) = self.profile.overlay_level.clone() {
                    self.push_level(&level, None, env);
                }
            }
        }
    }

    pub fn on_overlay_closed(&mut self, id: &str, env: &mut FocusEnv<'_>) {
        if self.session.active_overlay() == Some(id) {
            self.session.set_active_overlay(None);
        }
        if self.session.is_active()
            && self.profile.overlay_policy == OverlayPolicy::Nest
            && self.session.level().is_some()
            && self.session.level() == self.profile.overlay_level.as_deref()
        {
            self.pop_level(env);
        }
    }

    /// The page switched tabs on its own, e.g. by a mouse click.
    pub fn sync_tab(&mut self, id: &str, env: &mut FocusEnv<'_>) {
        if let Some(index) = self.profile.tab_index(id)
            && index != self.tab
        {
            self.set_tab(index, env);
        }
    }

    /// The page content changed; rebuild the current list.
    pub fn refresh(&mut self, env: &mut FocusEnv<'_>) {
        if self.session.is_active() {
            self.rebuild(env);
            self.apply_selection(env);
        }
    }

    /// Runs a task postponed by [`Deferred`].
    pub fn run_deferred(&mut self, task: Deferred, env: &mut FocusEnv<'_>) {
        match task {
            Deferred::JumpToSection(index) => {
                if let Some(title) = env.host.jump_to_section(index) {
                    env.notifier.success(format!("Jumped to {title}"));
                }
            }
            Deferred::SaveSection => {
                let Some(title) = env.host.visible_section() else {
                    return;
                };
                let Some(role) = save_role(&title) else {
                    tracing::debug!(section = %title, "no save button for section");
                    return;
                };
                let Some(tab) = self.current_tab().map(|t| t.id.clone()) else {
                    return;
                };
                self.press_button(&tab, role, env);
            }
        }
    }

    fn handle_tab_keys(&mut self, press: &KeyPress, typing: bool, env: &mut FocusEnv<'_>) -> bool {
        let Some(tab) = self.current_tab() else {
            return false;
        };
        let key = &press.key;
        if tab.sections {
            if let Some(digit) = key.digit()
                && SECTION_DIGITS.contains(&digit)
            {
                self.section_task(Deferred::JumpToSection(digit as usize), typing, env);
                return true;
            }
            if *key == Key::Char('s') {
                self.section_task(Deferred::SaveSection, typing, env);
                return true;
            }
            if *key == Key::Tab {
                self.cycle_form_controls(press.shift, env);
                return true;
            }
            return false;
        }
        if let Some(digit) = key.digit() {
            let index = if digit == 0 { 9 } else { digit as usize - 1 };
            if index < self.profile.tabs.len() {
                self.switch_tab(index, env);
                return true;
            }
        }
        false
    }

    fn section_task(&mut self, task: Deferred, typing: bool, env: &mut FocusEnv<'_>) {
        if typing {
            env.host.blur();
            env.timers.schedule(env.now, self.options.input_settle, task);
        } else {
            self.run_deferred(task, env);
        }
    }

    fn cycle_form_controls(&mut self, backward: bool, env: &mut FocusEnv<'_>) {
        let controls = env.host.form_controls();
        let position = env
            .host
            .focused()
            .and_then(|el| controls.iter().position(|c| *c == el));
        if let Some(next) = cycle_index(controls.len(), position, backward) {
            env.host.focus(controls[next]);
        }
    }

    fn run_command(&mut self, command: LevelCommand, env: &mut FocusEnv<'_>) {
        match command {
            LevelCommand::Prev => self.step(false, env),
            LevelCommand::Next => self.step(true, env),
            LevelCommand::First
            | LevelCommand::Last
            | LevelCommand::PagePrev
            | LevelCommand::PageNext => self.jump(&command, env),
            LevelCommand::Activate => self.activate(env),
            LevelCommand::ToggleExpand => {
                if let Some(item) = self.selected().cloned()
                    && self.row_caps(&item.kind).expandable
                {
                    self.run_item_action(&ItemAction::ToggleExpand, &item, env);
                }
            }
            LevelCommand::ToggleMark => {
                if let Some(element) = self.selected().map(|i| i.element) {
                    let on = self.session.toggle_mark(element);
                    env.host.mark_row(element, on);
                }
            }
            LevelCommand::NextGroup => self.next_group(env),
            LevelCommand::Panel(name) => self.switch_panel(&name, env),
            LevelCommand::Scroll(delta) => env.host.scroll_panel(delta),
            LevelCommand::Announce(message) => {
                env.notifier.info(message);
            }
            LevelCommand::PrevTab | LevelCommand::NextTab => {
                let len = self.profile.tabs.len();
                if len > 0 {
                    let next = if command == LevelCommand::NextTab {
                        (self.tab + 1) % len
                    } else {
                        (self.tab + len - 1) % len
                    };
                    self.switch_tab(next, env);
                }
            }
        }
    }

    /// ±1 under the level's motion policy. An empty list swallows the key
    /// without touching the selection.
    fn step(&mut self, forward: bool, env: &mut FocusEnv<'_>) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        let current = self.session.cursor().min(len - 1);
        let motion = self.current_level().map(|l| l.motion).unwrap_or_default();
        let next = match (motion, forward) {
            (Motion::Clamp, true) => (current + 1).min(len - 1),
            (Motion::Clamp, false) => current.saturating_sub(1),
            (Motion::Wrap, true) => (current + 1) % len,
            (Motion::Wrap, false) => (current + len - 1) % len,
        };
        self.select(next, env);
    }

    /// Home/End/PageUp/PageDown, bounded by the current group.
    fn jump(&mut self, command: &LevelCommand, env: &mut FocusEnv<'_>) {
        if self.items.is_empty() {
            return;
        }
        let current = self.session.cursor().min(self.items.len() - 1);
        let range = self.group_range(current);
        let last = range.end - 1;
        let next = match command {
            LevelCommand::First => range.start,
            LevelCommand::Last => last,
            LevelCommand::PagePrev => current.saturating_sub(self.options.page_jump).max(range.start),
            LevelCommand::PageNext => (current + self.options.page_jump).min(last),
            _ => current,
        };
        self.select(next, env);
    }

    /// Contiguous run of items sharing the group of `index`.
    fn group_range(&self, index: usize) -> Range<usize> {
        let group = &self.items[index].group;
        let start = self.items[..index]
            .iter()
            .rposition(|i| &i.group != group)
            .map_or(0, |p| p + 1);
        let end = self.items[index..]
            .iter()
            .position(|i| &i.group != group)
            .map_or(self.items.len(), |p| index + p);
        start..end
    }

    /// Jumps to the first item of the following group, wrapping around.
    fn next_group(&mut self, env: &mut FocusEnv<'_>) {
        if self.items.is_empty() {
            return;
        }
        let current = self.session.cursor().min(self.items.len() - 1);
        let range = self.group_range(current);
        let target = (range.end..self.items.len())
            .chain(0..range.start)
            .find(|&i| self.items[i].group != self.items[current].group);
        if let Some(target) = target {
            let target = self.group_range(target).start;
            self.select(target, env);
        }
    }

    fn select(&mut self, index: usize, env: &mut FocusEnv<'_>) {
        self.session.set_cursor(index);
        self.apply_selection(env);
    }

    fn apply_selection(&self, env: &mut FocusEnv<'_>) {
        let class = &self.profile.selected_class;
        match self.items.get(self.session.cursor()) {
            Some(item) => {
                env.host.mark_selected(class, Some(item));
                let block = self
                    .current_level()
                    .map(|l| l.scroll)
                    .unwrap_or(ScrollBlock::Nearest);
                env.host.scroll_into_view(item, block);
            }
            None => env.host.mark_selected(class, None),
        }
    }

    /// Rebuilds the current level's list from the page, keeping the cursor
    /// in range.
    fn rebuild(&mut self, env: &mut FocusEnv<'_>) {
        let items = match self.current_level() {
            Some(level) if level.collects => {
                let tab = self.current_tab().map(|t| t.id.as_str());
                env.host.collect(CollectScope {
                    page: &self.profile.name,
                    level: &level.name,
                    parent: self.session.parent(),
                    tab,
                })
            }
            _ => Vec::new(),
        };
        self.items = items;
        let cursor = self.session.cursor();
        if self.items.is_empty() {
            self.session.set_cursor(0);
        } else if cursor >= self.items.len() {
            self.session.set_cursor(self.items.len() - 1);
        }
    }

    fn set_markers(&self, on: bool, env: &mut FocusEnv<'_>) {
        env.host.set_root_marker(&self.profile.marker, on);
        self.set_level_marker(on, env);
    }

    fn set_level_marker(&self, on: bool, env: &mut FocusEnv<'_>) {
        if let Some(marker) = self.current_level().and_then(|l| l.marker.as_deref()) {
            env.host.set_root_marker(marker, on);
        }
    }

    fn push_level(&mut self, name: &str, parent: Option<NavigableItem>, env: &mut FocusEnv<'_>) {
        self.set_level_marker(false, env);
        self.session.push_level(name, parent);
        self.set_level_marker(true, env);
        tracing::debug!(page = %self.profile.name, level = name, "level pushed");
        self.rebuild(env);
        self.apply_selection(env);
    }

    fn pop_level(&mut self, env: &mut FocusEnv<'_>) {
        self.set_level_marker(false, env);
        let popped = self.session.pop_level();
        self.set_level_marker(true, env);
        tracing::debug!(page = %self.profile.name, level = ?popped, "level popped");
        self.rebuild(env);
        self.apply_selection(env);
    }

    fn switch_panel(&mut self, name: &str, env: &mut FocusEnv<'_>) {
        if self.session.level() == Some(name) || self.profile.level(name).is_none() {
            return;
        }
        self.set_level_marker(false, env);
        self.session.replace_root(name);
        self.set_level_marker(true, env);
        self.rebuild(env);
        self.apply_selection(env);
    }

    fn switch_tab(&mut self, index: usize, env: &mut FocusEnv<'_>) {
        let Some(tab) = self.profile.tabs.get(index) else {
            return;
        };
        let (id, label) = (tab.id.clone(), tab.label.clone());
        if !env.host.activate_tab(&id) {
            tracing::debug!(tab = %id, "tab button missing");
            return;
        }
        self.set_tab(index, env);
        env.notifier.info(format!("Switched to {label}"));
    }

    fn set_tab(&mut self, index: usize, env: &mut FocusEnv<'_>) {
        self.clear_marks(env);
        self.tab = index;
        tracing::debug!(page = %self.profile.name, tab = index, "tab changed");
        if self.session.is_active() {
            self.session.set_cursor(0);
            self.rebuild(env);
            self.apply_selection(env);
        }
    }

    fn clear_marks(&mut self, env: &mut FocusEnv<'_>) {
        for element in self.session.marked().iter().copied() {
            env.host.mark_row(element, false);
        }
        self.session.clear_marks();
    }

    fn activate(&mut self, env: &mut FocusEnv<'_>) {
        let Some(item) = self.selected().cloned() else {
            return;
        };
        let actions = self.row_caps(&item.kind).primary.clone();
        for action in &actions {
            self.run_item_action(action, &item, env);
        }
    }

    /// Runs one item action; a collaborator failure becomes an error toast.
    fn run_item_action(&mut self, action: &ItemAction, item: &NavigableItem, env: &mut FocusEnv<'_>) {
        if let Err(err) = self.try_item_action(action, item, env) {
            tracing::warn!(error = %err, item = %item.element, "item action failed");
            env.notifier.error(format!("Action failed: {err}"));
        }
    }

    /// `Ok(false)` when the action's target does not exist.
    fn try_item_action(
        &mut self,
        action: &ItemAction,
        item: &NavigableItem,
        env: &mut FocusEnv<'_>,
    ) -> Result<bool, CapabilityError> {
        match action {
            ItemAction::Click => env.host.click(item.element),
            ItemAction::Follow => match &item.link {
                Some(url) => {
                    env.host.navigate(url)?;
                    Ok(true)
                }
                None => env.host.click(item.element),
            },
            ItemAction::Descend(level) => {
                let children = env.host.collect(CollectScope {
                    page: &self.profile.name,
                    level,
                    parent: Some(item),
                    tab: self.current_tab().map(|t| t.id.as_str()),
                });
                if children.is_empty() {
                    return env.host.click(item.element);
                }
                self.set_level_marker(false, env);
                self.session.push_level(level, Some(item.clone()));
                self.set_level_marker(true, env);
                self.items = children;
                self.apply_selection(env);
                Ok(true)
            }
            ItemAction::SwitchPanel(name) => {
                self.switch_panel(name, env);
                Ok(true)
            }
            ItemAction::ToggleExpand => {
                env.host.toggle_expand(item.element);
                self.rebuild(env);
                self.apply_selection(env);
                Ok(true)
            }
            ItemAction::Reveal => {
                env.host.scroll_into_view(item, ScrollBlock::Start);
                env.notifier.info(format!("Viewing: {}", item.label));
                Ok(true)
            }
            ItemAction::Notify(message) => {
                env.notifier.info(message.clone());
                Ok(true)
            }
            ItemAction::Press(role) => env.host.press(item.element, role),
            ItemAction::OpenFile => {
                let Some(path) = &item.link else {
                    return Ok(false);
                };
                let open = Capability::Files(FileCommand::Open(path.clone()));
                invoke_capability(&open, &mut *env.host, &mut *env.notifier)?;
                Ok(true)
            }
            ItemAction::Invoke(capability) => {
                invoke_capability(capability, &mut *env.host, &mut *env.notifier)?;
                Ok(true)
            }
            ItemAction::FirstOf(actions) => {
                for action in actions {
                    if self.try_item_action(action, item, env)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    fn run_toolbar(&mut self, action: ToolbarAction, env: &mut FocusEnv<'_>) {
        let Some(tab) = self.current_tab().map(|t| t.id.clone()) else {
            return;
        };
        match action {
            ToolbarAction::Button(role) => {
                self.press_button(&tab, &role, env);
            }
            ToolbarAction::ButtonOr(role, capability) => {
                if !self.press_button(&tab, &role, env) {
                    self.invoke(&capability, env);
                }
            }
            ToolbarAction::Invoke(capability) => self.invoke(&capability, env),
            ToolbarAction::Help => {
                let sheet = self.help_sheet();
                env.host.show_help(sheet);
            }
        }
    }

    fn press_button(&self, tab: &str, role: &str, env: &mut FocusEnv<'_>) -> bool {
        match env.host.press_tab_button(tab, role) {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(error = %err, tab, role, "toolbar action failed");
                env.notifier.error(format!("Action failed: {err}"));
                false
            }
        }
    }

    fn invoke(&self, capability: &Capability, env: &mut FocusEnv<'_>) {
        if let Err(err) = invoke_capability(capability, &mut *env.host, &mut *env.notifier) {
            tracing::warn!(error = %err, %capability, "capability failed");
            env.notifier.error(format!("Action failed: {err}"));
        }
    }

    /// Help for the current tab when it has its own, else the page's.
    pub fn help_sheet(&self) -> HelpSheet {
        let section = self
            .current_tab()
            .and_then(|t| t.help.clone())
            .unwrap_or_else(|| self.profile.help.clone());
        let title = section.title.clone();
        HelpSheet::single(&title, vec![section])
    }
}

/// Save button role for a settings section title.
fn save_role(title: &str) -> Option<&'static str> {
    const TEMPLATE_SECTIONS: [&str; 5] = [
        "Template",
        "Article title",
        "Switch notice",
        "External links",
        "Sponsor",
    ];
    if title.contains("Appearance") {
        Some("save-appearance")
    } else if title.contains("Music") {
        Some("save-music")
    } else if TEMPLATE_SECTIONS.iter().any(|s| title.contains(s)) {
        Some("save-template")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_role_by_title() {
        assert_eq!(save_role("Appearance settings"), Some("save-appearance"));
        assert_eq!(save_role("Music settings"), Some("save-music"));
        assert_eq!(save_role("Sponsor settings"), Some("save-template"));
        assert_eq!(save_role("Danger zone"), None);
    }

    #[test]
    fn test_options_default() {
        let options = ControllerOptions::default();
        assert_eq!(options.page_jump, 10);
        assert_eq!(options.input_settle, Duration::from_millis(100));
    }
}
