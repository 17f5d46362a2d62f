use std::collections::{BTreeSet, HashMap};

use crate::focus::item::{ElementRef, NavigableItem};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Inactive,
    Active,
}

/// Per-controller focus state: the level stack and a cursor per level.
///
/// A paused session is `Inactive` but keeps its levels and cursors so the
/// enter key resumes where the user left off.
#[derive(Clone, Debug, Default)]
pub struct FocusSession {
    mode: Mode,
    paused: bool,
    levels: Vec<String>,
    /// `parents[i]` is the item whose children populate `levels[i + 1]`.
    parents: Vec<NavigableItem>,
    cursors: HashMap<String, usize>,
    marked: BTreeSet<ElementRef>,
    active_overlay: Option<String>,
}

impl FocusSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.mode == Mode::Active
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Fresh start at `root` with every cursor at 0.
    pub fn activate(&mut self, root: &str) {
        self.mode = Mode::Active;
        self.paused = false;
        self.levels = vec![root.to_string()];
        self.parents.clear();
        self.cursors.clear();
        self.marked.clear();
    }

    pub fn pause(&mut self) {
        self.mode = Mode::Inactive;
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.mode = Mode::Active;
        self.paused = false;
    }

    pub fn deactivate(&mut self) {
        self.mode = Mode::Inactive;
        self.paused = false;
        self.levels.clear();
        self.parents.clear();
        self.cursors.clear();
        self.marked.clear();
    }

    pub fn level(&self) -> Option<&str> {
        self.levels.last().map(String::as_str)
    }

    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Parent item of the current level, if it is a sub-level.
    pub fn parent(&self) -> Option<&NavigableItem> {
        if self.levels.len() > 1 {
            self.parents.get(self.levels.len() - 2)
        } else {
            None
        }
    }

    /// Enters a child level; its cursor starts at 0.
    pub fn push_level(&mut self, name: &str, parent: Option<NavigableItem>) {
        self.cursors.insert(name.to_string(), 0);
        self.levels.push(name.to_string());
        if let Some(parent) = parent {
            self.parents.push(parent);
        }
    }

    /// Leaves the current level, forgetting its cursor. The root level is
    /// never popped.
    pub fn pop_level(&mut self) -> Option<String> {
        if self.levels.len() <= 1 {
            return None;
        }
        let name = self.levels.pop()?;
        if self.parents.len() >= self.levels.len() {
            self.parents.pop();
        }
        self.cursors.remove(&name);
        Some(name)
    }

    /// Swaps the root level for a sibling panel; its cursor starts at 0.
    pub fn replace_root(&mut self, name: &str) {
        self.levels.clear();
        self.parents.clear();
        self.levels.push(name.to_string());
        self.cursors.insert(name.to_string(), 0);
    }

    pub fn cursor(&self) -> usize {
        self.level()
            .and_then(|l| self.cursors.get(l))
            .copied()
            .unwrap_or(0)
    }

    pub fn cursor_at(&self, level: &str) -> usize {
        self.cursors.get(level).copied().unwrap_or(0)
    }

    pub fn set_cursor(&mut self, index: usize) {
        if let Some(level) = self.levels.last() {
            self.cursors.insert(level.clone(), index);
        }
    }

    pub fn toggle_mark(&mut self, element: ElementRef) -> bool {
        if self.marked.remove(&element) {
            false
        } else {
            self.marked.insert(element);
            true
        }
    }

    pub fn marked(&self) -> &BTreeSet<ElementRef> {
        &self.marked
    }

    pub fn clear_marks(&mut self) {
        self.marked.clear();
    }

    pub fn active_overlay(&self) -> Option<&str> {
        self.active_overlay.as_deref()
    }

    pub fn set_active_overlay(&mut self, id: Option<String>) {
        self.active_overlay = id;
    }
}
