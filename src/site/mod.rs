//! An in-memory page that implements [`Host`].
//!
//! The terminal demo renders it and the integration tests drive it. Every
//! side effect the keyboard core causes is appended to [`Site::history`] so
//! callers can assert on exactly what happened.

mod collaborators;
pub mod demo;

use std::collections::{BTreeMap, BTreeSet, HashMap};

pub use collaborators::{FileBrowser, Player};

use crate::error::CapabilityError;
use crate::focus::item::{ElementRef, NavigableItem, ScrollBlock};
use crate::host::{CollectScope, FileManager, Host, MusicPlayer};
use crate::keyboard::{ActiveElement, DocumentState, Key};
use crate::overlay::{FocusableCandidate, OverlayButtons, OverlayEvent};
use crate::shortcuts::help::HelpSheet;

/// One navigable element of the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub page: String,
    pub level: String,
    pub kind: String,
    pub label: String,
    pub group: Option<String>,
    pub link: Option<String>,
    pub tab: Option<String>,
    /// Item whose children list this node belongs to.
    pub parent: Option<ElementRef>,
    /// Folder the node is nested in; hidden while that folder is collapsed.
    pub folder: Option<ElementRef>,
    /// Roles of the buttons inside the node (`"edit"`, `"delete"`, ...).
    pub buttons: Vec<String>,
    pub expanded: bool,
}

impl Node {
    pub fn new(page: &str, level: &str, kind: &str, label: &str) -> Self {
        Self {
            page: page.to_string(),
            level: level.to_string(),
            kind: kind.to_string(),
            label: label.to_string(),
            group: None,
            link: None,
            tab: None,
            parent: None,
            folder: None,
            buttons: Vec::new(),
            expanded: false,
        }
    }

    pub fn link(mut self, link: &str) -> Self {
        self.link = Some(link.to_string());
        self
    }

    pub fn group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }

    pub fn tab(mut self, tab: &str) -> Self {
        self.tab = Some(tab.to_string());
        self
    }

    pub fn child_of(mut self, parent: ElementRef) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn in_folder(mut self, folder: ElementRef) -> Self {
        self.folder = Some(folder);
        self
    }

    pub fn buttons(mut self, roles: &[&str]) -> Self {
        self.buttons = roles.iter().map(|r| r.to_string()).collect();
        self
    }

    pub fn expanded(mut self) -> Self {
        self.expanded = true;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SiteOverlay {
    pub title: String,
    pub candidates: Vec<FocusableCandidate>,
    pub buttons: OverlayButtons,
    pub open: bool,
}

/// Side effects recorded in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SiteEvent {
    Navigated(String),
    Clicked(ElementRef),
    Pressed(ElementRef, String),
    ToolbarPressed(String, String),
    Expanded(ElementRef, bool),
    Scrolled(i32),
    ScrolledTo(ElementRef, ScrollBlock),
    Focused(ElementRef),
    Blurred,
    OverlayOpened(String),
    OverlayClosed(String),
    TabActivated(String),
    SectionShown(String),
    HelpShown(String),
}

#[derive(Debug, Default)]
pub struct Site {
    path: String,
    admin: bool,
    next_element: u64,
    nodes: BTreeMap<ElementRef, Node>,
    order: Vec<ElementRef>,
    overlays: BTreeMap<String, SiteOverlay>,
    /// Role pressed inside a row → overlay it opens.
    opens_on_press: HashMap<String, String>,
    element_kinds: HashMap<ElementRef, ActiveElement>,
    markers: BTreeSet<String>,
    selected: BTreeMap<String, ElementRef>,
    marked_rows: BTreeSet<ElementRef>,
    focused: Option<ElementRef>,
    tabs: Vec<String>,
    active_tab: Option<String>,
    tab_buttons: BTreeSet<(String, String)>,
    sections: Vec<(String, Option<ElementRef>)>,
    visible_section: Option<usize>,
    form_controls: Vec<ElementRef>,
    scroll: i32,
    help: Option<HelpSheet>,
    outbox: Vec<OverlayEvent>,
    history: Vec<SiteEvent>,
    pub player: Option<Player>,
    pub files: Option<FileBrowser>,
    pub blocking_viewer: bool,
    /// Navigation fails with this message when set.
    pub navigation_failure: Option<String>,
}

impl Site {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            next_element: 1,
            ..Self::default()
        }
    }

    pub fn set_admin(&mut self, admin: bool) {
        self.admin = admin;
    }

    pub fn set_path(&mut self, path: &str) {
        self.path = path.to_string();
    }

    fn allocate(&mut self) -> ElementRef {
        let element = ElementRef(self.next_element);
        self.next_element += 1;
        element
    }

    /// Adds a node in document order.
    pub fn add(&mut self, node: Node) -> ElementRef {
        let element = self.allocate();
        self.nodes.insert(element, node);
        self.order.push(element);
        element
    }

    pub fn node(&self, element: ElementRef) -> Option<&Node> {
        self.nodes.get(&element)
    }

    /// A form element that is not part of any list, such as a text field.
    pub fn add_control(&mut self, kind: ActiveElement) -> ElementRef {
        let element = self.allocate();
        self.element_kinds.insert(element, kind);
        element
    }

    pub fn add_overlay(
        &mut self,
        id: &str,
        title: &str,
        candidates: Vec<FocusableCandidate>,
        buttons: OverlayButtons,
    ) {
        self.overlays.insert(
            id.to_string(),
            SiteOverlay {
                title: title.to_string(),
                candidates,
                buttons,
                open: false,
            },
        );
    }

    /// Pressing `role` inside any row opens `overlay`.
    pub fn open_on_press(&mut self, role: &str, overlay: &str) {
        self.opens_on_press
            .insert(role.to_string(), overlay.to_string());
    }

    pub fn add_tab(&mut self, id: &str, toolbar: &[&str]) {
        self.tabs.push(id.to_string());
        if self.active_tab.is_none() {
            self.active_tab = Some(id.to_string());
        }
        for role in toolbar {
            self.tab_buttons.insert((id.to_string(), role.to_string()));
        }
    }

    /// A settings section with an optional first input.
    pub fn add_section(&mut self, title: &str, first_input: Option<ElementRef>) {
        self.sections.push((title.to_string(), first_input));
        if let Some(input) = first_input {
            self.form_controls.push(input);
        }
        if self.visible_section.is_none() {
            self.visible_section = Some(0);
        }
    }

    pub fn add_form_control(&mut self, element: ElementRef) {
        self.form_controls.push(element);
    }

    pub fn open(&mut self, id: &str) -> bool {
        let Some(overlay) = self.overlays.get_mut(id) else {
            return false;
        };
        if overlay.open {
            return true;
        }
        overlay.open = true;
        self.outbox.push(OverlayEvent::Opened {
            id: id.to_string(),
            candidates: overlay.candidates.clone(),
            buttons: overlay.buttons.clone(),
        });
        self.history.push(SiteEvent::OverlayOpened(id.to_string()));
        true
    }

    pub fn close(&mut self, id: &str) -> bool {
        let Some(overlay) = self.overlays.get_mut(id) else {
            return false;
        };
        if !overlay.open {
            return false;
        }
        overlay.open = false;
        if let Some(focused) = self.focused
            && overlay.candidates.iter().any(|c| c.element == focused)
        {
            self.focused = None;
        }
        self.outbox.push(OverlayEvent::Closed { id: id.to_string() });
        self.history.push(SiteEvent::OverlayClosed(id.to_string()));
        true
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.overlays.get(id).is_some_and(|o| o.open)
    }

    pub fn open_overlays(&self) -> Vec<(&str, &SiteOverlay)> {
        self.overlays
            .iter()
            .filter(|(_, o)| o.open)
            .map(|(id, o)| (id.as_str(), o))
            .collect()
    }

    /// What the input gate needs to know about the page right now.
    pub fn document(&self) -> DocumentState {
        let active = self
            .focused
            .map(|el| {
                self.element_kinds
                    .get(&el)
                    .copied()
                    .unwrap_or(ActiveElement::Button)
            })
            .unwrap_or_default();
        let claimed = if self.player.as_ref().is_some_and(|p| p.playlist_open) {
            vec![Key::Up, Key::Down]
        } else {
            Vec::new()
        };
        DocumentState {
            active,
            blocking_viewer: self.blocking_viewer,
            claimed,
        }
    }

    pub fn has_marker(&self, marker: &str) -> bool {
        self.markers.contains(marker)
    }

    pub fn markers(&self) -> impl Iterator<Item = &str> {
        self.markers.iter().map(String::as_str)
    }

    pub fn selected(&self, class: &str) -> Option<ElementRef> {
        self.selected.get(class).copied()
    }

    pub fn marked_rows(&self) -> &BTreeSet<ElementRef> {
        &self.marked_rows
    }

    pub fn active_tab(&self) -> Option<&str> {
        self.active_tab.as_deref()
    }

    pub fn scroll_offset(&self) -> i32 {
        self.scroll
    }

    pub fn help(&self) -> Option<&HelpSheet> {
        self.help.as_ref()
    }

    pub fn history(&self) -> &[SiteEvent] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn navigations(&self) -> Vec<&str> {
        self.history
            .iter()
            .filter_map(|e| match e {
                SiteEvent::Navigated(url) => Some(url.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn visible_section_index(&self) -> Option<usize> {
        self.visible_section
    }

    /// Scrolls the settings form so section `index` (0-based) is centered.
    pub fn scroll_to_section(&mut self, index: usize) {
        if index < self.sections.len() {
            self.visible_section = Some(index);
        }
    }

    /// Nodes of one list in document order, skipping those inside
    /// collapsed folders.
    pub fn nodes_in(
        &self,
        page: &str,
        level: &str,
        parent: Option<ElementRef>,
        tab: Option<&str>,
    ) -> Vec<(ElementRef, &Node)> {
        self.order
            .iter()
            .filter_map(|el| self.nodes.get(el).map(|n| (*el, n)))
            .filter(|(_, n)| {
                n.page == page
                    && n.level == level
                    && n.parent == parent
                    && (n.tab.is_none() || n.tab.as_deref() == tab)
                    && self.visible(n)
            })
            .collect()
    }

    /// Depth of a node inside nested folders.
    pub fn depth(&self, element: ElementRef) -> usize {
        let mut depth = 0;
        let mut folder = self.nodes.get(&element).and_then(|n| n.folder);
        while let Some(id) = folder {
            depth += 1;
            folder = self.nodes.get(&id).and_then(|n| n.folder);
        }
        depth
    }

    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|(title, _)| title.as_str())
    }

    pub fn element_kind(&self, element: ElementRef) -> Option<ActiveElement> {
        self.element_kinds.get(&element).copied()
    }

    fn visible(&self, node: &Node) -> bool {
        let mut folder = node.folder;
        while let Some(id) = folder {
            match self.nodes.get(&id) {
                Some(parent) if parent.expanded => folder = parent.folder,
                _ => return false,
            }
        }
        true
    }

    fn overlay_owning(&self, element: ElementRef) -> Option<String> {
        self.overlays
            .iter()
            .filter(|(_, o)| o.open)
            .find(|(_, o)| {
                let b = &o.buttons;
                [b.primary, b.submit, b.confirm, b.cancel]
                    .iter()
                    .flatten()
                    .any(|btn| btn.element == element)
            })
            .map(|(id, _)| id.clone())
    }
}

impl Host for Site {
    fn current_path(&self) -> String {
        self.path.clone()
    }

    fn navigate(&mut self, url: &str) -> Result<(), CapabilityError> {
        if let Some(msg) = &self.navigation_failure {
            return Err(CapabilityError::failed(msg.clone()));
        }
        let same_page = top_segment(&self.path) == top_segment(url);
        self.path = url.to_string();
        self.history.push(SiteEvent::Navigated(url.to_string()));
        if same_page {
            return Ok(());
        }
        // A new page starts without markers, selections or dialogs.
        self.markers.clear();
        self.selected.clear();
        self.marked_rows.clear();
        self.focused = None;
        self.scroll = 0;
        self.close_all_overlays();
        Ok(())
    }

    fn is_admin(&self) -> bool {
        self.admin
    }

    fn toggle_overlay(&mut self, id: &str) -> Option<bool> {
        let open = self.overlays.get(id)?.open;
        if open {
            self.close(id);
        } else {
            self.open(id);
        }
        Some(!open)
    }

    fn close_all_overlays(&mut self) -> usize {
        let open: Vec<String> = self
            .overlays
            .iter()
            .filter(|(_, o)| o.open)
            .map(|(id, _)| id.clone())
            .collect();
        for id in &open {
            self.close(id);
        }
        open.len()
    }

    fn close_overlay(&mut self, id: &str) {
        self.close(id);
    }

    fn show_help(&mut self, sheet: HelpSheet) {
        self.history.push(SiteEvent::HelpShown(sheet.title.clone()));
        if !self.overlays.contains_key("help") {
            let close = self.allocate();
            self.add_overlay(
                "help",
                &sheet.title,
                vec![FocusableCandidate::visible(close)],
                OverlayButtons {
                    cancel: Some(crate::overlay::OverlayButton::new(close)),
                    ..OverlayButtons::default()
                },
            );
        }
        if let Some(overlay) = self.overlays.get_mut("help") {
            overlay.title = sheet.title.clone();
        }
        self.help = Some(sheet);
        self.open("help");
    }

    fn set_root_marker(&mut self, marker: &str, on: bool) {
        if on {
            self.markers.insert(marker.to_string());
        } else {
            self.markers.remove(marker);
        }
    }

    fn mark_selected(&mut self, class: &str, item: Option<&NavigableItem>) {
        match item {
            Some(item) => {
                self.selected.insert(class.to_string(), item.element);
            }
            None => {
                self.selected.remove(class);
            }
        }
    }

    fn mark_row(&mut self, element: ElementRef, on: bool) {
        if on {
            self.marked_rows.insert(element);
        } else {
            self.marked_rows.remove(&element);
        }
    }

    fn scroll_into_view(&mut self, item: &NavigableItem, block: ScrollBlock) {
        self.history.push(SiteEvent::ScrolledTo(item.element, block));
    }

    fn collect(&mut self, scope: CollectScope<'_>) -> Vec<NavigableItem> {
        self.nodes_in(scope.page, scope.level, scope.parent.map(|p| p.element), scope.tab)
            .into_iter()
            .map(|(el, n)| {
                let mut item = NavigableItem::new(el, &n.kind, &n.label);
                item.group = n.group.clone();
                item.link = n.link.clone();
                item
            })
            .collect()
    }

    fn click(&mut self, element: ElementRef) -> Result<bool, CapabilityError> {
        if let Some(overlay) = self.overlay_owning(element) {
            self.history.push(SiteEvent::Clicked(element));
            self.close(&overlay);
            return Ok(true);
        }
        if let Some(kind) = self.element_kinds.get(&element) {
            self.history.push(SiteEvent::Clicked(element));
            return Ok(*kind != ActiveElement::None);
        }
        let Some(node) = self.nodes.get(&element) else {
            return Ok(false);
        };
        let link = node.link.clone();
        self.history.push(SiteEvent::Clicked(element));
        if let Some(url) = link {
            self.navigate(&url)?;
        }
        Ok(true)
    }

    fn press(&mut self, element: ElementRef, role: &str) -> Result<bool, CapabilityError> {
        let Some(node) = self.nodes.get(&element) else {
            return Ok(false);
        };
        if !node.buttons.iter().any(|b| b == role) {
            return Ok(false);
        }
        self.history
            .push(SiteEvent::Pressed(element, role.to_string()));
        if let Some(overlay) = self.opens_on_press.get(role).cloned() {
            self.open(&overlay);
        }
        Ok(true)
    }

    fn toggle_expand(&mut self, element: ElementRef) {
        if let Some(node) = self.nodes.get_mut(&element) {
            node.expanded = !node.expanded;
            self.history
                .push(SiteEvent::Expanded(element, node.expanded));
        }
    }

    fn scroll_panel(&mut self, delta: i32) {
        self.scroll = (self.scroll + delta).max(0);
        self.history.push(SiteEvent::Scrolled(delta));
    }

    fn focus(&mut self, element: ElementRef) {
        self.focused = Some(element);
        self.history.push(SiteEvent::Focused(element));
    }

    fn focused(&self) -> Option<ElementRef> {
        self.focused
    }

    fn blur(&mut self) {
        self.focused = None;
        self.history.push(SiteEvent::Blurred);
    }

    fn take_overlay_events(&mut self) -> Vec<OverlayEvent> {
        std::mem::take(&mut self.outbox)
    }

    fn music(&mut self) -> Option<&mut dyn MusicPlayer> {
        self.player.as_mut().map(|p| p as &mut dyn MusicPlayer)
    }

    fn files(&mut self) -> Option<&mut dyn FileManager> {
        self.files.as_mut().map(|f| f as &mut dyn FileManager)
    }

    fn activate_tab(&mut self, tab: &str) -> bool {
        if !self.tabs.iter().any(|t| t == tab) {
            return false;
        }
        self.active_tab = Some(tab.to_string());
        self.history.push(SiteEvent::TabActivated(tab.to_string()));
        true
    }

    fn press_tab_button(&mut self, tab: &str, role: &str) -> Result<bool, CapabilityError> {
        if !self
            .tab_buttons
            .contains(&(tab.to_string(), role.to_string()))
        {
            return Ok(false);
        }
        self.history
            .push(SiteEvent::ToolbarPressed(tab.to_string(), role.to_string()));
        Ok(true)
    }

    fn jump_to_section(&mut self, index: usize) -> Option<String> {
        let (title, input) = self.sections.get(index.checked_sub(1)?)?.clone();
        self.visible_section = Some(index - 1);
        self.history.push(SiteEvent::SectionShown(title.clone()));
        if let Some(input) = input {
            self.focus(input);
        }
        Some(title)
    }

    fn visible_section(&self) -> Option<String> {
        self.visible_section
            .and_then(|i| self.sections.get(i))
            .map(|(title, _)| title.clone())
    }

    fn form_controls(&self) -> Vec<ElementRef> {
        self.form_controls.clone()
    }
}

/// `/passage/rust?x` → `passage`.
fn top_segment(path: &str) -> &str {
    path.trim_start_matches('/')
        .split(['/', '?'])
        .next()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_hides_collapsed_folders() {
        let mut site = Site::new("/passage");
        let folder = site.add(Node::new("article", "left", "folder", "Rust"));
        site.add(Node::new("article", "left", "file", "Ownership").in_folder(folder));
        site.add(Node::new("article", "left", "file", "README"));
        let scope = CollectScope {
            page: "article",
            level: "left",
            parent: None,
            tab: None,
        };
        let labels: Vec<String> = site.collect(scope).into_iter().map(|i| i.label).collect();
        assert_eq!(labels, vec!["Rust", "README"]);

        site.toggle_expand(folder);
        let labels: Vec<String> = site.collect(scope).into_iter().map(|i| i.label).collect();
        assert_eq!(labels, vec!["Rust", "Ownership", "README"]);
    }

    #[test]
    fn test_collect_filters_by_tab() {
        let mut site = Site::new("/admin");
        site.add(Node::new("admin", "rows", "row", "post").tab("articles"));
        site.add(Node::new("admin", "rows", "row", "alice").tab("users"));
        let items = site.collect(CollectScope {
            page: "admin",
            level: "rows",
            parent: None,
            tab: Some("users"),
        });
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label, "alice");
    }

    #[test]
    fn test_toggle_overlay_reports_events() {
        let mut site = Site::new("/");
        site.add_overlay("login", "Log in", Vec::new(), OverlayButtons::default());
        assert_eq!(site.toggle_overlay("login"), Some(true));
        assert_eq!(site.toggle_overlay("login"), Some(false));
        assert_eq!(site.toggle_overlay("missing"), None);
        let events = site.take_overlay_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[1], OverlayEvent::Closed { id } if id == "login"));
        assert!(site.take_overlay_events().is_empty());
    }

    #[test]
    fn test_press_requires_button() {
        let mut site = Site::new("/admin");
        let row = site.add(Node::new("admin", "rows", "row", "post").buttons(&["edit"]));
        assert_eq!(site.press(row, "edit"), Ok(true));
        assert_eq!(site.press(row, "delete"), Ok(false));
        assert_eq!(site.press(ElementRef(999), "edit"), Ok(false));
    }

    #[test]
    fn test_playlist_claims_vertical_arrows() {
        let mut site = Site::new("/");
        let mut player = Player::new(&["a"]);
        player.playlist_open = true;
        site.player = Some(player);
        assert_eq!(site.document().claimed, vec![Key::Up, Key::Down]);
    }
}
