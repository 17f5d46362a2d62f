use crate::keyboard::key::{Key, KeyPress, SPACE, legacy_key};
use crate::shortcuts::action::{ActionKind, BindingGroup, Capability, KeyBinding, MusicCommand};

/// Key → binding table for the site-wide dispatcher.
#[derive(Clone, Debug)]
pub struct KeyRegistry {
    bindings: Vec<KeyBinding>,
    legacy_codes: bool,
}

impl Default for KeyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyRegistry {
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
            legacy_codes: true,
        }
    }

    /// The bindings every page of the site shares.
    pub fn site_defaults() -> Self {
        use ActionKind::*;
        use BindingGroup::*;

        let music = |cmd| InvokeCapability(Capability::Music(cmd));
        let mut registry = Self::new();
        let table = [
            KeyBinding::new(Key::Char('1'), Navigate("/".into()), "Home", Navigation),
            KeyBinding::new(Key::Char('2'), Navigate("/passage".into()), "Articles", Navigation),
            KeyBinding::new(Key::Char('3'), Navigate("/collect".into()), "Archive", Navigation),
            KeyBinding::new(Key::Char('4'), Navigate("/about".into()), "About", Navigation),
            KeyBinding::new(
                Key::Char('5'),
                ToggleOverlay("userCenterModal".into()),
                "User center",
                Function,
            ),
            KeyBinding::new(
                Key::Char('6'),
                Navigate("/markdown-editor".into()),
                "Editor",
                Navigation,
            ),
            KeyBinding::new(Key::Char('f'), Navigate("/friends".into()), "Friends", Function),
            KeyBinding::new(Key::Char('l'), ToggleOverlay("loginModal".into()), "Login", Function),
            KeyBinding::new(Key::Char('/'), ShowHelp, "Keyboard shortcuts", Function),
            KeyBinding::new(Key::Escape, CloseAllOverlays, "Close dialogs", Function),
            KeyBinding::new(SPACE, music(MusicCommand::TogglePlay), "Play / pause", Music),
            KeyBinding::new(Key::Left, music(MusicCommand::Previous), "Previous track", Music),
            KeyBinding::new(Key::Right, music(MusicCommand::Next), "Next track", Music),
            KeyBinding::new(Key::Up, music(MusicCommand::VolumeUp), "Volume up", Music),
            KeyBinding::new(Key::Down, music(MusicCommand::VolumeDown), "Volume down", Music),
            KeyBinding::new(Key::Char('m'), music(MusicCommand::Mute), "Mute", Music),
            KeyBinding::new(Key::Char('p'), music(MusicCommand::Playlist), "Playlist", Music),
            KeyBinding::new(Key::Char('a'), Navigate("/admin".into()), "Admin settings", Admin)
                .admin_only(),
        ];
        for binding in table {
            registry.register(binding);
        }
        registry
    }

    /// Adds a binding. The first binding registered for a key wins; later
    /// ones for the same key are refused.
    pub fn register(&mut self, binding: KeyBinding) -> bool {
        if self.get(&binding.key).is_some() {
            tracing::warn!(key = %binding.key, "duplicate key binding ignored");
            return false;
        }
        self.bindings.push(binding);
        true
    }

    pub fn set_legacy_codes(&mut self, enabled: bool) {
        self.legacy_codes = enabled;
    }

    pub fn get(&self, key: &Key) -> Option<&KeyBinding> {
        self.bindings.iter().find(|b| &b.key == key)
    }

    /// Exact key match first, then the legacy numeric-code table.
    pub fn resolve(&self, press: &KeyPress) -> Option<&KeyBinding> {
        if let Some(binding) = self.get(&press.key) {
            return Some(binding);
        }
        if !self.legacy_codes {
            return None;
        }
        let mapped = press.code.and_then(legacy_key)?;
        self.get(&mapped)
    }

    pub fn bindings(&self) -> &[KeyBinding] {
        &self.bindings
    }

    pub fn in_group(&self, group: BindingGroup) -> impl Iterator<Item = &KeyBinding> {
        self.bindings.iter().filter(move |b| b.group == group)
    }

    /// The binding that navigates to `url`, used to hint nav links.
    pub fn key_for_url(&self, url: &str) -> Option<&Key> {
        self.bindings
            .iter()
            .find(|b| matches!(&b.action, ActionKind::Navigate(u) if u == url))
            .map(|b| &b.key)
    }
}
