use std::fmt;

use crate::keyboard::Key;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MusicCommand {
    TogglePlay,
    Previous,
    Next,
    VolumeUp,
    VolumeDown,
    Mute,
    Playlist,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileCommand {
    Open(String),
    Back,
    Rename,
    Delete,
    Reload,
}

/// Named operation exposed by an external collaborator module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Capability {
    Music(MusicCommand),
    Files(FileCommand),
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Music(cmd) => write!(f, "music.{cmd:?}"),
            Capability::Files(FileCommand::Open(path)) => write!(f, "files.Open({path})"),
            Capability::Files(cmd) => write!(f, "files.{cmd:?}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionKind {
    Navigate(String),
    ToggleOverlay(String),
    CloseAllOverlays,
    ShowHelp,
    InvokeCapability(Capability),
    /// Runs every step in order, even after a failing one.
    Compound(Vec<ActionKind>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Guard {
    AdminOnly,
}

/// Which help-sheet section a binding is listed under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BindingGroup {
    Navigation,
    Function,
    Music,
    Admin,
}

impl BindingGroup {
    pub fn title(self) -> &'static str {
        match self {
            BindingGroup::Navigation => "Navigation",
            BindingGroup::Function => "Functions",
            BindingGroup::Music => "Music player",
            BindingGroup::Admin => "Administrator",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyBinding {
    pub key: Key,
    pub action: ActionKind,
    pub label: String,
    pub guard: Option<Guard>,
    pub group: BindingGroup,
}

impl KeyBinding {
    pub fn new(key: Key, action: ActionKind, label: &str, group: BindingGroup) -> Self {
        Self {
            key,
            action,
            label: label.to_string(),
            guard: None,
            group,
        }
    }

    pub fn admin_only(mut self) -> Self {
        self.guard = Some(Guard::AdminOnly);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_names() {
        assert_eq!(
            Capability::Music(MusicCommand::TogglePlay).to_string(),
            "music.TogglePlay"
        );
        assert_eq!(
            Capability::Files(FileCommand::Open("/a.txt".into())).to_string(),
            "files.Open(/a.txt)"
        );
    }

    #[test]
    fn test_admin_only_sets_guard() {
        let binding = KeyBinding::new(
            Key::Char('a'),
            ActionKind::Navigate("/admin".into()),
            "Admin settings",
            BindingGroup::Admin,
        )
        .admin_only();
        assert_eq!(binding.guard, Some(Guard::AdminOnly));
    }
}
