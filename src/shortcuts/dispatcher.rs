use crate::error::CapabilityError;
use crate::host::{Host, MusicPlayer};
use crate::keyboard::KeyPress;
use crate::notify::Notifier;
use crate::shortcuts::action::{ActionKind, Capability, FileCommand, Guard, MusicCommand};
use crate::shortcuts::help::{HelpSection, HelpSheet};
use crate::shortcuts::registry::KeyRegistry;

const VOLUME_STEP: f32 = 10.0;

/// Everything a dispatched action may touch.
pub struct DispatchEnv<'a> {
    pub host: &'a mut dyn Host,
    pub notifier: &'a mut Notifier,
    /// Focus-mode help for the current page, shown in the help sheet.
    pub page_help: Option<HelpSection>,
}

/// Lowest-precedence layer: site-wide shortcuts such as "go home".
pub struct ShortcutDispatcher {
    registry: KeyRegistry,
    enabled: bool,
}

impl ShortcutDispatcher {
    pub fn new(registry: KeyRegistry) -> Self {
        Self {
            registry,
            enabled: true,
        }
    }

    pub fn registry(&self) -> &KeyRegistry {
        &self.registry
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns whether the key was consumed. A denied guarded binding still
    /// counts as consumed so the key does nothing else.
    pub fn dispatch(&self, press: &KeyPress, env: &mut DispatchEnv<'_>) -> bool {
        if !self.enabled {
            return false;
        }
        let Some(binding) = self.registry.resolve(press) else {
            return false;
        };

        if let Some(guard) = binding.guard
            && !guard_allows(guard, &*env.host)
        {
            tracing::info!(key = %binding.key, "guarded shortcut denied");
            env.notifier
                .warning("This shortcut is only available to administrators");
            return true;
        }

        tracing::debug!(key = %binding.key, label = %binding.label, "dispatch");
        self.run(&binding.action, &binding.label, env);
        true
    }

    /// Runs one action, turning collaborator failures into error toasts.
    /// Returns whether every step succeeded.
    pub fn run(&self, action: &ActionKind, label: &str, env: &mut DispatchEnv<'_>) -> bool {
        match self.execute(action, label, env) {
            Ok(ok) => ok,
            Err(err) => {
                tracing::warn!(error = %err, label, "shortcut action failed");
                env.notifier.error(format!("Action failed: {err}"));
                false
            }
        }
    }

    fn execute(
        &self,
        action: &ActionKind,
        label: &str,
        env: &mut DispatchEnv<'_>,
    ) -> Result<bool, CapabilityError> {
        match action {
            ActionKind::Navigate(url) => {
                if env.host.current_path() != *url {
                    env.host.navigate(url)?;
                }
            }
            ActionKind::ToggleOverlay(id) => match env.host.toggle_overlay(id) {
                Some(true) => {
                    env.notifier.success(format!("Opened: {label}"));
                }
                Some(false) => {
                    env.notifier.info(format!("Closed: {label}"));
                }
                None => tracing::debug!(id, "overlay not present"),
            },
            ActionKind::CloseAllOverlays => {
                env.host.close_all_overlays();
                env.notifier.success("Closed all dialogs");
            }
            ActionKind::ShowHelp => {
                let sheet = HelpSheet::for_site(
                    &self.registry,
                    env.host.is_admin(),
                    env.page_help.clone(),
                );
                env.host.show_help(sheet);
                env.notifier.success("Keyboard shortcuts");
            }
            ActionKind::InvokeCapability(capability) => {
                invoke_capability(capability, &mut *env.host, &mut *env.notifier)?;
            }
            ActionKind::Compound(steps) => {
                let mut ok = true;
                for step in steps {
                    ok &= self.run(step, label, env);
                }
                return Ok(ok);
            }
        }
        Ok(true)
    }
}

/// Runs a collaborator capability. A missing or disabled music player is a
/// warning toast; a missing file manager is an error for the caller.
pub fn invoke_capability(
    capability: &Capability,
    host: &mut dyn Host,
    notifier: &mut Notifier,
) -> Result<(), CapabilityError> {
    match capability {
        Capability::Music(cmd) => match host.music() {
            Some(player) if player.is_enabled() => {
                let message = run_music(player, *cmd)?;
                notifier.success(message);
            }
            _ => {
                notifier.warning("Music player is not enabled");
            }
        },
        Capability::Files(cmd) => {
            let files = host
                .files()
                .ok_or_else(|| CapabilityError::Unavailable("file manager".into()))?;
            match cmd {
                FileCommand::Open(path) => files.open_file(path)?,
                FileCommand::Back => files.go_back()?,
                FileCommand::Rename => files.open_rename_modal()?,
                FileCommand::Delete => files.open_delete_modal()?,
                FileCommand::Reload => files.load_files()?,
            }
        }
    }
    Ok(())
}

fn guard_allows(guard: Guard, host: &dyn Host) -> bool {
    match guard {
        Guard::AdminOnly => host.is_admin(),
    }
}

fn run_music(player: &mut dyn MusicPlayer, cmd: MusicCommand) -> Result<String, CapabilityError> {
    let message = match cmd {
        MusicCommand::TogglePlay => {
            if player.toggle_play()? {
                "Playing".to_string()
            } else {
                "Paused".to_string()
            }
        }
        MusicCommand::Previous => {
            player.play_previous()?;
            "Previous track".to_string()
        }
        MusicCommand::Next => {
            player.play_next()?;
            "Next track".to_string()
        }
        MusicCommand::VolumeUp | MusicCommand::VolumeDown => {
            let step = if cmd == MusicCommand::VolumeUp {
                VOLUME_STEP
            } else {
                -VOLUME_STEP
            };
            let volume = (player.volume() * 100.0 + step).clamp(0.0, 100.0);
            player.set_volume(volume / 100.0)?;
            format!("Volume: {}%", volume.round() as u32)
        }
        MusicCommand::Mute => {
            if player.toggle_mute()? {
                "Muted".to_string()
            } else {
                "Unmuted".to_string()
            }
        }
        MusicCommand::Playlist => {
            player.toggle_playlist()?;
            "Playlist".to_string()
        }
    };
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::Key;
    use crate::shortcuts::action::{BindingGroup, KeyBinding};
    use crate::site::Site;

    fn dispatcher_with(binding: KeyBinding) -> ShortcutDispatcher {
        let mut registry = KeyRegistry::new();
        registry.register(binding);
        ShortcutDispatcher::new(registry)
    }

    #[test]
    fn test_compound_keeps_going_after_failure() {
        let dispatcher = dispatcher_with(KeyBinding::new(
            Key::Char('g'),
            ActionKind::Compound(vec![
                ActionKind::Navigate("/collect".into()),
                ActionKind::ShowHelp,
            ]),
            "Archive with help",
            BindingGroup::Function,
        ));
        let mut site = Site::new("/");
        site.navigation_failure = Some("offline".to_string());
        let mut notifier = Notifier::default();
        let mut env = DispatchEnv {
            host: &mut site,
            notifier: &mut notifier,
            page_help: None,
        };

        assert!(dispatcher.dispatch(&KeyPress::ch('g'), &mut env));
        assert_eq!(
            notifier.messages(),
            vec!["Action failed: offline", "Keyboard shortcuts"]
        );
        assert!(site.is_open("help"));
        assert_eq!(site.current_path(), "/");
    }

    #[test]
    fn test_compound_reports_overall_result() {
        let dispatcher = ShortcutDispatcher::new(KeyRegistry::new());
        let mut site = Site::new("/");
        let mut notifier = Notifier::default();
        let mut env = DispatchEnv {
            host: &mut site,
            notifier: &mut notifier,
            page_help: None,
        };

        let steps = ActionKind::Compound(vec![
            ActionKind::Navigate("/about".into()),
            ActionKind::CloseAllOverlays,
        ]);
        assert!(dispatcher.run(&steps, "About", &mut env));

        // No file manager on this page.
        let failing = ActionKind::Compound(vec![
            ActionKind::InvokeCapability(Capability::Files(FileCommand::Reload)),
            ActionKind::Navigate("/".into()),
        ]);
        assert!(!dispatcher.run(&failing, "Reload", &mut env));
        assert_eq!(site.navigations(), vec!["/about", "/"]);
    }

    #[test]
    fn test_guard_denial_consumes_without_running() {
        let dispatcher = dispatcher_with(
            KeyBinding::new(
                Key::Char('a'),
                ActionKind::Navigate("/admin".into()),
                "Admin settings",
                BindingGroup::Admin,
            )
            .admin_only(),
        );
        let mut site = Site::new("/");
        let mut notifier = Notifier::default();
        let mut env = DispatchEnv {
            host: &mut site,
            notifier: &mut notifier,
            page_help: None,
        };

        assert!(dispatcher.dispatch(&KeyPress::ch('a'), &mut env));
        assert_eq!(
            notifier.messages(),
            vec!["This shortcut is only available to administrators"]
        );
        assert!(site.navigations().is_empty());
    }

    #[test]
    fn test_disabled_dispatcher_ignores_keys() {
        let mut dispatcher = ShortcutDispatcher::new(KeyRegistry::site_defaults());
        dispatcher.disable();
        let mut site = Site::new("/about");
        let mut notifier = Notifier::default();
        let mut env = DispatchEnv {
            host: &mut site,
            notifier: &mut notifier,
            page_help: None,
        };
        assert!(!dispatcher.dispatch(&KeyPress::ch('1'), &mut env));
        assert!(site.navigations().is_empty());
    }
}
