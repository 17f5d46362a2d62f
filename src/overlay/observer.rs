use crate::focus::item::ElementRef;
use crate::host::Host;
use crate::keyboard::{ActiveElement, DocumentState, Key, KeyPress};
use crate::overlay::trap::{FocusTrap, FocusableCandidate};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverlayButton {
    pub element: ElementRef,
    pub visible: bool,
    pub enabled: bool,
}

impl OverlayButton {
    pub fn new(element: ElementRef) -> Self {
        Self {
            element,
            visible: true,
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    fn usable(&self) -> bool {
        self.visible && self.enabled
    }
}

/// The action buttons an overlay exposes to the keyboard.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OverlayButtons {
    pub primary: Option<OverlayButton>,
    pub submit: Option<OverlayButton>,
    /// Dedicated confirm button of a delete dialog.
    pub confirm: Option<OverlayButton>,
    pub cancel: Option<OverlayButton>,
}

/// Overlay lifecycle, reported by the host instead of inferred from DOM
/// mutation.
#[derive(Clone, Debug, PartialEq)]
pub enum OverlayEvent {
    Opened {
        id: String,
        candidates: Vec<FocusableCandidate>,
        buttons: OverlayButtons,
    },
    Closed {
        id: String,
    },
}

/// What an event changed, for the layers below the overlay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OverlayChange {
    Opened(String),
    Closed(String),
}

#[derive(Debug)]
struct ActiveOverlay {
    trap: FocusTrap,
    buttons: OverlayButtons,
}

/// Highest-precedence layer: owns the focus trap of the open overlay and
/// maps a small key set onto its buttons.
#[derive(Debug, Default)]
pub struct ModalObserver {
    active: Option<ActiveOverlay>,
}

impl ModalObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.trap.overlay())
    }

    pub fn trap(&self) -> Option<&FocusTrap> {
        self.active.as_ref().map(|a| &a.trap)
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// Applies one lifecycle event. Opening computes the trap boundary and
    /// focuses the first text input; closing an overlay that does not hold
    /// the trap changes nothing. An overlay opened on top of another one
    /// takes the trap, and the one it displaced is reported closed first.
    pub fn observe(&mut self, event: OverlayEvent, host: &mut dyn Host) -> Vec<OverlayChange> {
        match event {
            OverlayEvent::Opened {
                id,
                candidates,
                buttons,
            } => {
                let mut changes = Vec::with_capacity(2);
                if let Some(previous) = self.active.take() {
                    let previous = previous.trap.overlay().to_string();
                    tracing::debug!(%previous, next = %id, "overlay replaced while open");
                    changes.push(OverlayChange::Closed(previous));
                }
                let trap = FocusTrap::attach(&id, &candidates);
                tracing::info!(overlay = %id, focusable = trap.len(), "overlay opened");
                if let Some(input) = trap.first_input() {
                    host.focus(input);
                }
                self.active = Some(ActiveOverlay { trap, buttons });
                changes.push(OverlayChange::Opened(id));
                changes
            }
            OverlayEvent::Closed { id } => {
                if self.active() != Some(id.as_str()) {
                    return Vec::new();
                }
                self.active = None;
                tracing::info!(overlay = %id, "overlay closed");
                vec![OverlayChange::Closed(id)]
            }
        }
    }

    /// Returns whether the open overlay consumed the key. Keys outside the
    /// overlay set, including arrows meant for a focused select, fall
    /// through to the layers below.
    pub fn handle(&mut self, press: &KeyPress, doc: &DocumentState, host: &mut dyn Host) -> bool {
        let Some(active) = &self.active else {
            return false;
        };
        let buttons = &active.buttons;
        match &press.key {
            Key::Escape => {
                host.close_overlay(active.trap.overlay());
                true
            }
            Key::Enter => {
                if doc.active == ActiveElement::TextArea && press.shift {
                    return false;
                }
                let target = if doc.active.captures_typing() {
                    buttons.submit.or(buttons.primary)
                } else {
                    buttons.primary
                };
                click(host, target)
            }
            Key::Char('s') => click(host, buttons.submit.or(buttons.primary)),
            Key::Char('y') => {
                let target = buttons.confirm.or(buttons.submit).or(buttons.primary);
                match target {
                    Some(button) if button.usable() => click(host, Some(button)),
                    _ => false,
                }
            }
            Key::Char('c') => {
                if !click(host, buttons.cancel) {
                    host.close_overlay(active.trap.overlay());
                }
                true
            }
            Key::Tab => {
                if let Some(next) = active.trap.next(host.focused(), press.shift) {
                    host.focus(next);
                }
                true
            }
            Key::Char(' ') if doc.active.is_toggle() => {
                if let Some(el) = host.focused() {
                    click(host, Some(OverlayButton::new(el)));
                }
                true
            }
            _ => false,
        }
    }
}

fn click(host: &mut dyn Host, button: Option<OverlayButton>) -> bool {
    let Some(button) = button else {
        return false;
    };
    match host.click(button.element) {
        Ok(found) => found,
        Err(err) => {
            tracing::warn!(error = %err, "overlay button failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::Site;

    fn opened(id: &str) -> OverlayEvent {
        OverlayEvent::Opened {
            id: id.to_string(),
            candidates: vec![FocusableCandidate::visible(ElementRef(1))],
            buttons: OverlayButtons::default(),
        }
    }

    #[test]
    fn test_second_open_closes_the_first() {
        let mut site = Site::new("/");
        let mut observer = ModalObserver::new();
        assert_eq!(
            observer.observe(opened("rename"), &mut site),
            vec![OverlayChange::Opened("rename".into())]
        );
        assert_eq!(
            observer.observe(opened("delete"), &mut site),
            vec![
                OverlayChange::Closed("rename".into()),
                OverlayChange::Opened("delete".into()),
            ]
        );
        assert_eq!(observer.active(), Some("delete"));

        // The displaced overlay closing later is already accounted for.
        let stale = OverlayEvent::Closed { id: "rename".into() };
        assert!(observer.observe(stale, &mut site).is_empty());
        assert_eq!(observer.active(), Some("delete"));
    }

    #[test]
    fn test_close_of_unknown_overlay_is_ignored() {
        let mut site = Site::new("/");
        let mut observer = ModalObserver::new();
        let closed = OverlayEvent::Closed { id: "login".into() };
        assert!(observer.observe(closed, &mut site).is_empty());
        assert!(!observer.is_open());
    }
}
