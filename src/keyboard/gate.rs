use crate::keyboard::key::{Key, KeyPress};

/// Kind of element that currently holds keyboard focus on the page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ActiveElement {
    #[default]
    None,
    TextInput,
    TextArea,
    ContentEditable,
    Select,
    Checkbox,
    Radio,
    Button,
}

impl ActiveElement {
    /// Controls that consume printable keys and arrows for themselves.
    pub fn captures_typing(self) -> bool {
        matches!(
            self,
            ActiveElement::TextInput
                | ActiveElement::TextArea
                | ActiveElement::ContentEditable
                | ActiveElement::Select
        )
    }

    pub fn is_toggle(self) -> bool {
        matches!(self, ActiveElement::Checkbox | ActiveElement::Radio)
    }
}

/// Snapshot of the page state the gate needs for one key event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentState {
    pub active: ActiveElement,
    /// An image or code viewer is shown and owns the keyboard.
    pub blocking_viewer: bool,
    /// Keys claimed by a sibling widget, e.g. an open playlist taking ↑/↓.
    pub claimed: Vec<Key>,
}

impl DocumentState {
    pub fn focused(active: ActiveElement) -> Self {
        Self {
            active,
            ..Self::default()
        }
    }
}

/// Decides whether a key event reaches any dispatch layer at all.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputGate {
    exempt: Vec<Key>,
}

impl Default for InputGate {
    fn default() -> Self {
        Self {
            exempt: vec![Key::Escape],
        }
    }
}

impl InputGate {
    /// Gate that lets `extra` through text-entry focus in addition to Escape.
    pub fn with_exempt<I: IntoIterator<Item = Key>>(extra: I) -> Self {
        let mut gate = Self::default();
        for key in extra {
            if !gate.exempt.contains(&key) {
                gate.exempt.push(key);
            }
        }
        gate
    }

    pub fn is_exempt(&self, key: &Key) -> bool {
        self.exempt.contains(key)
    }

    pub fn should_process(&self, press: &KeyPress, doc: &DocumentState) -> bool {
        if doc.blocking_viewer {
            return false;
        }
        if doc.active.captures_typing() && !self.is_exempt(&press.key) {
            return false;
        }
        !doc.claimed.contains(&press.key)
    }
}
