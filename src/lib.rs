//! Keyboard focus-mode navigation and shortcut dispatch.
//!
//! The core decides, for every key press, which of four layers handles it:
//! the [`keyboard::InputGate`], an open overlay ([`overlay::ModalObserver`]),
//! the page's [`focus::FocusModeController`], and finally the site-wide
//! [`shortcuts::ShortcutDispatcher`]. [`KeyboardContext`] owns all four and
//! drives a [`host::Host`] that stands in for the page.

pub mod config;
pub mod context;
pub mod error;
pub mod focus;
pub mod host;
pub mod keyboard;
pub mod logging;
pub mod notify;
pub mod overlay;
pub mod prefs;
pub mod shortcuts;
pub mod site;
pub mod store;
pub mod timers;

pub use context::{ContextOptions, Handled, KeyboardContext};
pub use error::{CapabilityError, KeyParseError};
pub use focus::PageKind;
