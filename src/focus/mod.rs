pub mod controller;
pub mod item;
pub mod pages;
pub mod profile;
pub mod session;

pub use controller::{ControllerOptions, Deferred, FocusEnv, FocusModeController};
pub use item::{ElementRef, NavigableItem, ScrollBlock};
pub use pages::PageKind;
pub use profile::FocusProfile;
pub use session::{FocusSession, Mode};
