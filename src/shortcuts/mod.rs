pub mod action;
pub mod dispatcher;
pub mod help;
pub mod registry;

pub use action::{ActionKind, BindingGroup, Capability, FileCommand, Guard, KeyBinding, MusicCommand};
pub use dispatcher::{DispatchEnv, ShortcutDispatcher};
pub use help::{HelpEntry, HelpSection, HelpSheet};
pub use registry::KeyRegistry;
