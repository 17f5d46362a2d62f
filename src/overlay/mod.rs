pub mod observer;
pub mod trap;

pub use observer::{ModalObserver, OverlayButton, OverlayButtons, OverlayChange, OverlayEvent};
pub use trap::{FocusTrap, FocusableCandidate};
