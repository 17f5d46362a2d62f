pub mod gate;
pub mod key;

pub use gate::{ActiveElement, DocumentState, InputGate};
pub use key::{Key, KeyPress};
