//! Event system: emitters, input, dispatch.

pub mod emitter;
pub mod handler;
pub mod input;

pub use emitter::{Emitter, ListenerId};
pub use handler::{Delivery, EventDispatcher};
pub use input::{from_crossterm, InputEvent, Key, KeyEvent, Modifiers};
