//! Review session: queue, selection, decisions and change notifications.

mod command;
mod controller;
mod events;
mod state;

pub use command::{Direction, SessionCommand};
pub use controller::SessionController;
pub use events::{SessionEvent, SessionEvents};
pub use state::{DetailState, SessionSnapshot};
