mod events;
mod session;

pub use events::{Canvas, Event, Key};
pub use session::{Phase, Session};
