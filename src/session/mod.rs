//! Session identity, state, and storage.

pub mod state;
pub mod store;

pub use state::SessionState;
pub use store::{Session, SessionKey, SessionStore};
