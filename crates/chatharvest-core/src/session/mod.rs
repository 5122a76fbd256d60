//! Session lifecycle: state machine, persistent store port, and the
//! login/readiness drivers built on them.

pub mod lifecycle;
pub mod login;
pub mod store;

pub use lifecycle::{SessionAction, SessionLifecycle, Transition};
pub use login::{run_qr_login, wait_until_ready, watch_session};
pub use store::SessionStore;
