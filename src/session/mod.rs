// Session module
// Credential storage and the session-expiry sequence

mod manager;
mod store;

pub use manager::{SessionManager, SESSION_EXPIRED_MESSAGE};
pub use store::{
    default_session_file, FileSessionStore, MemorySessionStore, SessionStore, ACCESS_TOKEN_KEY,
    REFRESH_TOKEN_KEY,
};
