//! Per-connection socket sessions.
//!
//! Each websocket connection gets one [`Session`] running as its own task.
//! The session reads text frames from an inbound mailbox one at a time and
//! answers on an outbound mailbox, so it never handles two requests at once
//! and can be driven without a real socket.

mod actor;
mod identity;

pub use actor::{spawn_session, SearchTarget, Session, MAILBOX_CAPACITY};
pub use identity::{identity_from_cookies, session_identity, IDENTITY_COOKIE};
