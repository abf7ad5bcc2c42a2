//! Response building for the DevCamper API.
//!
//! - [`envelope`] - the `{success, count?, pagination?, data}` JSON envelope
//! - [`session`] - token responses and the `token` cookie

pub mod envelope;
pub mod session;

pub use envelope::Envelope;
pub use session::{TokenResponse, clear_session_cookie, session_cookie};
