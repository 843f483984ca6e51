//! Operator sessions for the dashboard.
//!
//! Credentials are checked by the hosted auth service; this module only keeps
//! the resulting access token in a signed cookie.

pub mod session;

pub use session::SessionCookie;
