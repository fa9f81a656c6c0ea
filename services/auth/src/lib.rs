//! Authentication building blocks for the Pinboard services
//!
//! Password hashing, session storage and the auth gate that turns a
//! session token into a signed-in user.

pub mod credentials;
pub mod gate;
pub mod session;
pub mod validation;

pub use credentials::{Cost, CredentialError, CredentialService};
pub use gate::{AuthGate, AuthState, SessionToken};
pub use session::{MemorySessionStore, RedisSessionStore, SessionError, SessionStore};
