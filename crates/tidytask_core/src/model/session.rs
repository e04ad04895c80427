//! Authenticated session value.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The current authenticated-user context as observed from the gateway.
///
/// Sessions are created and destroyed entirely by the auth gateway; the
/// rest of the application only observes transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Stable account identifier. Task ownership is keyed by this value.
    pub user_id: Uuid,
    /// Normalized email the session was established with.
    pub email: String,
}
