use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account identity as reported by the remote identity provider.
///
/// Immutable after creation except through the provider; the session layer
/// only caches a snapshot of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: impl Into<String>, email: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            created_at,
        }
    }
}
