//! Anonymous cart scoping.
//!
//! A session id is an opaque token minted by the client on first use and
//! presented on every cart call. Any non-empty string is a valid key; the
//! server never interprets it and attaches no authorization to it: whoever
//! holds the token can read and change that cart.

use crate::errors::ServiceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Wraps a client-supplied token. Only the empty string is rejected.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, ServiceError> {
        let raw = raw.as_ref();
        if raw.is_empty() {
            return Err(ServiceError::ValidationError(
                "Session id must not be empty".to_string(),
            ));
        }
        Ok(Self(raw.to_string()))
    }

    /// Mints a fresh random token.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SessionId {
    type Error = ServiceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        SessionId::parse(value)
    }
}

impl From<SessionId> for String {
    fn from(value: SessionId) -> Self {
        value.0
    }
}
