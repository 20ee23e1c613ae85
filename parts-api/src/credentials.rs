use serde::{Deserialize, Serialize};
use std::fmt;

/// An id/key pair as the auth endpoint expects it
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub id: String,
    pub key: String,
}

impl Party {
    pub fn new(id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
        }
    }
}

impl fmt::Debug for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Party")
            .field("id", &self.id)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Partner and user identity used to obtain tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub partner: Party,
    pub user: Party,
}

impl Credentials {
    pub fn new(partner: Party, user: Party) -> Self {
        Self { partner, user }
    }

    /// Same partner, different user
    pub fn for_user(&self, user: Party) -> Self {
        Self {
            partner: self.partner.clone(),
            user,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AccessRequest<'a> {
    pub access_type: &'static str,
    pub credentials: &'a Credentials,
}

impl<'a> AccessRequest<'a> {
    pub fn user(credentials: &'a Credentials) -> Self {
        Self {
            access_type: "user",
            credentials,
        }
    }
}
