//! The contact record and its partial form.
//!
//! A [`Contact`] is what the store owns and what the API returns. A
//! [`ContactPatch`] is what clients send: every field optional, decoded once
//! at the HTTP boundary and then applied by the store.

use serde::{Deserialize, Serialize};

/// A single entry in the contact book.
///
/// `id` is assigned by [`ContactStore`](crate::ContactStore) and never changes
/// afterwards. The text fields are free-form; an empty string means "not given".
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Contact {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
}

impl Contact {
    /// Builds a contact from a patch, defaulting every omitted field to `""`.
    pub(crate) fn from_patch(id: u64, patch: ContactPatch) -> Self {
        Self {
            id,
            first_name: patch.first_name.unwrap_or_default(),
            last_name: patch.last_name.unwrap_or_default(),
            phone: patch.phone.unwrap_or_default(),
            email: patch.email.unwrap_or_default(),
        }
    }

    /// Overwrites only the fields present in `patch`. The id is untouched.
    pub(crate) fn apply(&mut self, patch: ContactPatch) {
        if let Some(v) = patch.first_name {
            self.first_name = v;
        }
        if let Some(v) = patch.last_name {
            self.last_name = v;
        }
        if let Some(v) = patch.phone {
            self.phone = v;
        }
        if let Some(v) = patch.email {
            self.email = v;
        }
    }
}

/// A partial contact.
///
/// Absent (or `null`) fields mean "empty" on create and "leave as is" on
/// update. Unknown keys are ignored. The short keys `fname` / `lname` are
/// accepted for older clients.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct ContactPatch {
    #[serde(default, alias = "fname")]
    pub first_name: Option<String>,
    #[serde(default, alias = "lname")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl ContactPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first_name(mut self, v: impl Into<String>) -> Self {
        self.first_name = Some(v.into());
        self
    }

    pub fn last_name(mut self, v: impl Into<String>) -> Self {
        self.last_name = Some(v.into());
        self
    }

    pub fn phone(mut self, v: impl Into<String>) -> Self {
        self.phone = Some(v.into());
        self
    }

    pub fn email(mut self, v: impl Into<String>) -> Self {
        self.email = Some(v.into());
        self
    }
}

/// Confirmation returned by a successful delete: the record that was removed.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Deleted {
    pub deleted: Contact,
}
