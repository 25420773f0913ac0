use serde::{Deserialize, Serialize};

use analog_utils::pseudonym::generate_pseudonym;

/// Identity of the caller, as supplied by the external auth collaborator:
/// a stable `user_id` plus the display handle shown next to content.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: String,
    pub pseudonym: String,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, pseudonym: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            pseudonym: pseudonym.into(),
        }
    }

    /// Actor with a freshly generated display handle, for users who post
    /// without linking their account name.
    pub fn pseudonymous(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            pseudonym: generate_pseudonym(),
        }
    }
}
