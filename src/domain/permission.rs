use serde::{Deserialize, Serialize};

use crate::config::roles::{Affordances, PostAction, Role};

/// Result of the permission-check endpoint for the current user and org.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPermission {
    #[serde(default)]
    pub role: i32,
    #[serde(default)]
    pub is_owner: bool,
    #[serde(default)]
    pub channel_ids: Vec<i64>,
}

impl UserPermission {
    pub fn role(&self) -> Role {
        Role::from_i32(self.role)
    }

    /// Affordances regardless of channel.
    pub fn affordances(&self) -> Affordances {
        if self.is_owner {
            return Affordances::full();
        }
        Affordances::for_role(self.role())
    }

    pub fn can_use_channel(&self, channel_id: i64) -> bool {
        self.is_owner || self.channel_ids.contains(&channel_id)
    }

    /// Affordances for a post on a given channel. Posts without a channel
    /// fall back to the role's affordances.
    pub fn affordances_for_channel(&self, channel_id: Option<i64>) -> Affordances {
        match channel_id {
            Some(id) if !self.can_use_channel(id) => Affordances::none(),
            _ => self.affordances(),
        }
    }

    pub fn allows(&self, action: PostAction, channel_id: Option<i64>) -> bool {
        self.affordances_for_channel(channel_id).allows(action)
    }
}
