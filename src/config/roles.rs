use serde::{Deserialize, Serialize};

/// Permission levels inside an organization workspace
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[repr(i32)]
pub enum Role {
    None = 0,    // no access to post actions
    Limited = 1, // editor: drafts only
    Full = 2,    // create, schedule, publish, delete
    Admin = 3,   // same post actions as Full
}

impl Role {
    /// Values above 3 are treated as Admin, negative values as None.
    pub fn from_i32(value: i32) -> Self {
        match value {
            i32::MIN..=0 => Role::None,
            1 => Role::Limited,
            2 => Role::Full,
            _ => Role::Admin,
        }
    }

    pub fn as_i32(&self) -> i32 {
        *self as i32
    }
}

/// Actions the dashboard may offer on posts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PostAction {
    Create,
    Edit,
    SaveDraft,
    Schedule,
    Publish,
    Delete,
    Repost,
}

/// Which post actions are available for a role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Affordances {
    pub create: bool,
    pub edit: bool,
    pub save_draft: bool,
    pub schedule: bool,
    pub publish: bool,
    pub delete: bool,
    pub repost: bool,
}

impl Affordances {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn full() -> Self {
        Affordances {
            create: true,
            edit: true,
            save_draft: true,
            schedule: true,
            publish: true,
            delete: true,
            repost: true,
        }
    }

    pub fn for_role(role: Role) -> Self {
        match role {
            Role::None => Affordances::none(),
            Role::Limited => Affordances {
                create: true,
                edit: true,
                save_draft: true,
                schedule: false,
                publish: false,
                delete: false,
                repost: false,
            },
            Role::Full | Role::Admin => Affordances::full(),
        }
    }

    pub fn allows(&self, action: PostAction) -> bool {
        match action {
            PostAction::Create => self.create,
            PostAction::Edit => self.edit,
            PostAction::SaveDraft => self.save_draft,
            PostAction::Schedule => self.schedule,
            PostAction::Publish => self.publish,
            PostAction::Delete => self.delete,
            PostAction::Repost => self.repost,
        }
    }

    pub fn any(&self) -> bool {
        *self != Affordances::none()
    }
}
