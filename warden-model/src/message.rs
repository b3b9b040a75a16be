use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{
    marker::{ChannelMarker, GuildMarker, MessageMarker, RoleMarker, UserMarker},
    Id, Permissions,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Id<UserMarker>,
    pub name: String,
    #[serde(default)]
    pub bot: bool,
}

/// The author of a message as a member of the guild it was sent in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub roles: SmallVec<[Id<RoleMarker>; 4]>,
    /// Permissions resolved for the channel of the message
    pub permissions: Permissions,
}

impl Member {
    /// Administrators implicitly have every permission.
    pub fn has_permission(&self, permissions: Permissions) -> bool {
        self.permissions.contains(Permissions::ADMINISTRATOR)
            || self.permissions.contains(permissions)
    }

    pub fn effective_permissions(&self) -> Permissions {
        if self.permissions.contains(Permissions::ADMINISTRATOR) {
            Permissions::all()
        } else {
            self.permissions
        }
    }

    pub fn has_role(&self, role: Id<RoleMarker>) -> bool {
        self.roles.contains(&role)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildInfo {
    pub id: Id<GuildMarker>,
    pub name: String,
    pub owner_id: Id<UserMarker>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub id: Id<ChannelMarker>,
    pub name: String,
}

/// Platform-neutral inbound message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Id<MessageMarker>,
    pub content: String,
    pub author: User,
    /// Only present for messages within a guild
    pub member: Option<Member>,
    pub guild: Option<GuildInfo>,
    pub channel: ChannelInfo,
    #[serde(default)]
    pub webhook: bool,
}

impl Message {
    pub fn guild_id(&self) -> Option<Id<GuildMarker>> {
        self.guild.as_ref().map(|guild| guild.id)
    }

    pub fn is_dm(&self) -> bool {
        self.guild.is_none()
    }

    pub fn roles(&self) -> &[Id<RoleMarker>] {
        self.member.as_ref().map_or(&[], |member| &member.roles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn administrator_has_everything() {
        let member = Member {
            roles: SmallVec::new(),
            permissions: Permissions::ADMINISTRATOR,
        };

        assert!(member.has_permission(Permissions::BAN_MEMBERS | Permissions::MANAGE_GUILD));
        assert_eq!(member.effective_permissions(), Permissions::all());
    }

    #[test]
    fn regular_member() {
        let member = Member {
            roles: smallvec::smallvec![Id::new(5)],
            permissions: Permissions::SEND_MESSAGES,
        };

        assert!(member.has_permission(Permissions::SEND_MESSAGES));
        assert!(!member.has_permission(Permissions::BAN_MEMBERS));
        assert!(member.has_role(Id::new(5)));
        assert!(!member.has_role(Id::new(6)));
    }
}
