use std::collections::BTreeSet;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::{
    marker::{ChannelMarker, RoleMarker, UserMarker},
    Id, Message, Prefixes,
};

/// Per-guild settings. Missing fields deserialize to their defaults so older
/// stored configs stay readable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuildConfig {
    pub prefixes: Prefixes,
    pub disabled_modules: BTreeSet<CompactString>,
    pub disabled_commands: BTreeSet<CompactString>,
    pub disabled_listeners: BTreeSet<CompactString>,
    pub ignored_users: BTreeSet<Id<UserMarker>>,
    pub ignored_roles: BTreeSet<Id<RoleMarker>>,
    pub ignored_channels: BTreeSet<Id<ChannelMarker>>,
    pub mod_roles: BTreeSet<Id<RoleMarker>>,
    pub mod_users: BTreeSet<Id<UserMarker>>,
    pub mod_only: bool,
}

impl GuildConfig {
    pub fn prefixes(&self) -> &Prefixes {
        &self.prefixes
    }

    /// Whether the author, one of their roles, or the channel is ignored.
    pub fn is_ignored(&self, msg: &Message) -> bool {
        self.ignored_users.contains(&msg.author.id)
            || self.ignored_channels.contains(&msg.channel.id)
            || msg
                .roles()
                .iter()
                .any(|role| self.ignored_roles.contains(role))
    }

    pub fn is_module_disabled(&self, module: &str) -> bool {
        self.disabled_modules.contains(module)
    }

    /// `label` is the full label of the command, e.g. `prefix set`.
    pub fn is_command_disabled(&self, label: &str) -> bool {
        self.disabled_commands.contains(label)
    }

    pub fn is_listener_disabled(&self, listener: &str) -> bool {
        self.disabled_listeners.contains(listener)
    }

    pub fn is_mod_only(&self) -> bool {
        self.mod_only
    }

    pub fn is_mod(&self, user: Id<UserMarker>, roles: &[Id<RoleMarker>]) -> bool {
        self.mod_users.contains(&user) || roles.iter().any(|role| self.mod_roles.contains(role))
    }
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;

    use super::*;
    use crate::{ChannelInfo, GuildInfo, Member, Permissions, User};

    fn message(user: u64, role: u64, channel: u64) -> Message {
        Message {
            id: Id::new(1),
            content: String::new(),
            author: User {
                id: Id::new(user),
                name: "user".to_owned(),
                bot: false,
            },
            member: Some(Member {
                roles: smallvec![Id::new(role)],
                permissions: Permissions::empty(),
            }),
            guild: Some(GuildInfo {
                id: Id::new(1),
                name: "guild".to_owned(),
                owner_id: Id::new(99),
            }),
            channel: ChannelInfo {
                id: Id::new(channel),
                name: "general".to_owned(),
            },
            webhook: false,
        }
    }

    #[test]
    fn ignore_axes() {
        let mut config = GuildConfig::default();
        assert!(!config.is_ignored(&message(1, 2, 3)));

        config.ignored_roles.insert(Id::new(2));
        assert!(config.is_ignored(&message(1, 2, 3)));
        assert!(!config.is_ignored(&message(1, 4, 3)));

        config.ignored_channels.insert(Id::new(3));
        assert!(config.is_ignored(&message(1, 4, 3)));

        config.ignored_users.insert(Id::new(7));
        assert!(config.is_ignored(&message(7, 4, 5)));
    }

    #[test]
    fn partial_json() {
        let json = r#"{"prefixes":["?"],"mod_only":true,"disabled_commands":["prefix set"]}"#;
        let config: GuildConfig = serde_json::from_str(json).unwrap();

        assert_eq!(&*config.prefixes, &["?"]);
        assert!(config.is_mod_only());
        assert!(config.is_command_disabled("prefix set"));
        assert!(!config.is_module_disabled("utility"));
    }
}
