use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

bitflags::bitflags! {
    #[derive(Default)]
    pub struct Permissions: u64 {
        const CREATE_INVITE        = 1 << 0;
        const KICK_MEMBERS         = 1 << 1;
        const BAN_MEMBERS          = 1 << 2;
        const ADMINISTRATOR        = 1 << 3;
        const MANAGE_CHANNELS      = 1 << 4;
        const MANAGE_GUILD         = 1 << 5;
        const ADD_REACTIONS        = 1 << 6;
        const VIEW_AUDIT_LOG       = 1 << 7;
        const VIEW_CHANNEL         = 1 << 10;
        const SEND_MESSAGES        = 1 << 11;
        const MANAGE_MESSAGES      = 1 << 13;
        const EMBED_LINKS          = 1 << 14;
        const ATTACH_FILES         = 1 << 15;
        const READ_MESSAGE_HISTORY = 1 << 16;
        const MENTION_EVERYONE     = 1 << 17;
        const USE_EXTERNAL_EMOJIS  = 1 << 18;
        const CONNECT              = 1 << 20;
        const SPEAK                = 1 << 21;
        const MUTE_MEMBERS         = 1 << 22;
        const MOVE_MEMBERS         = 1 << 24;
        const CHANGE_NICKNAME      = 1 << 26;
        const MANAGE_NICKNAMES     = 1 << 27;
        const MANAGE_ROLES         = 1 << 28;
        const MANAGE_WEBHOOKS      = 1 << 29;
        const MANAGE_EMOJIS        = 1 << 30;
        const MODERATE_MEMBERS     = 1 << 40;
    }
}

/// Canonical names in the order in which missing permissions are reported.
static NAMES: &[(Permissions, &str)] = &[
    (Permissions::ADMINISTRATOR, "administrator"),
    (Permissions::MANAGE_GUILD, "manageGuild"),
    (Permissions::MANAGE_ROLES, "manageRoles"),
    (Permissions::MANAGE_CHANNELS, "manageChannels"),
    (Permissions::MANAGE_WEBHOOKS, "manageWebhooks"),
    (Permissions::MANAGE_EMOJIS, "manageEmojis"),
    (Permissions::MANAGE_MESSAGES, "manageMessages"),
    (Permissions::MANAGE_NICKNAMES, "manageNicknames"),
    (Permissions::BAN_MEMBERS, "banMembers"),
    (Permissions::KICK_MEMBERS, "kickMembers"),
    (Permissions::MODERATE_MEMBERS, "moderateMembers"),
    (Permissions::MUTE_MEMBERS, "muteMembers"),
    (Permissions::MOVE_MEMBERS, "moveMembers"),
    (Permissions::VIEW_AUDIT_LOG, "viewAuditLog"),
    (Permissions::CREATE_INVITE, "createInvite"),
    (Permissions::CHANGE_NICKNAME, "changeNickname"),
    (Permissions::VIEW_CHANNEL, "viewChannel"),
    (Permissions::SEND_MESSAGES, "sendMessages"),
    (Permissions::EMBED_LINKS, "embedLinks"),
    (Permissions::ATTACH_FILES, "attachFiles"),
    (Permissions::READ_MESSAGE_HISTORY, "readMessageHistory"),
    (Permissions::ADD_REACTIONS, "addReactions"),
    (Permissions::USE_EXTERNAL_EMOJIS, "useExternalEmojis"),
    (Permissions::MENTION_EVERYONE, "mentionEveryone"),
    (Permissions::CONNECT, "connect"),
    (Permissions::SPEAK, "speak"),
];

impl Permissions {
    /// Names of all contained permissions.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        NAMES
            .iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
    }

    /// Name of the first permission of `self` that is not contained in `available`.
    pub fn first_missing(self, available: Self) -> Option<&'static str> {
        (self - available).names().next()
    }

    pub fn name(self) -> Option<&'static str> {
        NAMES
            .iter()
            .find(|(flag, _)| *flag == self)
            .map(|(_, name)| *name)
    }
}

impl Display for Permissions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut names = self.names();

        if let Some(name) = names.next() {
            f.write_str(name)?;

            for name in names {
                write!(f, ", {name}")?;
            }
        }

        Ok(())
    }
}

#[derive(Debug, Error)]
#[error("unknown permission `{0}`")]
pub struct ParsePermissionError(pub Box<str>);

impl FromStr for Permissions {
    type Err = ParsePermissionError;

    /// Parses a comma separated list of permission names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .try_fold(Self::empty(), |perms, name| {
                NAMES
                    .iter()
                    .find(|(_, n)| n.eq_ignore_ascii_case(name))
                    .map(|(flag, _)| perms | *flag)
                    .ok_or_else(|| ParsePermissionError(name.into()))
            })
    }
}

impl Serialize for Permissions {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(self.bits())
    }
}

impl<'de> Deserialize<'de> for Permissions {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        u64::deserialize(d).map(Self::from_bits_truncate)
    }
}
