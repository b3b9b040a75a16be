use std::{
    collections::BTreeSet,
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use warden_model::{
    marker::{ChannelMarker, RoleMarker, UserMarker},
    GuildConfig, Id, Message, Permissions,
};

use crate::core::{ranks::ServerRanks, BotConfig};

bitflags::bitflags! {
    /// Guild ranks a command requires.
    #[derive(Default)]
    pub struct ServerRank: u8 {
        const MOD     = 1 << 0;
        const MANAGER = 1 << 1;
        const ADMIN   = 1 << 2;
        const OWNER   = 1 << 3;
    }
}

pub type Predicate = Arc<dyn Fn(&Message) -> bool + Send + Sync>;

/// Permissions the caller either needs all of, or bypasses everything with any of.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PermissionAxis {
    pub needed: Permissions,
    pub bypass: Permissions,
}

/// Id allow-lists. An empty `needed` list allows everyone.
#[derive(Clone, Debug)]
pub struct IdAxis<T> {
    pub needed: BTreeSet<Id<T>>,
    pub bypass: BTreeSet<Id<T>>,
}

impl<T> Default for IdAxis<T> {
    fn default() -> Self {
        Self {
            needed: BTreeSet::new(),
            bypass: BTreeSet::new(),
        }
    }
}

impl<T> IdAxis<T> {
    fn bypassed_by(&self, ids: &[Id<T>]) -> bool {
        ids.iter().any(|id| self.bypass.contains(id))
    }

    fn satisfied_by(&self, ids: &[Id<T>]) -> bool {
        self.needed.is_empty() || ids.iter().any(|id| self.needed.contains(id))
    }
}

/// Whether membership in the bot's staff is needed or bypasses the other checks.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StaffAxis {
    pub needed: bool,
    pub bypass: bool,
}

/// Why the caller may not use a command.
///
/// `reason` names the unmet rank or the first missing permission if there is one.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Denial {
    pub reason: Option<&'static str>,
}

impl Denial {
    fn new(reason: &'static str) -> Self {
        Self {
            reason: Some(reason),
        }
    }

    const UNSPECIFIED: Self = Self { reason: None };
}

/// Authorization requirements of a command.
#[derive(Clone, Default)]
pub struct CommandPermissions {
    /// Required by the bot within the channel
    pub bot: Permissions,
    pub ranks: ServerRank,
    pub user: PermissionAxis,
    pub user_ids: IdAxis<UserMarker>,
    pub role_ids: IdAxis<RoleMarker>,
    pub channel_ids: IdAxis<ChannelMarker>,
    pub staff: StaffAxis,
    pub custom: Option<Predicate>,
}

impl CommandPermissions {
    pub fn bot(mut self, permissions: Permissions) -> Self {
        self.bot |= permissions;

        self
    }

    pub fn rank(mut self, rank: ServerRank) -> Self {
        self.ranks |= rank;

        self
    }

    pub fn needs(mut self, permissions: Permissions) -> Self {
        self.user.needed |= permissions;

        self
    }

    pub fn bypass(mut self, permissions: Permissions) -> Self {
        self.user.bypass |= permissions;

        self
    }

    pub fn custom<F>(mut self, f: F) -> Self
    where
        F: Fn(&Message) -> bool + Send + Sync + 'static,
    {
        self.custom = Some(Arc::new(f));

        self
    }

    /// Evaluates the caller's side, i.e. everything except the bot permissions.
    ///
    /// Bypasses are checked first, then the server ranks, then everything needed,
    /// and lastly the custom predicate.
    pub fn can_execute(
        &self,
        msg: &Message,
        guild_config: Option<&GuildConfig>,
        config: &BotConfig,
    ) -> Result<(), Denial> {
        let user_permissions = msg
            .member
            .as_ref()
            .map_or_else(Permissions::empty, |member| member.effective_permissions());

        let user_id = [msg.author.id];
        let channel_id = [msg.channel.id];
        let is_staff = config.is_bot_staff(msg.author.id);

        let bypassed = user_permissions.intersects(self.user.bypass)
            || self.user_ids.bypassed_by(&user_id)
            || self.role_ids.bypassed_by(msg.roles())
            || self.channel_ids.bypassed_by(&channel_id)
            || (self.staff.bypass && is_staff);

        if bypassed {
            return Ok(());
        }

        let mod_only = guild_config.map_or(false, GuildConfig::is_mod_only);

        if (mod_only || self.ranks.contains(ServerRank::MOD))
            && !ServerRanks::is_server_mod(msg, guild_config)
        {
            return Err(Denial::new("serverMod"));
        }

        if self.ranks.contains(ServerRank::MANAGER) && !ServerRanks::is_server_manager(msg) {
            return Err(Denial::new("serverManager"));
        }

        if self.ranks.contains(ServerRank::ADMIN) && !ServerRanks::is_server_admin(msg) {
            return Err(Denial::new("serverAdmin"));
        }

        if self.ranks.contains(ServerRank::OWNER) && !ServerRanks::is_server_owner(msg) {
            return Err(Denial::new("serverOwner"));
        }

        if let Some(missing) = self.user.needed.first_missing(user_permissions) {
            return Err(Denial::new(missing));
        }

        let needed = self.user_ids.satisfied_by(&user_id)
            && self.role_ids.satisfied_by(msg.roles())
            && self.channel_ids.satisfied_by(&channel_id)
            && (!self.staff.needed || is_staff);

        if !needed {
            return Err(Denial::UNSPECIFIED);
        }

        match self.custom {
            Some(ref predicate) if !predicate(msg) => Err(Denial::UNSPECIFIED),
            _ => Ok(()),
        }
    }

    /// Returns the missing bot permissions, if any.
    pub fn has_bot_permissions(&self, available: Permissions) -> Result<(), Permissions> {
        let available = if available.contains(Permissions::ADMINISTRATOR) {
            Permissions::all()
        } else {
            available
        };

        match self.bot - available {
            missing if missing.is_empty() => Ok(()),
            missing => Err(missing),
        }
    }
}

impl Debug for CommandPermissions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CommandPermissions")
            .field("bot", &self.bot)
            .field("ranks", &self.ranks)
            .field("user", &self.user)
            .field("user_ids", &self.user_ids)
            .field("role_ids", &self.role_ids)
            .field("channel_ids", &self.channel_ids)
            .field("staff", &self.staff)
            .field("custom", &self.custom.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{dm_message, guild_message, ROLE_ID, USER_ID};

    #[test]
    fn default_allows() {
        let msg = guild_message("!cmd", Permissions::empty());
        let perms = CommandPermissions::default();

        assert_eq!(perms.can_execute(&msg, None, &BotConfig::default()), Ok(()));
    }

    #[test]
    fn first_missing_permission_is_reason() {
        let msg = guild_message("!ban", Permissions::KICK_MEMBERS);
        let perms = CommandPermissions::default()
            .needs(Permissions::BAN_MEMBERS | Permissions::KICK_MEMBERS);

        let denial = perms
            .can_execute(&msg, None, &BotConfig::default())
            .unwrap_err();

        assert_eq!(denial.reason, Some("banMembers"));
    }

    #[test]
    fn bypass_over_needed() {
        let msg = guild_message("!cmd", Permissions::empty());
        let config = BotConfig::default();

        let mut perms = CommandPermissions::default()
            .rank(ServerRank::OWNER)
            .needs(Permissions::BAN_MEMBERS);
        assert!(perms.can_execute(&msg, None, &config).is_err());

        perms.role_ids.bypass.insert(Id::new(ROLE_ID));
        assert_eq!(perms.can_execute(&msg, None, &config), Ok(()));

        let mut perms = CommandPermissions::default().custom(|_| false);
        perms.user_ids.bypass.insert(Id::new(USER_ID));
        assert_eq!(perms.can_execute(&msg, None, &config), Ok(()));
    }

    #[test]
    fn staff_axis() {
        let msg = guild_message("!cmd", Permissions::empty());
        let mut config = BotConfig::default();

        let mut perms = CommandPermissions::default().needs(Permissions::ADMINISTRATOR);
        perms.staff.bypass = true;
        assert!(perms.can_execute(&msg, None, &config).is_err());

        config.staff.insert(msg.author.id);
        assert_eq!(perms.can_execute(&msg, None, &config), Ok(()));

        let mut perms = CommandPermissions::default();
        perms.staff.needed = true;
        assert_eq!(perms.can_execute(&msg, None, &config), Ok(()));
        assert_eq!(
            perms.can_execute(&msg, None, &BotConfig::default()),
            Err(Denial::UNSPECIFIED)
        );
    }

    #[test]
    fn ranks_in_order() {
        let msg = guild_message("!cmd", Permissions::MANAGE_GUILD);
        let config = BotConfig::default();

        let perms = CommandPermissions::default()
            .rank(ServerRank::MOD | ServerRank::ADMIN | ServerRank::OWNER);
        let denial = perms.can_execute(&msg, None, &config).unwrap_err();
        assert_eq!(denial.reason, Some("serverAdmin"));

        let perms = CommandPermissions::default().rank(ServerRank::MANAGER);
        assert_eq!(perms.can_execute(&msg, None, &config), Ok(()));
    }

    #[test]
    fn mod_only_guild() {
        let msg = guild_message("!cmd", Permissions::empty());
        let bot_config = BotConfig::default();
        let perms = CommandPermissions::default();

        let mut config = GuildConfig::default();
        config.mod_only = true;

        let denial = perms
            .can_execute(&msg, Some(&config), &bot_config)
            .unwrap_err();
        assert_eq!(denial.reason, Some("serverMod"));

        config.mod_roles.insert(Id::new(ROLE_ID));
        assert_eq!(perms.can_execute(&msg, Some(&config), &bot_config), Ok(()));
    }

    #[test]
    fn id_allow_lists() {
        let msg = guild_message("!cmd", Permissions::empty());
        let config = BotConfig::default();

        let mut perms = CommandPermissions::default();
        perms.channel_ids.needed.insert(Id::new(12345));
        assert_eq!(
            perms.can_execute(&msg, None, &config),
            Err(Denial::UNSPECIFIED)
        );

        perms.channel_ids.needed.insert(msg.channel.id);
        assert_eq!(perms.can_execute(&msg, None, &config), Ok(()));
    }

    #[test]
    fn custom_predicate_last() {
        let msg = guild_message("!cmd", Permissions::empty());
        let config = BotConfig::default();

        let perms = CommandPermissions::default().custom(|msg| msg.content.len() > 10);
        assert_eq!(
            perms.can_execute(&msg, None, &config),
            Err(Denial::UNSPECIFIED)
        );

        let perms = CommandPermissions::default()
            .needs(Permissions::BAN_MEMBERS)
            .custom(|_| false);
        let denial = perms.can_execute(&msg, None, &config).unwrap_err();
        assert_eq!(denial.reason, Some("banMembers"));
    }

    #[test]
    fn dms_deny_guild_axes() {
        let msg = dm_message("!cmd");
        let config = BotConfig::default();

        let perms = CommandPermissions::default().rank(ServerRank::MOD);
        assert!(perms.can_execute(&msg, None, &config).is_err());

        let perms = CommandPermissions::default().needs(Permissions::SEND_MESSAGES);
        assert!(perms.can_execute(&msg, None, &config).is_err());
    }

    #[test]
    fn bot_permissions() {
        let perms = CommandPermissions::default()
            .bot(Permissions::SEND_MESSAGES | Permissions::BAN_MEMBERS);

        assert_eq!(
            perms.has_bot_permissions(Permissions::SEND_MESSAGES),
            Err(Permissions::BAN_MEMBERS)
        );
        assert_eq!(perms.has_bot_permissions(Permissions::ADMINISTRATOR), Ok(()));
    }
}
