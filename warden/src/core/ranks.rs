use warden_model::{marker::UserMarker, GuildConfig, Id, Message, Permissions};

use crate::core::BotConfig;

/// Ranks of the bot itself, assigned through the config.
impl BotConfig {
    pub fn is_bot_owner(&self, user: Id<UserMarker>) -> bool {
        self.owners.contains(&user)
    }

    /// Owners are admins as well.
    pub fn is_bot_admin(&self, user: Id<UserMarker>) -> bool {
        self.admins.contains(&user) || self.is_bot_owner(user)
    }

    pub fn is_bot_staff(&self, user: Id<UserMarker>) -> bool {
        self.staff.contains(&user)
    }
}

/// Ranks within a guild. Each rank includes all lower ones so a server owner
/// is also an admin, manager, and moderator. All of them are unmet in DMs.
pub struct ServerRanks;

impl ServerRanks {
    pub fn is_server_owner(msg: &Message) -> bool {
        msg.guild
            .as_ref()
            .map_or(false, |guild| guild.owner_id == msg.author.id)
    }

    pub fn is_server_admin(msg: &Message) -> bool {
        Self::is_server_owner(msg) || Self::has_permission(msg, Permissions::ADMINISTRATOR)
    }

    pub fn is_server_manager(msg: &Message) -> bool {
        Self::is_server_admin(msg) || Self::has_permission(msg, Permissions::MANAGE_GUILD)
    }

    pub fn is_server_mod(msg: &Message, config: Option<&GuildConfig>) -> bool {
        if Self::is_server_manager(msg) {
            return true;
        }

        config.map_or(false, |config| config.is_mod(msg.author.id, msg.roles()))
    }

    fn has_permission(msg: &Message, permission: Permissions) -> bool {
        msg.member
            .as_ref()
            .map_or(false, |member| member.has_permission(permission))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{dm_message, guild_message};

    #[test]
    fn bot_ranks() {
        let mut config = BotConfig::default();
        config.owners.insert(Id::new(1));
        config.admins.insert(Id::new(2));
        config.staff.insert(Id::new(3));

        assert!(config.is_bot_owner(Id::new(1)));
        assert!(config.is_bot_admin(Id::new(1)));
        assert!(config.is_bot_admin(Id::new(2)));
        assert!(!config.is_bot_owner(Id::new(2)));
        assert!(config.is_bot_staff(Id::new(3)));
        assert!(!config.is_bot_admin(Id::new(3)));
    }

    #[test]
    fn hierarchy() {
        let msg = guild_message("hi", Permissions::MANAGE_GUILD);
        assert!(ServerRanks::is_server_manager(&msg));
        assert!(ServerRanks::is_server_mod(&msg, None));
        assert!(!ServerRanks::is_server_admin(&msg));

        let msg = guild_message("hi", Permissions::ADMINISTRATOR);
        assert!(ServerRanks::is_server_admin(&msg));
        assert!(!ServerRanks::is_server_owner(&msg));
    }

    #[test]
    fn configured_mods() {
        let msg = guild_message("hi", Permissions::empty());
        let mut config = GuildConfig::default();

        assert!(!ServerRanks::is_server_mod(&msg, Some(&config)));

        config.mod_users.insert(msg.author.id);
        assert!(ServerRanks::is_server_mod(&msg, Some(&config)));
    }

    #[test]
    fn nothing_in_dms() {
        let msg = dm_message("hi");

        assert!(!ServerRanks::is_server_owner(&msg));
        assert!(!ServerRanks::is_server_mod(&msg, Some(&GuildConfig::default())));
    }
}
