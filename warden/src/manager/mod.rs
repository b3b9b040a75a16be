pub use self::guild_config::GuildConfigManager;

mod guild_config;
