use warden_model::{marker::UserMarker, ExecutionType, GuildConfig, Id};
use warden_util::CowUtils;

use crate::core::BotConfig;

pub fn execution_type(content: &str, author: Id<UserMarker>, config: &BotConfig) -> ExecutionType {
    if content.starts_with(config.owner_prefix.as_str()) && config.is_bot_owner(author) {
        ExecutionType::Owner
    } else if content.starts_with(config.admin_prefix.as_str()) && config.is_bot_admin(author) {
        ExecutionType::Admin
    } else {
        ExecutionType::Regular
    }
}

/// Returns the part of `content` that is the prefix.
///
/// Elevated prefixes win over a mention of the bot which wins over configured prefixes.
/// Guild prefixes replace the default prefixes unless there are none.
pub fn find_prefix<'c>(
    content: &'c str,
    execution_type: ExecutionType,
    bot: Id<UserMarker>,
    guild_config: Option<&GuildConfig>,
    config: &BotConfig,
) -> Option<&'c str> {
    let elevated = match execution_type {
        ExecutionType::Owner => Some(config.owner_prefix.as_str()),
        ExecutionType::Admin => Some(config.admin_prefix.as_str()),
        ExecutionType::Regular => None,
    };

    if let Some(prefix) = elevated.filter(|prefix| content.starts_with(prefix)) {
        return Some(&content[..prefix.len()]);
    }

    if let Some(len) = mention_prefix_len(content, bot) {
        return Some(&content[..len]);
    }

    let prefixes = match guild_config {
        Some(guild) if !guild.prefixes().is_empty() => guild.prefixes(),
        _ => &config.prefixes,
    };

    prefixes
        .iter()
        .find(|prefix| content.starts_with(prefix.as_str()))
        .map(|prefix| &content[..prefix.len()])
}

/// Length of `<@id> ` or `<@!id> ` if the content starts with either.
fn mention_prefix_len(content: &str, bot: Id<UserMarker>) -> Option<usize> {
    let rest = content.strip_prefix("<@")?;
    let rest = rest.strip_prefix('!').unwrap_or(rest);
    let rest = rest.strip_prefix(bot.to_string().as_str())?;
    rest.strip_prefix("> ")?;

    Some(content.len() - rest.len() + 2)
}

#[derive(Debug, PartialEq, Eq)]
pub enum Invoke {
    FullHelp,
    Command {
        label: String,
        args: Vec<String>,
        /// Whether help for the command was requested instead of running it
        help: bool,
    },
}

impl Invoke {
    /// Parses the content after the prefix.
    pub fn parse(input: &str) -> Option<Self> {
        let mut tokens = input.split_whitespace();
        let label = tokens.next()?.cow_to_ascii_lowercase();
        let mut args: Vec<String> = tokens.map(str::to_owned).collect();

        if label != "help" {
            return Some(Self::Command {
                label: label.into_owned(),
                args,
                help: false,
            });
        }

        if args.is_empty() {
            return Some(Self::FullHelp);
        }

        let label = args.remove(0).to_ascii_lowercase();

        Some(Self::Command {
            label,
            args,
            help: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use warden_model::Prefixes;

    use super::*;

    const BOT: Id<UserMarker> = Id::new(1000);
    const OWNER: Id<UserMarker> = Id::new(1);
    const ADMIN: Id<UserMarker> = Id::new(2);
    const USER: Id<UserMarker> = Id::new(3);

    fn config() -> BotConfig {
        let mut config = BotConfig::default();
        config.owners.insert(OWNER);
        config.admins.insert(ADMIN);
        config.prefixes = ["!", "?"].into_iter().collect();

        config
    }

    #[test]
    fn tiers() {
        let config = config();

        assert_eq!(execution_type("warden!ping", OWNER, &config), ExecutionType::Owner);
        assert_eq!(execution_type("warden.ping", OWNER, &config), ExecutionType::Admin);
        assert_eq!(execution_type("warden.ping", ADMIN, &config), ExecutionType::Admin);
        assert_eq!(execution_type("warden!ping", ADMIN, &config), ExecutionType::Regular);
        assert_eq!(execution_type("warden.ping", USER, &config), ExecutionType::Regular);
        assert_eq!(execution_type("!ping", OWNER, &config), ExecutionType::Regular);
    }

    #[test]
    fn owner_prefix_wins() {
        let mut config = config();
        config.owner_prefix = "!".into();

        let mut guild = GuildConfig::default();
        guild.prefixes = ["!"].into_iter().collect();

        let prefix = find_prefix("!ping", ExecutionType::Owner, BOT, Some(&guild), &config);
        assert_eq!(prefix, Some("!"));
    }

    #[test]
    fn guild_prefixes_replace_defaults() {
        let config = config();
        let mut guild = GuildConfig::default();

        let prefix = find_prefix("?ping", ExecutionType::Regular, BOT, Some(&guild), &config);
        assert_eq!(prefix, Some("?"));

        guild.prefixes = ["$", "%"].into_iter().collect::<Prefixes>();

        let prefix = find_prefix("?ping", ExecutionType::Regular, BOT, Some(&guild), &config);
        assert_eq!(prefix, None);

        let prefix = find_prefix("%ping", ExecutionType::Regular, BOT, Some(&guild), &config);
        assert_eq!(prefix, Some("%"));
    }

    #[test]
    fn first_configured_prefix_wins() {
        let config = config();
        let mut guild = GuildConfig::default();
        guild.prefixes = ["w", "we"].into_iter().collect();

        let prefix = find_prefix("weping", ExecutionType::Regular, BOT, Some(&guild), &config);
        assert_eq!(prefix, Some("w"));
    }

    #[test]
    fn mentions() {
        let config = config();

        let prefix = find_prefix("<@1000> ping", ExecutionType::Regular, BOT, None, &config);
        assert_eq!(prefix, Some("<@1000> "));

        let prefix = find_prefix("<@!1000> ping", ExecutionType::Regular, BOT, None, &config);
        assert_eq!(prefix, Some("<@!1000> "));

        let prefix = find_prefix("<@1000>ping", ExecutionType::Regular, BOT, None, &config);
        assert_eq!(prefix, None);

        let prefix = find_prefix("<@10001> ping", ExecutionType::Regular, BOT, None, &config);
        assert_eq!(prefix, None);
    }

    #[test]
    fn elevated_prefix_only_for_elevated() {
        let config = config();

        let prefix = find_prefix("warden!ping", ExecutionType::Regular, BOT, None, &config);
        assert_eq!(prefix, None);
    }

    #[test]
    fn invokes() {
        assert_eq!(Invoke::parse("   "), None);
        assert_eq!(Invoke::parse("help"), Some(Invoke::FullHelp));
        assert_eq!(Invoke::parse("HELP  "), Some(Invoke::FullHelp));

        assert_eq!(
            Invoke::parse("Ban <@5>  spam"),
            Some(Invoke::Command {
                label: "ban".to_owned(),
                args: vec!["<@5>".to_owned(), "spam".to_owned()],
                help: false,
            })
        );

        assert_eq!(
            Invoke::parse("help Prefix set"),
            Some(Invoke::Command {
                label: "prefix".to_owned(),
                args: vec!["set".to_owned()],
                help: true,
            })
        );
    }
}
