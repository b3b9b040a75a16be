use std::fmt::Write;

use async_trait::async_trait;
use eyre::Result;
use warden_model::{GuildConfig, Prefix, Prefixes};

use crate::core::commands::{
    Command, CommandBody, CommandBuilder, CommandEnv, CommandFlags, CommandPermissions,
    OptionsOverride, Response, ServerRank,
};

pub fn command() -> CommandBuilder {
    let show = Command::builder("show", ShowPrefixes)
        .alias("list")
        .description("Display the prefixes of this server");

    let set = Command::builder("set", SetPrefixes)
        .description("Replace the prefixes of this server")
        .usage("<prefix> [prefix ...]")
        .example("! ?")
        .options(OptionsOverride::default().args_min(1))
        .permissions(CommandPermissions::default().rank(ServerRank::MANAGER));

    let reset = Command::builder("reset", ResetPrefixes)
        .description("Use the default prefixes again")
        .permissions(CommandPermissions::default().rank(ServerRank::MANAGER));

    Command::builder("prefix", ShowPrefixes)
        .alias("prefixes")
        .description("Check or change my prefixes for this server")
        .options(OptionsOverride::default().set(CommandFlags::GUILD_ONLY))
        .subcommand(show)
        .subcommand(set)
        .subcommand(reset)
}

pub struct ShowPrefixes;

#[async_trait]
impl CommandBody for ShowPrefixes {
    async fn execute(&self, env: CommandEnv<'_>) -> Result<Response> {
        let prefixes = current_prefixes(env.guild_config, &env.config.prefixes);
        env.reply(&prefixes).await?;

        Ok(Response::success())
    }
}

pub struct SetPrefixes;

#[async_trait]
impl CommandBody for SetPrefixes {
    async fn execute(&self, env: CommandEnv<'_>) -> Result<Response> {
        let Some(guild_id) = env.msg.guild_id() else {
            return Ok(Response::failure(eyre!("prefixes can only be set in guilds")));
        };

        // `args_min` guarantees at least one non-empty prefix
        let prefixes: Prefixes = env.args.iter().map(String::as_str).collect();
        let new_prefixes = prefixes.clone();

        let config = env
            .guild_configs
            .update(guild_id, move |config| config.prefixes = new_prefixes)
            .await?;

        let mut content = String::new();

        if env.args.len() > prefixes.len() {
            let _ = writeln!(
                content,
                "Only the first {} distinct prefixes were kept.",
                prefixes.len()
            );
        }

        content.push_str(&current_prefixes(Some(&config), &env.config.prefixes));
        env.reply(&content).await?;

        Ok(Response::success())
    }
}

pub struct ResetPrefixes;

#[async_trait]
impl CommandBody for ResetPrefixes {
    async fn execute(&self, env: CommandEnv<'_>) -> Result<Response> {
        let Some(guild_id) = env.msg.guild_id() else {
            return Ok(Response::failure(eyre!("prefixes can only be reset in guilds")));
        };

        let config = env
            .guild_configs
            .update(guild_id, |config| config.prefixes.clear())
            .await?;

        let content = current_prefixes(Some(&config), &env.config.prefixes);
        env.reply(&content).await?;

        Ok(Response::success())
    }
}

fn current_prefixes(guild_config: Option<&GuildConfig>, defaults: &Prefixes) -> String {
    let prefixes = match guild_config {
        Some(config) if !config.prefixes().is_empty() => config.prefixes(),
        _ => defaults,
    };

    let mut content = "Prefixes for this server: ".to_owned();
    let mut iter = prefixes.iter().map(Prefix::as_str);

    if let Some(prefix) = iter.next() {
        let _ = write!(content, "`{prefix}`");

        for prefix in iter {
            let _ = write!(content, ", `{prefix}`");
        }
    }

    content
}
