use std::fmt::Write;

use async_trait::async_trait;
use eyre::{Result, WrapErr};
use warden_model::{GuildConfig, Message};

use super::{Command, CommandRegistry};
use crate::core::ChatClient;

pub struct HelpEnv<'a> {
    pub msg: &'a Message,
    pub prefix: &'a str,
    pub registry: &'a CommandRegistry,
    pub guild_config: Option<&'a GuildConfig>,
    pub client: &'a dyn ChatClient,
}

#[async_trait]
pub trait HelpRenderer: Send + Sync {
    /// Overview of all available commands
    async fn full_help(&self, env: HelpEnv<'_>) -> Result<()>;

    async fn command_help(&self, env: HelpEnv<'_>, command: &Command) -> Result<()>;
}

/// Renders help as plain text.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultHelp;

impl DefaultHelp {
    pub fn render_full(
        registry: &CommandRegistry,
        prefix: &str,
        guild_config: Option<&GuildConfig>,
    ) -> String {
        let mut content = String::new();

        let module_visible = |label: &str| {
            !guild_config.map_or(false, |config| config.is_module_disabled(label))
        };

        let command_visible = |cmd: &&Command| {
            cmd.is_enabled()
                && !cmd.options.flags.hidden()
                && !guild_config.map_or(false, |config| config.is_command_disabled(cmd.full_label()))
        };

        for module in registry.modules() {
            if !module.is_enabled() || !module_visible(module.label()) {
                continue;
            }

            let mut commands: Vec<_> = module
                .commands()
                .iter()
                .filter_map(|id| registry.get(*id))
                .filter(command_visible)
                .collect();

            if commands.is_empty() {
                continue;
            }

            commands.sort_unstable_by(|a, b| a.label().cmp(b.label()));

            let _ = writeln!(content, "__**{}**__", module.label());

            for cmd in commands {
                let _ = writeln!(
                    content,
                    "`{prefix}{}`: {}",
                    cmd.label(),
                    cmd.info.description
                );
            }

            content.push('\n');
        }

        if content.is_empty() {
            content.push_str("There are no commands available");
        } else {
            let _ = write!(
                content,
                "Use `{prefix}help <command>` for more info on a command"
            );
        }

        content
    }

    pub fn render_command(registry: &CommandRegistry, command: &Command, prefix: &str) -> String {
        let mut content = format!("**{prefix}{}**", command.full_label());

        if !command.info.description.is_empty() {
            let _ = write!(content, "\n{}", command.info.description);
        }

        content.push_str("\n\n__Usage__: `");
        content.push_str(prefix);
        content.push_str(command.full_label());

        if let Some(ref usage) = command.info.usage {
            let _ = write!(content, " {usage}");
        }

        content.push('`');

        if let [_, aliases @ ..] = command.aliases() {
            if !aliases.is_empty() {
                content.push_str("\n__Aliases__: ");
                let mut aliases = aliases.iter();

                if let Some(alias) = aliases.next() {
                    let _ = write!(content, "`{alias}`");

                    for alias in aliases {
                        let _ = write!(content, ", `{alias}`");
                    }
                }
            }
        }

        if !command.info.examples.is_empty() {
            content.push_str("\n__Examples__:");

            for example in command.info.examples.iter() {
                let _ = write!(content, "\n`{prefix}{} {example}`", command.full_label());
            }
        }

        let children = registry.children(command);

        if !children.is_empty() {
            content.push_str("\n__Subcommands__:");

            for child in children.into_iter().filter(|c| !c.options.flags.hidden()) {
                let _ = write!(content, "\n`{}`: {}", child.label(), child.info.description);
            }
        }

        content
    }
}

#[async_trait]
impl HelpRenderer for DefaultHelp {
    async fn full_help(&self, env: HelpEnv<'_>) -> Result<()> {
        let content = Self::render_full(env.registry, env.prefix, env.guild_config);

        env.client
            .send_message(env.msg.channel.id, &content)
            .await
            .wrap_err("failed to send full help")?;

        Ok(())
    }

    async fn command_help(&self, env: HelpEnv<'_>, command: &Command) -> Result<()> {
        let content = Self::render_command(env.registry, command, env.prefix);

        env.client
            .send_message(env.msg.channel.id, &content)
            .await
            .wrap_err_with(|| format!("failed to send help for `{}`", command.full_label()))?;

        Ok(())
    }
}
