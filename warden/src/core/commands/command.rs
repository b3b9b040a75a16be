use std::{
    collections::HashMap,
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use eyre::Result;
use futures::future::BoxFuture;
use warden_model::{marker::MessageMarker, ExecutionType, GuildConfig, Id, Message};

use super::{CommandOptions, CommandPermissions, CooldownTracker, OptionsOverride, Response};
use crate::{
    core::{BotConfig, ChatClient},
    manager::GuildConfigManager,
};

/// Index of a command within its [`CommandRegistry`](super::CommandRegistry).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CommandId(pub(super) usize);

/// Everything a command body gets to work with.
pub struct CommandEnv<'a> {
    pub msg: &'a Message,
    pub args: &'a [String],
    pub prefix: &'a str,
    pub command: &'a Command,
    pub execution_type: ExecutionType,
    pub guild_config: Option<&'a GuildConfig>,
    pub client: &'a dyn ChatClient,
    pub guild_configs: &'a GuildConfigManager,
    pub config: &'a BotConfig,
}

impl CommandEnv<'_> {
    /// Send a message into the channel of the invoking message.
    pub async fn reply(&self, content: &str) -> Result<Id<MessageMarker>> {
        self.client.send_message(self.msg.channel.id, content).await
    }
}

#[async_trait]
pub trait CommandBody: Send + Sync {
    async fn execute(&self, env: CommandEnv<'_>) -> Result<Response>;
}

pub type CommandFn = for<'a> fn(CommandEnv<'a>) -> BoxFuture<'a, Result<Response>>;

#[async_trait]
impl CommandBody for CommandFn {
    async fn execute(&self, env: CommandEnv<'_>) -> Result<Response> {
        (*self)(env).await
    }
}

#[derive(Clone, Debug, Default)]
pub struct CommandInfo {
    pub description: Box<str>,
    /// Arguments without prefix and label, e.g. `<user> [reason]`
    pub usage: Option<Box<str>>,
    /// Arguments of example invocations
    pub examples: Vec<Box<str>>,
}

pub struct Command {
    pub(super) id: CommandId,
    label: Box<str>,
    aliases: Vec<Box<str>>,
    full_label: Box<str>,
    module: Box<str>,
    pub(super) parent: Option<CommandId>,
    /// Alias table of subcommands
    pub(super) children: HashMap<Box<str>, CommandId>,
    enabled: AtomicBool,
    pub info: CommandInfo,
    pub options: CommandOptions,
    pub permissions: CommandPermissions,
    pub cooldown: CooldownTracker,
    body: Box<dyn CommandBody>,
}

impl Command {
    pub fn builder(label: &str, body: impl CommandBody + 'static) -> CommandBuilder {
        CommandBuilder {
            label: label.to_ascii_lowercase().into_boxed_str(),
            aliases: Vec::new(),
            info: CommandInfo::default(),
            options: OptionsOverride::default(),
            permissions: None,
            enabled: true,
            body: Box::new(body),
            subcommands: Vec::new(),
        }
    }

    pub fn id(&self) -> CommandId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Always includes the label itself.
    pub fn aliases(&self) -> &[Box<str>] {
        &self.aliases
    }

    /// Labels of all ancestors and this command, joined by a space.
    pub fn full_label(&self) -> &str {
        &self.full_label
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn parent(&self) -> Option<CommandId> {
        self.parent
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }

    pub async fn execute(&self, env: CommandEnv<'_>) -> Result<Response> {
        self.body.execute(env).await
    }

    /// `builder` must have its subcommands taken out already.
    pub(super) fn new(
        id: CommandId,
        builder: CommandBuilder,
        parent: Option<(CommandId, &str)>,
        module: &str,
        defaults: CommandOptions,
        default_permissions: &CommandPermissions,
    ) -> Self {
        let CommandBuilder {
            label,
            aliases: extra_aliases,
            info,
            options,
            permissions,
            enabled,
            body,
            subcommands: _,
        } = builder;

        let full_label = match parent {
            Some((_, parent_label)) => format!("{parent_label} {label}"),
            None => label.to_string(),
        };

        let mut aliases = vec![label.clone()];

        for alias in extra_aliases {
            if !aliases.contains(&alias) {
                aliases.push(alias);
            }
        }

        let options = options.apply(defaults);

        Self {
            id,
            label,
            aliases,
            full_label: full_label.into_boxed_str(),
            module: Box::from(module),
            parent: parent.map(|(id, _)| id),
            children: HashMap::new(),
            enabled: AtomicBool::new(enabled),
            info,
            options,
            permissions: permissions.unwrap_or_else(|| default_permissions.clone()),
            cooldown: CooldownTracker::new(options.cooldown),
            body,
        }
    }
}

impl Debug for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Command")
            .field("id", &self.id)
            .field("full_label", &self.full_label)
            .field("aliases", &self.aliases)
            .field("module", &self.module)
            .field("enabled", &self.is_enabled())
            .field("options", &self.options)
            .finish()
    }
}

/// A command that is yet to be registered.
pub struct CommandBuilder {
    pub(super) label: Box<str>,
    pub(super) aliases: Vec<Box<str>>,
    info: CommandInfo,
    options: OptionsOverride,
    permissions: Option<CommandPermissions>,
    enabled: bool,
    body: Box<dyn CommandBody>,
    pub(super) subcommands: Vec<CommandBuilder>,
}

impl CommandBuilder {
    pub fn alias(mut self, alias: &str) -> Self {
        self.aliases
            .push(alias.to_ascii_lowercase().into_boxed_str());

        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.info.description = Box::from(description);

        self
    }

    pub fn usage(mut self, usage: &str) -> Self {
        self.info.usage = Some(Box::from(usage));

        self
    }

    pub fn example(mut self, example: &str) -> Self {
        self.info.examples.push(Box::from(example));

        self
    }

    pub fn options(mut self, options: OptionsOverride) -> Self {
        self.options = options;

        self
    }

    /// Replaces the module's default permissions as a whole.
    pub fn permissions(mut self, permissions: CommandPermissions) -> Self {
        self.permissions = Some(permissions);

        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;

        self
    }

    pub fn subcommand(mut self, subcommand: CommandBuilder) -> Self {
        self.subcommands.push(subcommand);

        self
    }
}
