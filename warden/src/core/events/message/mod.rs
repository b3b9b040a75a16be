use std::{error::Error as StdError, fmt::Write, sync::Arc, time::Duration};

use tokio::{sync::mpsc::UnboundedSender, task::JoinHandle, time::sleep};
use warden_model::{ExecutionState, ExecutionType, GuildConfig, Message, Permissions};
use warden_util::{datetime::SecondsLeft, matcher};

use self::parse::{execution_type, find_prefix, Invoke};

use super::{DispatchEvent, EventKind};
use crate::{
    core::{
        commands::{
            Command, CommandEnv, CommandError, CommandRegistry, Context, DefaultHelp, HelpEnv,
            HelpRenderer, PendingContext,
        },
        BotConfig, ChatClient, DispatchStats,
    },
    manager::GuildConfigManager,
};

mod parse;

/// Routes inbound messages to their commands.
#[derive(Clone)]
pub struct Dispatcher {
    config: Arc<BotConfig>,
    registry: Arc<CommandRegistry>,
    guild_configs: GuildConfigManager,
    client: Arc<dyn ChatClient>,
    help: Arc<dyn HelpRenderer>,
    stats: Arc<DispatchStats>,
    events: Option<UnboundedSender<DispatchEvent>>,
}

impl Dispatcher {
    pub fn new(
        config: Arc<BotConfig>,
        registry: Arc<CommandRegistry>,
        guild_configs: GuildConfigManager,
        client: Arc<dyn ChatClient>,
    ) -> eyre::Result<Self> {
        Ok(Self {
            config,
            registry,
            guild_configs,
            client,
            help: Arc::new(DefaultHelp),
            stats: Arc::new(DispatchStats::new()?),
            events: None,
        })
    }

    pub fn with_help(mut self, help: impl HelpRenderer + 'static) -> Self {
        self.help = Arc::new(help);

        self
    }

    /// Every finalized [`Context`] and every [`CommandError`] will be sent through `events`.
    pub fn with_events(mut self, events: UnboundedSender<DispatchEvent>) -> Self {
        self.events = Some(events);

        self
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn guild_configs(&self) -> &GuildConfigManager {
        &self.guild_configs
    }

    pub fn stats(&self) -> &DispatchStats {
        &self.stats
    }

    /// Handles the message without returning anything; outcomes are only logged.
    pub async fn dispatch(&self, msg: &Message) {
        match self.process(msg).await {
            Ok(Some(ctx)) if ctx.help_execution => {
                debug!("Showed help for command `{}`", ctx.command)
            }
            Ok(Some(ctx)) if ctx.executed && ctx.success => {
                info!("Processed command `{}`", ctx.command)
            }
            Ok(Some(ctx)) if ctx.executed => match ctx.error {
                Some(ref err) => info!("Command `{}` was unsuccessful: {err}", ctx.command),
                None => info!("Command `{}` was unsuccessful", ctx.command),
            },
            Ok(Some(ctx)) => info!("Command `{}` was not processed: {}", ctx.command, ctx.state),
            Ok(None) => {}
            Err(err) => {
                error!(
                    "Failed to process prefix command `{}`: {}",
                    err.label,
                    error_chain(&*err.source)
                );

                if let Some(ref events) = self.events {
                    let _ = events.send(DispatchEvent::Failed(err));
                }
            }
        }
    }

    pub fn spawn_dispatch(&self, msg: Message) -> JoinHandle<()> {
        let dispatcher = self.clone();

        tokio::spawn(async move { dispatcher.dispatch(&msg).await })
    }

    /// Handles the message and returns the audit record of the attempt.
    ///
    /// `Ok(None)` means the message was not a command attempt, e.g. because it had no prefix,
    /// or because the guild config could not be retrieved.
    pub async fn process(&self, msg: &Message) -> Result<Option<Context>, CommandError> {
        // Ignore bots and webhooks
        if msg.author.bot || msg.webhook || msg.content.is_empty() {
            return Ok(None);
        }

        let execution_type = execution_type(&msg.content, msg.author.id, &self.config);
        let elevated = execution_type.is_elevated();

        if !elevated && self.config.is_blacklisted_user(msg.author.id) {
            trace!("Ignoring message of blacklisted user {}", msg.author.id);

            return Ok(None);
        }

        let guild_config = match msg.guild_id() {
            Some(guild_id) => match self.guild_configs.get(guild_id).await {
                Ok(config) => {
                    if !elevated && self.config.is_blacklisted_guild(guild_id) {
                        trace!("Ignoring message in blacklisted guild {guild_id}");

                        return Ok(None);
                    }

                    Some(config)
                }
                Err(err) => {
                    error!("{:?}", err.wrap_err("Fatal: failed to retrieve guild config"));

                    return Ok(None);
                }
            },
            None => None,
        };

        let bot_id = self.client.current_user().id;

        let Some(prefix) = find_prefix(
            &msg.content,
            execution_type,
            bot_id,
            guild_config.as_ref(),
            &self.config,
        ) else {
            return Ok(None);
        };

        let content = matcher::normalize_mentions(&msg.content);
        let prefix = matcher::normalize_mentions(prefix);

        if !elevated && guild_config.as_ref().map_or(false, |config| config.is_ignored(msg)) {
            trace!("Ignoring message of {} in channel {}", msg.author.id, msg.channel.id);

            return Ok(None);
        }

        let Some(input) = content.strip_prefix(&*prefix) else {
            return Ok(None);
        };

        let (label, mut args, help) = match Invoke::parse(input) {
            Some(Invoke::Command { label, args, help }) => (label, args, help),
            Some(Invoke::FullHelp) => {
                EventKind::Help.log(msg, "help");

                let env = HelpEnv {
                    msg,
                    prefix: &prefix,
                    registry: &self.registry,
                    guild_config: guild_config.as_ref(),
                    client: &*self.client,
                };

                if let Err(err) = self.help.full_help(env).await {
                    warn!("{:?}", err.wrap_err("Failed to show full help"));
                }

                return Ok(None);
            }
            None => return Ok(None),
        };

        let Some(command) = self.registry.resolve(&label, &mut args, guild_config.as_ref()) else {
            trace!("No available command for label `{label}`");

            return Ok(None);
        };

        let pending = PendingContext::new(msg, &prefix, command, execution_type, help);

        if help {
            EventKind::Help.log(msg, command.full_label());

            let env = HelpEnv {
                msg,
                prefix: &prefix,
                registry: &self.registry,
                guild_config: guild_config.as_ref(),
                client: &*self.client,
            };

            if let Err(err) = self.help.command_help(env, command).await {
                warn!("{:?}", err.wrap_err("Failed to show command help"));
            }

            return Ok(Some(self.finish(pending.help())));
        }

        EventKind::PrefixCommand.log(msg, command.full_label());
        self.stats.increment_command(command.full_label());

        let invoke = Invocation {
            msg,
            prefix: &prefix,
            command,
            args,
            execution_type,
            guild_config,
        };

        self.process_command(invoke, pending).await
    }

    /// Runs the gates of the command in order and executes it if all pass.
    async fn process_command(
        &self,
        invoke: Invocation<'_>,
        pending: PendingContext,
    ) -> Result<Option<Context>, CommandError> {
        let Invocation {
            msg,
            prefix,
            command,
            args,
            execution_type,
            guild_config,
        } = invoke;

        let options = &command.options;
        let elevated = execution_type.is_elevated();
        let user = msg.author.id;

        // Only in guilds?
        if options.flags.guild_only() && msg.is_dm() {
            debug!("Command `{}` is only available in guilds", command.full_label());

            return Ok(None);
        }

        // Enough arguments? Commands without usage help handle it themselves.
        if options.lacks_args(args.len()) && options.usage_help() {
            let env = HelpEnv {
                msg,
                prefix,
                registry: &self.registry,
                guild_config: guild_config.as_ref(),
                client: &*self.client,
            };

            if let Err(err) = self.help.command_help(env, command).await {
                warn!("{:?}", err.wrap_err("Failed to show usage help"));
            }

            return Ok(Some(self.finish(pending.denied(ExecutionState::InvalidUsage))));
        }

        // Does the bot have sufficient permissions?
        let bot_permissions = match self
            .client
            .bot_permissions(msg.channel.id, msg.guild_id())
            .await
        {
            Ok(permissions) => permissions,
            Err(err) => {
                warn!("{:?}", err.wrap_err("Failed to get bot permissions"));

                Permissions::empty()
            }
        };

        let can_send = bot_permissions.contains(Permissions::SEND_MESSAGES)
            || bot_permissions.contains(Permissions::ADMINISTRATOR);

        if let Err(missing) = command.permissions.has_bot_permissions(bot_permissions) {
            if options.flags.invalid_permission_message() && can_send {
                let content = format!("I lack the following permissions: {missing}");
                self.send_denial(msg, &content, options.permission_message_timeout)
                    .await;
            }

            let state = ExecutionState::InvalidPermissionsBot;

            return Ok(Some(self.finish(pending.denied(state))));
        }

        // Is the caller allowed to use it?
        if !elevated {
            let denial = command.permissions.can_execute(
                msg,
                guild_config.as_ref(),
                &self.config,
            );

            if let Err(denial) = denial {
                if options.flags.invalid_permission_message() && can_send {
                    let content = match denial.reason {
                        Some(reason) => {
                            format!("You lack the `{reason}` permission to use this command.")
                        }
                        None => "You are not allowed to use this command.".to_owned(),
                    };

                    self.send_denial(msg, &content, options.permission_message_timeout)
                        .await;
                }

                let state = ExecutionState::InvalidPermissionsUser;

                return Ok(Some(self.finish(pending.denied(state))));
            }
        }

        // On cooldown?
        if !elevated {
            if let Err(hit) = command.cooldown.acquire(user) {
                trace!(
                    "Cooldown of user {user} on `{}` for {:?}",
                    command.full_label(),
                    hit.remaining
                );

                if hit.notify && can_send {
                    let content = format!(
                        "Please wait {}s before using `{}` again.",
                        SecondsLeft(hit.remaining.as_millis() as u64),
                        command.full_label()
                    );

                    self.send_denial(msg, &content, 0).await;
                }

                return Ok(Some(self.finish(pending.denied(ExecutionState::Cooldown))));
            }
        }

        if options.flags.delete_command() {
            if let Err(err) = self.client.delete_message(msg.channel.id, msg.id).await {
                warn!("{:?}", err.wrap_err("Failed to delete command message"));
            }
        }

        let env = CommandEnv {
            msg,
            args: &args,
            prefix,
            command,
            execution_type,
            guild_config: guild_config.as_ref(),
            client: &*self.client,
            guild_configs: &self.guild_configs,
            config: &self.config,
        };

        match command.execute(env).await {
            Ok(response) => {
                if !elevated {
                    if response.trigger_cooldown {
                        command.cooldown.set_cooldown(user);
                    } else {
                        command.cooldown.release(user);
                    }
                }

                Ok(Some(self.finish(pending.executed(&response))))
            }
            Err(err) => {
                if !elevated {
                    command.cooldown.set_cooldown(user);
                }

                let ctx = pending.errored(&err);
                self.stats.increment_outcome(ctx.state);

                Err(CommandError::new(ctx, err))
            }
        }
    }

    fn finish(&self, ctx: Context) -> Context {
        self.stats.increment_outcome(ctx.state);

        if let Some(ref events) = self.events {
            let _ = events.send(DispatchEvent::Executed(ctx.clone()));
        }

        ctx
    }

    /// Sends the content and deletes it again after `timeout` milliseconds unless it's 0.
    async fn send_denial(&self, msg: &Message, content: &str, timeout: u64) {
        let channel = msg.channel.id;

        let sent = match self.client.send_message(channel, content).await {
            Ok(id) => id,
            Err(err) => {
                warn!("{:?}", err.wrap_err("Failed to send denial message"));

                return;
            }
        };

        if timeout == 0 {
            return;
        }

        let client = Arc::clone(&self.client);

        tokio::spawn(async move {
            sleep(Duration::from_millis(timeout)).await;

            if let Err(err) = client.delete_message(channel, sent).await {
                warn!("{:?}", err.wrap_err("Failed to delete denial message"));
            }
        });
    }
}

struct Invocation<'m> {
    msg: &'m Message,
    prefix: &'m str,
    command: &'m Command,
    args: Vec<String>,
    execution_type: ExecutionType,
    guild_config: Option<GuildConfig>,
}

fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut chain = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        let _ = write!(chain, ": {cause}");
        source = cause.source();
    }

    chain
}
