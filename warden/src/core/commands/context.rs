use std::error::Error as StdError;

use eyre::Report;
use serde::{ser::Error as _, Serialize, Serializer};
use thiserror::Error;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use warden_model::{
    marker::{ChannelMarker, GuildMarker, UserMarker},
    ExecutionState, ExecutionType, Id, Message,
};

use super::{Command, Response};

/// Audit record of a single dispatch attempt of a resolved command.
#[derive(Clone, Debug, Serialize)]
pub struct Context {
    pub input: String,
    pub prefix: String,
    /// Full label of the command
    pub command: String,
    pub module: String,
    pub execution_type: ExecutionType,
    pub state: ExecutionState,
    pub help_execution: bool,
    pub dm: bool,
    pub guild_id: Option<Id<GuildMarker>>,
    pub guild_name: Option<String>,
    pub channel_id: Id<ChannelMarker>,
    pub channel_name: String,
    pub caller_id: Id<UserMarker>,
    pub caller_name: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: OffsetDateTime,
    pub executed: bool,
    pub success: bool,
    pub error: Option<String>,
}

fn serialize_timestamp<S: Serializer>(timestamp: &OffsetDateTime, s: S) -> Result<S::Ok, S::Error> {
    let formatted = timestamp.format(&Rfc3339).map_err(S::Error::custom)?;

    s.serialize_str(&formatted)
}

/// A [`Context`] that has yet to learn how the attempt ended.
///
/// Finalizing consumes it so every attempt is finalized at most once.
pub struct PendingContext {
    inner: Context,
}

impl PendingContext {
    pub fn new(
        msg: &Message,
        prefix: &str,
        command: &Command,
        execution_type: ExecutionType,
        help: bool,
    ) -> Self {
        let inner = Context {
            input: msg.content.clone(),
            prefix: prefix.to_owned(),
            command: command.full_label().to_owned(),
            module: command.module().to_owned(),
            execution_type,
            state: ExecutionState::NoError,
            help_execution: help,
            dm: msg.is_dm(),
            guild_id: msg.guild_id(),
            guild_name: msg.guild.as_ref().map(|guild| guild.name.clone()),
            channel_id: msg.channel.id,
            channel_name: msg.channel.name.clone(),
            caller_id: msg.author.id,
            caller_name: msg.author.name.clone(),
            timestamp: OffsetDateTime::now_utc(),
            executed: false,
            success: false,
            error: None,
        };

        Self { inner }
    }

    /// A gate refused the attempt.
    pub fn denied(self, state: ExecutionState) -> Context {
        Context { state, ..self.inner }
    }

    /// Help was shown instead of running the command.
    pub fn help(self) -> Context {
        self.inner
    }

    pub fn executed(self, response: &Response) -> Context {
        Context {
            executed: true,
            success: response.success,
            error: response.error.as_ref().map(|err| format!("{err:#}")),
            ..self.inner
        }
    }

    pub fn errored(self, err: &Report) -> Context {
        Context {
            executed: true,
            success: false,
            error: Some(format!("{err:#}")),
            ..self.inner
        }
    }
}

/// A command body failed unexpectedly.
#[derive(Debug, Error)]
#[error("command `{label}` failed")]
pub struct CommandError {
    pub label: String,
    pub context: Box<Context>,
    #[source]
    pub source: Box<dyn StdError + Send + Sync>,
}

impl CommandError {
    pub fn new(context: Context, source: Report) -> Self {
        Self {
            label: context.command.clone(),
            context: Box::new(context),
            source: source.into(),
        }
    }
}
