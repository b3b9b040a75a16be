use std::fmt::{Display, Formatter, Result as FmtResult};

use warden_model::Message;

use super::commands::{CommandError, Context};

pub use self::message::Dispatcher;

mod message;

/// Emitted by a [`Dispatcher`] that was given an event sender.
#[derive(Debug)]
pub enum DispatchEvent {
    Executed(Context),
    Failed(CommandError),
}

enum EventKind {
    Help,
    PrefixCommand,
}

impl EventKind {
    fn log(self, msg: &Message, name: &str) {
        let location = EventLocation::new(msg);
        let username = msg.author.name.as_str();

        info!("[{location}] {username} {self} `{name}`");
    }
}

impl Display for EventKind {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Help => f.write_str("requested help for"),
            Self::PrefixCommand => f.write_str("used prefix command"),
        }
    }
}

enum EventLocation<'m> {
    Private,
    Guild { guild: &'m str, channel: &'m str },
}

impl<'m> EventLocation<'m> {
    fn new(msg: &'m Message) -> Self {
        match msg.guild {
            Some(ref guild) => Self::Guild {
                guild: &guild.name,
                channel: &msg.channel.name,
            },
            None => Self::Private,
        }
    }
}

impl Display for EventLocation<'_> {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Private => f.write_str("Private"),
            Self::Guild { guild, channel } => write!(f, "{guild}:{channel}"),
        }
    }
}
