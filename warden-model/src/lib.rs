mod execution;
mod guild_config;
mod id;
mod message;
mod permissions;
mod prefixes;

pub use self::{
    execution::{ExecutionState, ExecutionType},
    guild_config::GuildConfig,
    id::{marker, Id},
    message::{ChannelInfo, GuildInfo, Member, Message, User},
    permissions::{ParsePermissionError, Permissions},
    prefixes::{Prefix, Prefixes},
};
