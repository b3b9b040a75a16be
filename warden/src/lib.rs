#[macro_use]
extern crate tracing;

#[macro_use]
extern crate eyre;

pub mod commands;
pub mod core;
pub mod manager;

#[cfg(test)]
mod testing;

pub use self::{
    core::{
        commands::{
            Command, CommandBody, CommandEnv, CommandError, CommandRegistry, Context, Module,
            Response,
        },
        BotConfig, ChatClient, DispatchEvent, Dispatcher,
    },
    manager::GuildConfigManager,
};
