pub use self::{
    client::ChatClient,
    config::BotConfig,
    events::{DispatchEvent, Dispatcher},
    ranks::ServerRanks,
    stats::DispatchStats,
};

mod client;
mod config;
mod events;
mod ranks;
mod stats;

pub mod commands;
pub mod logging;
