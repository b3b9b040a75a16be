#[macro_use]
extern crate tracing;

mod database;
mod impls;
mod kind;

pub use self::{
    database::Database,
    impls::{json::JsonStore, memory::MemoryStore},
    kind::{ParseStoreKindError, StoreKind},
};

use std::collections::HashMap;

use async_trait::async_trait;
use eyre::Result;
use warden_model::{marker::GuildMarker, GuildConfig, Id};
use warden_util::IntHasher;

pub type GuildConfigs = HashMap<Id<GuildMarker>, GuildConfig, IntHasher>;

/// Persistence for guild configs.
#[async_trait]
pub trait GuildConfigStore: Send + Sync {
    /// `Ok(None)` if the guild has no stored config yet.
    async fn fetch(&self, guild_id: Id<GuildMarker>) -> Result<Option<GuildConfig>>;

    async fn fetch_all(&self) -> Result<GuildConfigs>;

    async fn upsert(&self, guild_id: Id<GuildMarker>, config: &GuildConfig) -> Result<()>;

    /// Returns whether a config was stored.
    async fn delete(&self, guild_id: Id<GuildMarker>) -> Result<bool>;
}
