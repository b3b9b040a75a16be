use std::path::PathBuf;

use async_trait::async_trait;
use eyre::{Result, WrapErr};
use warden_model::{marker::GuildMarker, GuildConfig, Id};

use crate::{GuildConfigStore, GuildConfigs, JsonStore, MemoryStore, StoreKind};

/// The store backend selected at startup.
#[derive(Debug)]
pub enum Database {
    Memory(MemoryStore),
    Json(JsonStore),
}

impl Database {
    /// `path` is required for [`StoreKind::Json`].
    pub fn new(kind: StoreKind, path: Option<PathBuf>) -> Result<Self> {
        match kind {
            StoreKind::Memory => Ok(Self::Memory(MemoryStore::default())),
            StoreKind::Json => {
                let path = path
                    .ok_or_else(|| eyre::eyre!("json store requires a file path"))
                    .wrap_err("failed to create database")?;

                Ok(Self::Json(JsonStore::new(path)))
            }
        }
    }

    pub fn kind(&self) -> StoreKind {
        match self {
            Self::Memory(_) => StoreKind::Memory,
            Self::Json(_) => StoreKind::Json,
        }
    }
}

#[async_trait]
impl GuildConfigStore for Database {
    async fn fetch(&self, guild_id: Id<GuildMarker>) -> Result<Option<GuildConfig>> {
        match self {
            Self::Memory(store) => store.fetch(guild_id).await,
            Self::Json(store) => store.fetch(guild_id).await,
        }
    }

    async fn fetch_all(&self) -> Result<GuildConfigs> {
        match self {
            Self::Memory(store) => store.fetch_all().await,
            Self::Json(store) => store.fetch_all().await,
        }
    }

    async fn upsert(&self, guild_id: Id<GuildMarker>, config: &GuildConfig) -> Result<()> {
        match self {
            Self::Memory(store) => store.upsert(guild_id, config).await,
            Self::Json(store) => store.upsert(guild_id, config).await,
        }
    }

    async fn delete(&self, guild_id: Id<GuildMarker>) -> Result<bool> {
        match self {
            Self::Memory(store) => store.delete(guild_id).await,
            Self::Json(store) => store.delete(guild_id).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_requires_path() {
        assert!(Database::new(StoreKind::Json, None).is_err());

        let db = Database::new(StoreKind::Memory, None).unwrap();
        assert_eq!(db.kind(), StoreKind::Memory);
    }
}
