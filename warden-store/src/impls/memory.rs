use std::collections::HashMap;

use async_trait::async_trait;
use eyre::Result;
use parking_lot::RwLock;
use warden_model::{marker::GuildMarker, GuildConfig, Id};
use warden_util::IntHasher;

use crate::{GuildConfigStore, GuildConfigs};

/// Keeps configs for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    configs: RwLock<HashMap<Id<GuildMarker>, GuildConfig, IntHasher>>,
}

#[async_trait]
impl GuildConfigStore for MemoryStore {
    async fn fetch(&self, guild_id: Id<GuildMarker>) -> Result<Option<GuildConfig>> {
        Ok(self.configs.read().get(&guild_id).cloned())
    }

    async fn fetch_all(&self) -> Result<GuildConfigs> {
        Ok(self.configs.read().clone())
    }

    async fn upsert(&self, guild_id: Id<GuildMarker>, config: &GuildConfig) -> Result<()> {
        self.configs.write().insert(guild_id, config.clone());

        Ok(())
    }

    async fn delete(&self, guild_id: Id<GuildMarker>) -> Result<bool> {
        Ok(self.configs.write().remove(&guild_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upsert_fetch_delete() {
        let store = MemoryStore::default();
        let guild = Id::new(1);

        assert!(store.fetch(guild).await.unwrap().is_none());

        let mut config = GuildConfig::default();
        config.mod_only = true;
        store.upsert(guild, &config).await.unwrap();

        assert_eq!(store.fetch(guild).await.unwrap(), Some(config));
        assert_eq!(store.fetch_all().await.unwrap().len(), 1);
        assert!(store.delete(guild).await.unwrap());
        assert!(!store.delete(guild).await.unwrap());
    }
}
