use std::sync::Arc;

use dashmap::DashMap;
use eyre::{Result, WrapErr};
use warden_model::{marker::GuildMarker, GuildConfig, Id};
use warden_store::GuildConfigStore;
use warden_util::IntHasher;

/// Read-through cache of guild configs in front of their store.
#[derive(Clone)]
pub struct GuildConfigManager {
    cache: Arc<DashMap<Id<GuildMarker>, GuildConfig, IntHasher>>,
    store: Arc<dyn GuildConfigStore>,
}

impl GuildConfigManager {
    pub fn new(store: Arc<dyn GuildConfigStore>) -> Self {
        Self {
            cache: Arc::new(DashMap::with_hasher(IntHasher::default())),
            store,
        }
    }

    /// Fills the cache with all stored configs, returning how many there were.
    pub async fn preload(&self) -> Result<usize> {
        let configs = self
            .store
            .fetch_all()
            .await
            .wrap_err("failed to preload guild configs")?;

        let count = configs.len();

        for (guild_id, config) in configs {
            self.cache.insert(guild_id, config);
        }

        Ok(count)
    }

    /// The guild's config, fetched from the store on first access.
    ///
    /// Guilds without a stored config get the default which is stored right away.
    pub async fn get(&self, guild_id: Id<GuildMarker>) -> Result<GuildConfig> {
        if let Some(config) = self.cache.get(&guild_id) {
            return Ok(config.clone());
        }

        let fetched = self
            .store
            .fetch(guild_id)
            .await
            .wrap_err_with(|| format!("failed to fetch config of guild {guild_id}"))?;

        let config = match fetched {
            Some(config) => config,
            None => {
                let config = GuildConfig::default();

                if let Err(err) = self.store.upsert(guild_id, &config).await {
                    let wrap = format!("failed to insert config of guild {guild_id}");
                    warn!("{:?}", err.wrap_err(wrap));
                }

                config
            }
        };

        // Another task might have been faster in which case its config is kept
        let entry = self.cache.entry(guild_id).or_insert(config);

        Ok(entry.value().clone())
    }

    /// Runs `f` on the guild's config.
    pub async fn peek<F, T>(&self, guild_id: Id<GuildMarker>, f: F) -> Result<T>
    where
        F: FnOnce(&GuildConfig) -> T,
    {
        if let Some(config) = self.cache.get(&guild_id) {
            return Ok(f(config.value()));
        }

        let config = self.get(guild_id).await?;

        Ok(f(&config))
    }

    /// Mutates the guild's config and persists the result.
    pub async fn update<F>(&self, guild_id: Id<GuildMarker>, f: F) -> Result<GuildConfig>
    where
        F: FnOnce(&mut GuildConfig),
    {
        if !self.cache.contains_key(&guild_id) {
            self.get(guild_id).await?;
        }

        let config = {
            let mut entry = self.cache.entry(guild_id).or_default();
            f(entry.value_mut());

            entry.value().clone()
        };

        self.store
            .upsert(guild_id, &config)
            .await
            .wrap_err_with(|| format!("failed to update config of guild {guild_id}"))?;

        Ok(config)
    }

    /// Forgets the guild's config, both cached and stored.
    pub async fn remove(&self, guild_id: Id<GuildMarker>) -> Result<()> {
        self.cache.remove(&guild_id);

        self.store
            .delete(guild_id)
            .await
            .wrap_err_with(|| format!("failed to delete config of guild {guild_id}"))?;

        Ok(())
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use warden_store::MemoryStore;

    use super::*;
    use crate::testing::FailingStore;

    const GUILD: Id<GuildMarker> = Id::new(1);

    #[tokio::test]
    async fn first_contact_stores_default() {
        let store = Arc::new(MemoryStore::default());
        let manager = GuildConfigManager::new(store.clone());

        let config = manager.get(GUILD).await.unwrap();

        assert_eq!(config, GuildConfig::default());
        assert_eq!(store.fetch(GUILD).await.unwrap(), Some(GuildConfig::default()));
        assert_eq!(manager.cached(), 1);
    }

    #[tokio::test]
    async fn update_persists() {
        let store = Arc::new(MemoryStore::default());
        let manager = GuildConfigManager::new(store.clone());

        manager
            .update(GUILD, |config| config.mod_only = true)
            .await
            .unwrap();

        assert!(manager.peek(GUILD, GuildConfig::is_mod_only).await.unwrap());
        assert!(store.fetch(GUILD).await.unwrap().unwrap().mod_only);
    }

    #[tokio::test]
    async fn preload_and_remove() {
        let store = Arc::new(MemoryStore::default());

        let mut config = GuildConfig::default();
        config.mod_only = true;
        store.upsert(GUILD, &config).await.unwrap();

        let manager = GuildConfigManager::new(store.clone());
        assert_eq!(manager.preload().await.unwrap(), 1);
        assert!(manager.get(GUILD).await.unwrap().mod_only);

        manager.remove(GUILD).await.unwrap();
        assert_eq!(manager.cached(), 0);
        assert_eq!(store.fetch(GUILD).await.unwrap(), None);
    }

    #[tokio::test]
    async fn fetch_failure_is_reported() {
        let manager = GuildConfigManager::new(Arc::new(FailingStore));

        assert!(manager.get(GUILD).await.is_err());
        assert_eq!(manager.cached(), 0);
    }
}
