use std::{
    collections::BTreeMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use eyre::{Result, WrapErr};
use tokio::{fs, sync::Mutex};
use warden_model::{marker::GuildMarker, GuildConfig, Id};

use crate::{GuildConfigStore, GuildConfigs};

type JsonConfigs = BTreeMap<Id<GuildMarker>, GuildConfig>;

/// Persists all configs into a single json file.
///
/// The file is read on first access and rewritten on every change.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    configs: Mutex<Option<JsonConfigs>>,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            configs: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(path: &Path) -> Result<JsonConfigs> {
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No guild config file yet");

                return Ok(JsonConfigs::new());
            }
            Err(err) => {
                return Err(err).wrap_err_with(|| format!("failed to read `{}`", path.display()))
            }
        };

        let configs = serde_json::from_slice(&bytes)
            .wrap_err_with(|| format!("failed to deserialize `{}`", path.display()))?;

        Ok(configs)
    }

    /// Loads the configs into `slot` unless they already are.
    async fn loaded<'s>(
        path: &Path,
        slot: &'s mut Option<JsonConfigs>,
    ) -> Result<&'s mut JsonConfigs> {
        let configs = match slot.take() {
            Some(configs) => configs,
            None => Self::load(path).await?,
        };

        Ok(slot.insert(configs))
    }

    async fn persist(&self, configs: &JsonConfigs) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(configs).wrap_err("failed to serialize configs")?;

        // Write to a sibling first so a crash never leaves a truncated file behind
        let tmp = self.path.with_extension("json.tmp");

        fs::write(&tmp, bytes)
            .await
            .wrap_err_with(|| format!("failed to write `{}`", tmp.display()))?;

        fs::rename(&tmp, &self.path)
            .await
            .wrap_err_with(|| format!("failed to replace `{}`", self.path.display()))
    }

    /// Runs `f` on the loaded configs, loading them first if necessary.
    async fn with_configs<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut JsonConfigs) -> T,
    {
        let mut guard = self.configs.lock().await;

        let configs = Self::loaded(&self.path, &mut guard).await?;

        Ok(f(configs))
    }
}

#[async_trait]
impl GuildConfigStore for JsonStore {
    async fn fetch(&self, guild_id: Id<GuildMarker>) -> Result<Option<GuildConfig>> {
        self.with_configs(|configs| configs.get(&guild_id).cloned())
            .await
    }

    async fn fetch_all(&self) -> Result<GuildConfigs> {
        self.with_configs(|configs| {
            configs
                .iter()
                .map(|(guild_id, config)| (*guild_id, config.clone()))
                .collect()
        })
        .await
    }

    async fn upsert(&self, guild_id: Id<GuildMarker>, config: &GuildConfig) -> Result<()> {
        let mut guard = self.configs.lock().await;

        let configs = Self::loaded(&self.path, &mut guard).await?;

        // Only swap in the new state once it's on disk
        let mut updated = configs.clone();
        updated.insert(guild_id, config.clone());

        self.persist(&updated)
            .await
            .wrap_err_with(|| format!("failed to upsert config of guild {guild_id}"))?;

        *configs = updated;

        Ok(())
    }

    async fn delete(&self, guild_id: Id<GuildMarker>) -> Result<bool> {
        let mut guard = self.configs.lock().await;

        let configs = Self::loaded(&self.path, &mut guard).await?;

        if !configs.contains_key(&guild_id) {
            return Ok(false);
        }

        let mut updated = configs.clone();
        updated.remove(&guild_id);

        self.persist(&updated)
            .await
            .wrap_err_with(|| format!("failed to delete config of guild {guild_id}"))?;

        *configs = updated;

        Ok(true)
    }
}
