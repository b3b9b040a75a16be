use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use async_trait::async_trait;
use eyre::Result;
use parking_lot::Mutex;
use smallvec::smallvec;
use warden_model::{
    marker::{ChannelMarker, GuildMarker, MessageMarker},
    ChannelInfo, GuildConfig, GuildInfo, Id, Member, Message, Permissions, User,
};
use warden_store::{GuildConfigStore, GuildConfigs, MemoryStore};

use crate::{
    core::{
        commands::{CommandBody, CommandEnv, CommandRegistry, Response},
        BotConfig, ChatClient, Dispatcher,
    },
    manager::GuildConfigManager,
};

pub const USER_ID: u64 = 100;
pub const ROLE_ID: u64 = 200;
pub const BOT_ID: u64 = 300;
pub const GUILD_ID: u64 = 400;
pub const GUILD_OWNER_ID: u64 = 500;
pub const CHANNEL_ID: u64 = 600;
pub const MESSAGE_ID: u64 = 700;

fn author() -> User {
    User {
        id: Id::new(USER_ID),
        name: "user".to_owned(),
        bot: false,
    }
}

/// Message of [`USER_ID`] with role [`ROLE_ID`] in the `general` channel of `guild`.
pub fn guild_message(content: &str, permissions: Permissions) -> Message {
    Message {
        id: Id::new(MESSAGE_ID),
        content: content.to_owned(),
        author: author(),
        member: Some(Member {
            roles: smallvec![Id::new(ROLE_ID)],
            permissions,
        }),
        guild: Some(GuildInfo {
            id: Id::new(GUILD_ID),
            name: "guild".to_owned(),
            owner_id: Id::new(GUILD_OWNER_ID),
        }),
        channel: ChannelInfo {
            id: Id::new(CHANNEL_ID),
            name: "general".to_owned(),
        },
        webhook: false,
    }
}

pub fn dm_message(content: &str) -> Message {
    Message {
        id: Id::new(MESSAGE_ID),
        content: content.to_owned(),
        author: author(),
        member: None,
        guild: None,
        channel: ChannelInfo {
            id: Id::new(CHANNEL_ID),
            name: "dm".to_owned(),
        },
        webhook: false,
    }
}

/// Dispatcher with default config and an in-memory store.
pub fn dispatcher(registry: CommandRegistry, client: &Arc<MockClient>) -> Dispatcher {
    let client = Arc::clone(client) as Arc<dyn ChatClient>;
    let guild_configs = GuildConfigManager::new(Arc::new(MemoryStore::default()));

    Dispatcher::new(
        Arc::new(BotConfig::default()),
        Arc::new(registry),
        guild_configs,
        client,
    )
    .unwrap()
}

pub struct Noop;

#[async_trait]
impl CommandBody for Noop {
    async fn execute(&self, _: CommandEnv<'_>) -> Result<Response> {
        Ok(Response::success())
    }
}

/// Records everything instead of talking to a platform.
pub struct MockClient {
    user: User,
    permissions: Mutex<Permissions>,
    next_id: AtomicU64,
    sent: Mutex<Vec<String>>,
    deleted: Mutex<Vec<Id<MessageMarker>>>,
}

impl MockClient {
    pub fn new(permissions: Permissions) -> Self {
        Self {
            user: User {
                id: Id::new(BOT_ID),
                name: "warden".to_owned(),
                bot: true,
            },
            permissions: Mutex::new(permissions),
            next_id: AtomicU64::new(10_000),
            sent: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
        }
    }

    pub fn set_permissions(&self, permissions: Permissions) {
        *self.permissions.lock() = permissions;
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().clone()
    }

    pub fn deleted(&self) -> Vec<Id<MessageMarker>> {
        self.deleted.lock().clone()
    }
}

#[async_trait]
impl ChatClient for MockClient {
    fn current_user(&self) -> &User {
        &self.user
    }

    async fn send_message(
        &self,
        _: Id<ChannelMarker>,
        content: &str,
    ) -> Result<Id<MessageMarker>> {
        self.sent.lock().push(content.to_owned());
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        Ok(Id::new(id))
    }

    async fn delete_message(&self, _: Id<ChannelMarker>, message: Id<MessageMarker>) -> Result<()> {
        self.deleted.lock().push(message);

        Ok(())
    }

    async fn bot_permissions(
        &self,
        _: Id<ChannelMarker>,
        _: Option<Id<GuildMarker>>,
    ) -> Result<Permissions> {
        Ok(*self.permissions.lock())
    }
}

/// A store whose backend is always unreachable.
pub struct FailingStore;

#[async_trait]
impl GuildConfigStore for FailingStore {
    async fn fetch(&self, _: Id<GuildMarker>) -> Result<Option<GuildConfig>> {
        bail!("store unavailable")
    }

    async fn fetch_all(&self) -> Result<GuildConfigs> {
        bail!("store unavailable")
    }

    async fn upsert(&self, _: Id<GuildMarker>, _: &GuildConfig) -> Result<()> {
        bail!("store unavailable")
    }

    async fn delete(&self, _: Id<GuildMarker>) -> Result<bool> {
        bail!("store unavailable")
    }
}
