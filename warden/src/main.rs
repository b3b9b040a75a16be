#[macro_use]
extern crate tracing;

use std::{
    io::ErrorKind as IoErrorKind,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use eyre::{Result, WrapErr};
use tokio::{
    io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader},
    runtime::Builder as RuntimeBuilder,
    signal,
    sync::mpsc::{self, UnboundedReceiver},
};
use warden::{
    commands,
    core::{commands::CommandRegistry, logging},
    BotConfig, ChatClient, DispatchEvent, Dispatcher, GuildConfigManager,
};
use warden_model::{
    marker::{ChannelMarker, GuildMarker, MessageMarker, UserMarker},
    ChannelInfo, GuildInfo, Id, Member, Message, Permissions, User,
};
use warden_store::Database;

const CONSOLE_USER: Id<UserMarker> = Id::new(1);
const CONSOLE_GUILD: Id<GuildMarker> = Id::new(1);
const CONSOLE_CHANNEL: Id<ChannelMarker> = Id::new(1);
const BOT_USER: u64 = 2;

fn main() {
    let dotenv_res = dotenvy::dotenv();
    let _log_worker_guard = logging::init();

    match dotenv_res {
        Ok(_) => {}
        Err(dotenvy::Error::Io(err)) if err.kind() == IoErrorKind::NotFound => {
            debug!("No .env file found");
        }
        Err(err) => {
            error!(?err, "Failed to prepare .env variables");

            return;
        }
    }

    let runtime = match RuntimeBuilder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(err) => {
            error!(?err, "Could not build runtime");

            return;
        }
    };

    if let Err(source) = runtime.block_on(async_main()) {
        error!(?source, "Critical error in main");
    }
}

async fn async_main() -> Result<()> {
    let config = BotConfig::from_env().wrap_err("failed to initialize config")?;

    let store = Database::new(config.store, config.store_path.clone())
        .wrap_err("failed to create guild config store")?;

    info!("Using {} store", store.kind());

    let guild_configs = GuildConfigManager::new(Arc::new(store));

    let count = guild_configs
        .preload()
        .await
        .wrap_err("failed to preload guild configs")?;

    info!("Loaded {count} guild configs");

    let mut registry = CommandRegistry::default();
    commands::register_all(&mut registry).wrap_err("failed to register commands")?;

    info!("Registered {} commands", registry.len());

    let (event_tx, event_rx) = mpsc::unbounded_channel();

    let dispatcher = Dispatcher::new(
        Arc::new(config),
        Arc::new(registry),
        guild_configs,
        Arc::new(ConsoleClient::new()),
    )
    .wrap_err("failed to create dispatcher")?
    .with_events(event_tx);

    tokio::spawn(audit_loop(event_rx));

    tokio::select! {
        res = console_loop(&dispatcher) => match res {
            Ok(_) => info!("Reached end of input"),
            Err(err) => error!(?err, "Console loop failed"),
        },
        res = signal::ctrl_c() => match res {
            Ok(_) => info!("Received Ctrl+C"),
            Err(err) => error!(?err, "Failed to await Ctrl+C"),
        }
    }

    Ok(())
}

/// Treats every line of stdin as a message of the console user.
async fn console_loop(dispatcher: &Dispatcher) -> Result<()> {
    let mut lines = BufReader::new(io::stdin()).lines();
    let mut message_id = 1;

    while let Some(line) = lines.next_line().await.wrap_err("failed to read stdin")? {
        let msg = console_message(Id::new(message_id), line);
        message_id += 1;

        dispatcher.dispatch(&msg).await;
    }

    Ok(())
}

fn console_message(id: Id<MessageMarker>, content: String) -> Message {
    Message {
        id,
        content,
        author: User {
            id: CONSOLE_USER,
            name: "console".to_owned(),
            bot: false,
        },
        member: Some(Member {
            roles: Default::default(),
            permissions: Permissions::ADMINISTRATOR,
        }),
        guild: Some(GuildInfo {
            id: CONSOLE_GUILD,
            name: "console".to_owned(),
            owner_id: CONSOLE_USER,
        }),
        channel: ChannelInfo {
            id: CONSOLE_CHANNEL,
            name: "stdin".to_owned(),
        },
        webhook: false,
    }
}

async fn audit_loop(mut events: UnboundedReceiver<DispatchEvent>) {
    while let Some(event) = events.recv().await {
        let ctx = match event {
            DispatchEvent::Executed(ctx) => ctx,
            DispatchEvent::Failed(err) => *err.context,
        };

        match serde_json::to_string(&ctx) {
            Ok(json) => trace!(target: "warden::audit", "{json}"),
            Err(err) => warn!(?err, "Failed to serialize context"),
        }
    }
}

/// Prints messages to stdout.
struct ConsoleClient {
    user: User,
    next_id: AtomicU64,
}

impl ConsoleClient {
    fn new() -> Self {
        Self {
            user: User {
                id: Id::new(BOT_USER),
                name: "warden".to_owned(),
                bot: true,
            },
            next_id: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl ChatClient for ConsoleClient {
    fn current_user(&self) -> &User {
        &self.user
    }

    async fn send_message(
        &self,
        _: Id<ChannelMarker>,
        content: &str,
    ) -> Result<Id<MessageMarker>> {
        let mut stdout = io::stdout();

        stdout
            .write_all(format!("{content}\n").as_bytes())
            .await
            .wrap_err("failed to write to stdout")?;

        stdout.flush().await.wrap_err("failed to flush stdout")?;

        Ok(Id::new(self.next_id.fetch_add(1, Ordering::Relaxed)))
    }

    async fn delete_message(
        &self,
        _: Id<ChannelMarker>,
        message: Id<MessageMarker>,
    ) -> Result<()> {
        debug!("Deleted message {message}");

        Ok(())
    }

    async fn bot_permissions(
        &self,
        _: Id<ChannelMarker>,
        _: Option<Id<GuildMarker>>,
    ) -> Result<Permissions> {
        Ok(Permissions::all())
    }
}
