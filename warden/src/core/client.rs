use async_trait::async_trait;
use eyre::Result;
use warden_model::{
    marker::{ChannelMarker, GuildMarker, MessageMarker},
    Id, Permissions, User,
};

/// The chat platform the bot is connected to.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// The bot's own user.
    fn current_user(&self) -> &User;

    async fn send_message(
        &self,
        channel: Id<ChannelMarker>,
        content: &str,
    ) -> Result<Id<MessageMarker>>;

    async fn delete_message(
        &self,
        channel: Id<ChannelMarker>,
        message: Id<MessageMarker>,
    ) -> Result<()>;

    /// Permissions of the bot within the channel. `guild` is `None` for DMs.
    async fn bot_permissions(
        &self,
        channel: Id<ChannelMarker>,
        guild: Option<Id<GuildMarker>>,
    ) -> Result<Permissions>;
}
