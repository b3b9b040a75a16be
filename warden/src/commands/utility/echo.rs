use async_trait::async_trait;
use eyre::Result;

use crate::core::commands::{CommandBody, CommandEnv, Response};

pub struct Echo;

#[async_trait]
impl CommandBody for Echo {
    async fn execute(&self, env: CommandEnv<'_>) -> Result<Response> {
        let content = env.args.join(" ");
        env.reply(&content).await?;

        Ok(Response::success())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use warden_model::{ExecutionState, Permissions};

    use crate::{
        commands::utility,
        core::commands::CommandRegistry,
        testing::{dispatcher, dm_message, MockClient},
    };

    #[tokio::test]
    async fn repeats_args() {
        let mut registry = CommandRegistry::default();
        utility::register(&mut registry).unwrap();

        let client = Arc::new(MockClient::new(Permissions::SEND_MESSAGES));
        let dispatcher = dispatcher(registry, &client);

        let ctx = dispatcher
            .process(&dm_message("!say   hello    there"))
            .await
            .unwrap()
            .unwrap();

        assert!(ctx.success);
        assert!(ctx.dm);
        assert_eq!(client.sent(), ["hello there"]);

        let ctx = dispatcher
            .process(&dm_message("!echo again"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(ctx.state, ExecutionState::Cooldown);
    }
}
