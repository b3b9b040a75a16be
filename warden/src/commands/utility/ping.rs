use eyre::Result;
use futures::future::BoxFuture;
use tokio::time::Instant;

use crate::core::commands::{CommandEnv, Response};

pub fn ping(env: CommandEnv<'_>) -> BoxFuture<'_, Result<Response>> {
    Box::pin(async move {
        let start = Instant::now();
        env.reply(":ping_pong: Pong!").await?;
        let elapsed = start.elapsed().as_millis();

        debug!("Pong took {elapsed}ms");

        Ok(Response::success())
    })
}
