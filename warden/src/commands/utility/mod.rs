use crate::core::commands::{
    Command, CommandFn, CommandRegistry, Module, OptionsOverride, RegistryError,
};

pub use self::{echo::Echo, ping::ping, prefix::*};

mod echo;
mod ping;
mod prefix;

pub const MODULE: &str = "utility";

pub fn register(registry: &mut CommandRegistry) -> Result<(), RegistryError> {
    let module = Module::new(MODULE).description("General purpose commands");
    registry.register_module(module)?;

    let ping = Command::builder("ping", ping as CommandFn)
        .alias("p")
        .description("Check if the bot is online");

    registry.register_command(MODULE, ping)?;

    let echo = Command::builder("echo", Echo)
        .alias("say")
        .description("Repeat the given text")
        .usage("<text>")
        .example("hello there")
        .options(OptionsOverride::default().args_min(1).cooldown(3000));

    registry.register_command(MODULE, echo)?;
    registry.register_command(MODULE, prefix::command())?;

    Ok(())
}
