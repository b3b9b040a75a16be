use crate::core::commands::{CommandRegistry, RegistryError};

pub mod utility;

/// Registers every module of the bot.
pub fn register_all(registry: &mut CommandRegistry) -> Result<(), RegistryError> {
    utility::register(registry)?;

    Ok(())
}
