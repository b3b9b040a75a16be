pub use self::{
    command::{Command, CommandBody, CommandBuilder, CommandEnv, CommandFn, CommandId, CommandInfo},
    context::{CommandError, Context, PendingContext},
    cooldown::{CooldownHit, CooldownTracker},
    help::{DefaultHelp, HelpEnv, HelpRenderer},
    module::Module,
    options::{CommandFlags, CommandOptions, OptionsOverride, DEFAULT_PERMISSION_MESSAGE_TIMEOUT},
    permissions::{
        CommandPermissions, Denial, IdAxis, PermissionAxis, Predicate, ServerRank, StaffAxis,
    },
    registry::{CommandRegistry, RegistryError},
    response::Response,
};

mod command;
mod context;
mod cooldown;
mod help;
mod module;
mod options;
mod permissions;
mod registry;
mod response;
