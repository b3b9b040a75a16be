bitflags::bitflags! {
    #[derive(Default)]
    pub struct CommandFlags: u8 {
        const GUILD_ONLY                 = 1 << 0;
        const HIDDEN                     = 1 << 1;
        const DELETE_COMMAND             = 1 << 2;
        const INVALID_USAGE_MESSAGE      = 1 << 3;
        const INVALID_PERMISSION_MESSAGE = 1 << 4;
    }
}

impl CommandFlags {
    pub fn guild_only(self) -> bool {
        self.contains(CommandFlags::GUILD_ONLY)
    }

    pub fn hidden(self) -> bool {
        self.contains(CommandFlags::HIDDEN)
    }

    pub fn delete_command(self) -> bool {
        self.contains(CommandFlags::DELETE_COMMAND)
    }

    pub fn invalid_usage_message(self) -> bool {
        self.contains(CommandFlags::INVALID_USAGE_MESSAGE)
    }

    pub fn invalid_permission_message(self) -> bool {
        self.contains(CommandFlags::INVALID_PERMISSION_MESSAGE)
    }
}

pub const DEFAULT_PERMISSION_MESSAGE_TIMEOUT: u64 = 9000;

/// Static policy of a command, checked before its body runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CommandOptions {
    pub flags: CommandFlags,
    pub args_min: usize,
    /// Milliseconds, 0 disables the cooldown
    pub cooldown: u64,
    /// Milliseconds until a permission denial message is deleted, 0 keeps it
    pub permission_message_timeout: u64,
}

impl Default for CommandOptions {
    fn default() -> Self {
        Self {
            flags: CommandFlags::INVALID_USAGE_MESSAGE | CommandFlags::INVALID_PERMISSION_MESSAGE,
            args_min: 0,
            cooldown: 0,
            permission_message_timeout: DEFAULT_PERMISSION_MESSAGE_TIMEOUT,
        }
    }
}

impl CommandOptions {
    /// Whether the given amount of arguments is too few.
    pub fn lacks_args(&self, args: usize) -> bool {
        args < self.args_min
    }

    /// Whether a usage failure should be answered with the command's help.
    pub fn usage_help(&self) -> bool {
        self.flags.invalid_usage_message() && !self.flags.hidden()
    }
}

/// Options a command sets for itself, everything else is inherited from its module.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct OptionsOverride {
    set: CommandFlags,
    unset: CommandFlags,
    args_min: Option<usize>,
    cooldown: Option<u64>,
    permission_message_timeout: Option<u64>,
}

impl OptionsOverride {
    pub fn set(mut self, flags: CommandFlags) -> Self {
        self.set |= flags;
        self.unset -= flags;

        self
    }

    pub fn unset(mut self, flags: CommandFlags) -> Self {
        self.unset |= flags;
        self.set -= flags;

        self
    }

    pub fn args_min(mut self, args_min: usize) -> Self {
        self.args_min = Some(args_min);

        self
    }

    pub fn cooldown(mut self, ms: u64) -> Self {
        self.cooldown = Some(ms);

        self
    }

    pub fn permission_message_timeout(mut self, ms: u64) -> Self {
        self.permission_message_timeout = Some(ms);

        self
    }

    pub fn apply(self, defaults: CommandOptions) -> CommandOptions {
        CommandOptions {
            flags: (defaults.flags | self.set) - self.unset,
            args_min: self.args_min.unwrap_or(defaults.args_min),
            cooldown: self.cooldown.unwrap_or(defaults.cooldown),
            permission_message_timeout: self
                .permission_message_timeout
                .unwrap_or(defaults.permission_message_timeout),
        }
    }
}
