use std::sync::atomic::{AtomicBool, Ordering};

use super::{CommandId, CommandOptions, CommandPermissions};

/// Named group of commands that supplies their default options and permissions.
#[derive(Debug)]
pub struct Module {
    label: Box<str>,
    pub description: Box<str>,
    pub defaults: CommandOptions,
    pub permissions: CommandPermissions,
    enabled: AtomicBool,
    pub(super) commands: Vec<CommandId>,
}

impl Module {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_ascii_lowercase().into_boxed_str(),
            description: Box::default(),
            defaults: CommandOptions::default(),
            permissions: CommandPermissions::default(),
            enabled: AtomicBool::new(true),
            commands: Vec::new(),
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Box::from(description);

        self
    }

    pub fn defaults(mut self, defaults: CommandOptions) -> Self {
        self.defaults = defaults;

        self
    }

    pub fn permissions(mut self, permissions: CommandPermissions) -> Self {
        self.permissions = permissions;

        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Top-level commands in registration order
    pub fn commands(&self) -> &[CommandId] {
        &self.commands
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }
}
