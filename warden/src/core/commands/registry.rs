use std::collections::{HashMap, HashSet};

use radix_trie::Trie;
use thiserror::Error;
use warden_model::GuildConfig;
use warden_util::CowUtils;

use super::{Command, CommandBuilder, CommandId, Module};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("module `{0}` is already registered")]
    DuplicateModule(Box<str>),
    #[error("unknown module `{0}`")]
    UnknownModule(Box<str>),
    #[error("alias `{alias}` of command `{label}` is already taken")]
    DuplicateAlias { alias: Box<str>, label: Box<str> },
    #[error("invalid label `{0}`; labels must be non-empty and contain no whitespace")]
    InvalidLabel(Box<str>),
}

/// Owns all modules and commands. Commands refer to each other through their [`CommandId`].
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
    modules: Vec<Module>,
    module_indices: HashMap<Box<str>, usize>,
    roots: Trie<String, CommandId>,
}

impl CommandRegistry {
    pub fn register_module(&mut self, module: Module) -> Result<(), RegistryError> {
        if !is_valid_label(module.label()) {
            return Err(RegistryError::InvalidLabel(Box::from(module.label())));
        }

        if self.module_indices.contains_key(module.label()) {
            return Err(RegistryError::DuplicateModule(Box::from(module.label())));
        }

        self.module_indices
            .insert(Box::from(module.label()), self.modules.len());
        self.modules.push(module);

        Ok(())
    }

    /// Registers a top-level command and all of its subcommands.
    ///
    /// Nothing is registered if any label or alias is invalid or already taken.
    pub fn register_command(
        &mut self,
        module: &str,
        builder: CommandBuilder,
    ) -> Result<CommandId, RegistryError> {
        let module_idx = *self
            .module_indices
            .get(module)
            .ok_or_else(|| RegistryError::UnknownModule(Box::from(module)))?;

        validate(&builder)?;

        let mut root_aliases = HashSet::new();

        for alias in labels_of(&builder) {
            if self.roots.get(alias).is_some() || !root_aliases.insert(alias) {
                return Err(RegistryError::DuplicateAlias {
                    alias: Box::from(alias),
                    label: builder.label.clone(),
                });
            }
        }

        let id = self.insert(builder, None, module_idx);
        self.modules[module_idx].commands.push(id);

        let command = &self.commands[id.0];

        for alias in command.aliases() {
            self.roots.insert(alias.to_string(), id);
        }

        Ok(id)
    }

    fn insert(
        &mut self,
        mut builder: CommandBuilder,
        parent: Option<CommandId>,
        module_idx: usize,
    ) -> CommandId {
        let subcommands = std::mem::take(&mut builder.subcommands);
        let id = CommandId(self.commands.len());

        let command = {
            let module = &self.modules[module_idx];
            let parent = parent.map(|parent| (parent, self.commands[parent.0].full_label()));

            Command::new(
                id,
                builder,
                parent,
                module.label(),
                module.defaults,
                &module.permissions,
            )
        };

        self.commands.push(command);

        for subcommand in subcommands {
            let child = self.insert(subcommand, Some(id), module_idx);
            let aliases = self.commands[child.0].aliases().to_vec();

            let children = &mut self.commands[id.0].children;

            for alias in aliases {
                children.insert(alias, child);
            }
        }

        id
    }

    pub fn get(&self, id: CommandId) -> Option<&Command> {
        self.commands.get(id.0)
    }

    /// Looks up a top-level command by one of its aliases, regardless of whether it's enabled.
    pub fn find(&self, alias: &str) -> Option<&Command> {
        self.roots
            .get(alias.cow_to_ascii_lowercase().as_ref())
            .and_then(|id| self.get(*id))
    }

    pub fn module(&self, label: &str) -> Option<&Module> {
        self.module_indices
            .get(label)
            .map(|idx| &self.modules[*idx])
    }

    /// Modules in registration order
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter()
    }

    /// Subcommands of the command, each only once and sorted by label.
    pub fn children<'r>(&'r self, command: &Command) -> Vec<&'r Command> {
        let mut ids: Vec<_> = command.children.values().copied().collect();
        ids.sort_unstable_by_key(|id| id.0);
        ids.dedup();

        let mut children: Vec<_> = ids.into_iter().filter_map(|id| self.get(id)).collect();
        children.sort_unstable_by(|a, b| a.label().cmp(b.label()));

        children
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Resolves the label and descends into subcommands as long as the next argument
    /// names one, removing consumed arguments from `args`.
    ///
    /// Returns `None` if there is no such command or if it, one of its ancestors, or its
    /// module is disabled, be it globally or in the guild.
    pub fn resolve(
        &self,
        label: &str,
        args: &mut Vec<String>,
        guild_config: Option<&GuildConfig>,
    ) -> Option<&Command> {
        let mut command = self.find(label)?;

        while command.has_children() {
            let Some(next) = args.first() else { break };

            let Some(child) = command.children.get(next.cow_to_ascii_lowercase().as_ref()) else {
                break;
            };

            command = self.get(*child)?;
            args.remove(0);
        }

        let module = self.module(command.module())?;

        let module_disabled = !module.is_enabled()
            || guild_config.map_or(false, |config| config.is_module_disabled(module.label()));

        if module_disabled {
            return None;
        }

        let mut curr = Some(command);

        while let Some(cmd) = curr {
            let disabled = !cmd.is_enabled()
                || guild_config.map_or(false, |config| config.is_command_disabled(cmd.full_label()));

            if disabled {
                return None;
            }

            curr = cmd.parent().and_then(|parent| self.get(parent));
        }

        Some(command)
    }
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty() && !label.contains(char::is_whitespace)
}

fn labels_of(builder: &CommandBuilder) -> impl Iterator<Item = &str> {
    let mut seen = HashSet::new();

    std::iter::once(&builder.label)
        .chain(&builder.aliases)
        .map(|label| &**label)
        .filter(move |alias| seen.insert(*alias))
}

/// Checks labels of the builder and, recursively, that siblings don't share aliases.
fn validate(builder: &CommandBuilder) -> Result<(), RegistryError> {
    if let Some(invalid) = labels_of(builder).find(|label| !is_valid_label(label)) {
        return Err(RegistryError::InvalidLabel(Box::from(invalid)));
    }

    let mut sibling_aliases = HashSet::new();

    for subcommand in builder.subcommands.iter() {
        validate(subcommand)?;

        for alias in labels_of(subcommand) {
            if !sibling_aliases.insert(alias) {
                return Err(RegistryError::DuplicateAlias {
                    alias: Box::from(alias),
                    label: subcommand.label.clone(),
                });
            }
        }
    }

    Ok(())
}
