//! Command store: the registry mapping CLI action names to handler logic and
//! their declared options.

use std::collections::BTreeMap;

use anyhow::{anyhow, bail, Result};
use futures::future::BoxFuture;
use tracing::info;

use crate::project::Project;
use crate::upload::Uploader;

/// Everything a command handler may touch, passed in explicitly at invocation
/// time rather than captured when the command is registered.
#[derive(Clone, Copy)]
pub struct CommandContext<'a> {
    pub project: &'a Project,
    pub uploader: &'a dyn Uploader,
}

/// Parsed option values for one invocation. Each invocation gets its own set;
/// nothing is shared between invocations.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    values: BTreeMap<String, String>,
}

impl CommandOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: &str, value: impl Into<String>) -> Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Value of an option that must be present at this point. Required options
    /// are checked before the handler runs, so a handler reading one of its
    /// own declared required options never sees this fail.
    pub fn value_of(&self, name: &str) -> Result<&str> {
        self.get(name)
            .ok_or_else(|| anyhow!("missing value for option '{name}'"))
    }
}

/// An option declared on a command.
#[derive(Debug, Clone)]
pub struct OptionSpec {
    pub name: String,
    pub required: bool,
}

pub type CommandHandler = Box<
    dyn for<'a> Fn(CommandContext<'a>, &'a CommandOptions) -> BoxFuture<'a, Result<()>>
        + Send
        + Sync,
>;

/// A registered CLI action: handler plus the metadata the surrounding
/// framework displays and enforces.
pub struct Command {
    name: String,
    resource_hint: String,
    help: Option<String>,
    options: Vec<OptionSpec>,
    handler: CommandHandler,
}

impl Command {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resource budget hint, e.g. "16m". Carried through to the invoking
    /// framework untouched; never interpreted here.
    pub fn resource_hint(&self) -> &str {
        &self.resource_hint
    }

    pub fn set_help(&mut self, help: &str) {
        self.help = Some(help.to_string());
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Declares an option the command accepts on invocation.
    pub fn declare_option(&mut self, name: &str, required: bool) {
        self.options.push(OptionSpec {
            name: name.to_string(),
            required,
        });
    }

    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("resource_hint", &self.resource_hint)
            .field("help", &self.help)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Registry of commands, keyed by action name.
#[derive(Debug, Default)]
pub struct CommandStore {
    commands: BTreeMap<String, Command>,
}

impl CommandStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command under the given name. Registering the same name
    /// again replaces the earlier command.
    pub fn add_command(
        &mut self,
        name: &str,
        resource_hint: &str,
        handler: CommandHandler,
    ) -> &mut Command {
        info!(command = name, resource_hint = resource_hint, "Registered command");
        self.commands.insert(
            name.to_string(),
            Command {
                name: name.to_string(),
                resource_hint: resource_hint.to_string(),
                help: None,
                options: Vec::new(),
                handler,
            },
        );
        self.commands
            .get_mut(name)
            .unwrap_or_else(|| unreachable!("command '{name}' inserted above"))
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Invokes a registered command. Declared required options are checked
    /// before the handler runs; a missing one fails the invocation without
    /// touching the handler. Invocations are independent of each other.
    pub async fn invoke(
        &self,
        name: &str,
        ctx: CommandContext<'_>,
        options: &CommandOptions,
    ) -> Result<()> {
        let command = self
            .commands
            .get(name)
            .ok_or_else(|| anyhow!("unknown command '{name}'"))?;

        for option in &command.options {
            if option.required && options.get(&option.name).is_none() {
                bail!(
                    "command '{name}' requires option '{}' but it was not supplied",
                    option.name
                );
            }
        }

        info!(command = name, "Invoking command");
        (command.handler)(ctx, options).await
    }
}
