//! Commands bound to dialog view-models

use std::fmt;
use std::sync::{Arc, OnceLock};

type Action = Arc<dyn Fn() + Send + Sync>;
type Predicate = Arc<dyn Fn() -> bool + Send + Sync>;

/// An executable action with an optional guard.
///
/// Cloning a command shares the same action.
#[derive(Clone)]
pub struct Command {
    execute: Action,
    can_execute: Option<Predicate>,
}

impl Command {
    pub fn new(execute: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            execute: Arc::new(execute),
            can_execute: None,
        }
    }

    pub fn with_can_execute(mut self, can_execute: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.can_execute = Some(Arc::new(can_execute));
        self
    }

    pub fn can_execute(&self) -> bool {
        self.can_execute.as_ref().map_or(true, |predicate| predicate())
    }

    /// Run the action if the guard allows it. Returns whether it ran.
    pub fn execute(&self) -> bool {
        if !self.can_execute() {
            return false;
        }
        (self.execute)();
        true
    }

    /// Whether two handles share the same action
    pub fn ptr_eq(&self, other: &Command) -> bool {
        Arc::ptr_eq(&self.execute, &other.execute)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("guarded", &self.can_execute.is_some())
            .finish()
    }
}

/// Write-once slot holding a view-model's close command
#[derive(Debug, Default)]
pub struct CloseCommandSlot {
    command: OnceLock<Command>,
}

impl CloseCommandSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&Command> {
        self.command.get()
    }

    pub fn is_set(&self) -> bool {
        self.command.get().is_some()
    }

    /// Store `command` if the slot is empty. Returns whether it was stored.
    pub fn set_if_unset(&self, command: Command) -> bool {
        self.command.set(command).is_ok()
    }

    /// Execute the stored command, if any
    pub fn execute(&self) -> bool {
        self.command.get().is_some_and(Command::execute)
    }
}
