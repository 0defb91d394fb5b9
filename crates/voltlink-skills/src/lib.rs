//! Intent skills for the voltlink voice assistant.
//!
//! A small registry of handlers over the core phrase engine: the status
//! report skill plus a table-driven command skill. Dispatch is synchronous;
//! the gateway runs it on a blocking task.

mod commands;
mod registry;
mod status;

pub use commands::{find_command, CommandSkill, CommandSpec, COMMAND_TABLE};
pub use registry::{IntentSkill, SkillContext, SkillRegistry};
pub use status::StatusSkill;

use std::sync::Arc;

/// Registry with the default skill set: status first, then commands.
pub fn default_registry() -> SkillRegistry {
    let mut registry = SkillRegistry::new();
    registry.register(Arc::new(StatusSkill));
    registry.register(Arc::new(CommandSkill));
    registry
}
