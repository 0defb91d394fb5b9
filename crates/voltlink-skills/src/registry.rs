//! Intent skill trait and registry.
//!
//! Skills are synchronous: one status query is a single blocking evaluation
//! over a telemetry snapshot, so there is nothing to await inside a skill.
//! The dispatcher (gateway) decides how to schedule that blocking work.

use std::sync::Arc;

use tracing::debug;

use voltlink_core::{GeoProvider, ReferenceAddress, SkillError, SkillResult, VehicleApi};

/// Shared request context: the account's vehicles (in account order), the
/// geocoding/routing backend, and the user's home address if configured.
pub struct SkillContext {
    pub vehicles: Vec<Arc<dyn VehicleApi>>,
    pub geo: Arc<dyn GeoProvider>,
    pub home: Option<ReferenceAddress>,
    /// Region abbreviation spoken without a state suffix.
    pub local_region: String,
}

impl SkillContext {
    /// First vehicle on the account, the default target for commands.
    pub fn primary_vehicle(&self) -> SkillResult<&Arc<dyn VehicleApi>> {
        self.vehicles
            .first()
            .ok_or_else(|| SkillError::VehicleApi("no vehicles on account".to_string()))
    }
}

/// One handler for a family of voice intents. Returns the speech text to
/// render, with embedded speech-markup tags where the phrase engine emits them.
pub trait IntentSkill: Send + Sync {
    /// Unique skill identifier, for logging.
    fn name(&self) -> &str;

    /// Whether this skill handles the given intent name.
    fn can_handle(&self, intent: &str) -> bool;

    /// Handle the intent and produce the spoken response.
    fn handle(&self, ctx: &SkillContext, intent: &str) -> SkillResult<String>;
}

/// Ordered skill registry: first skill whose `can_handle` matches wins.
#[derive(Default)]
pub struct SkillRegistry {
    skills: Vec<Arc<dyn IntentSkill>>,
}

impl SkillRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a skill. Registration order is dispatch priority.
    pub fn register(&mut self, skill: Arc<dyn IntentSkill>) {
        self.skills.push(skill);
    }

    /// Dispatch an intent to the first matching skill.
    pub fn dispatch(&self, ctx: &SkillContext, intent: &str) -> SkillResult<String> {
        let skill = self
            .skills
            .iter()
            .find(|s| s.can_handle(intent))
            .ok_or_else(|| SkillError::UnknownIntent(intent.to_string()))?;
        debug!(intent, skill = skill.name(), "dispatching intent");
        skill.handle(ctx, intent)
    }

    /// Names of all registered skills, in dispatch order.
    pub fn list_skills(&self) -> Vec<String> {
        self.skills.iter().map(|s| s.name().to_string()).collect()
    }
}
