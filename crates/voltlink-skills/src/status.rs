//! Status skill: spoken state report for every vehicle on the account.

use voltlink_core::{status_phrase, SkillResult};

use crate::registry::{IntentSkill, SkillContext};

/// Handles the launch request and the explicit status intent. One status
/// phrase per vehicle, in account order, joined with a single space.
pub struct StatusSkill;

impl IntentSkill for StatusSkill {
    fn name(&self) -> &str {
        "GetStatus"
    }

    fn can_handle(&self, intent: &str) -> bool {
        intent == "GetStatus" || intent == "LaunchRequest"
    }

    fn handle(&self, ctx: &SkillContext, _intent: &str) -> SkillResult<String> {
        let mut sentences = Vec::with_capacity(ctx.vehicles.len());
        for car in &ctx.vehicles {
            sentences.push(status_phrase(
                car.as_ref(),
                ctx.geo.as_ref(),
                ctx.home.as_ref(),
                &ctx.local_region,
            )?);
        }
        Ok(sentences.join(" "))
    }
}
