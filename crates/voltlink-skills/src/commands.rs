//! Command intents as a configuration table dispatched by one generic skill.
//!
//! Each entry pairs an intent name with the vehicle-API command it issues and
//! the speech templates around it (`{car}` substitutes the display name).
//! The prompt/noop templates exist for dispatchers that run their own yes/no
//! confirmation dialog; this skill executes directly and speaks the
//! confirmation.

use tracing::info;

use voltlink_core::{sleeping_phrase, SkillError, SkillResult};

use crate::registry::{IntentSkill, SkillContext};

/// One row of the command table.
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub intent: &'static str,
    /// Vehicle API command name.
    pub command: &'static str,
    pub prompt_speech: &'static str,
    pub confirm_speech: &'static str,
    pub noop_speech: &'static str,
}

impl CommandSpec {
    /// Confirmation prompt for a dialog-running dispatcher.
    pub fn prompt(&self, car_name: &str) -> String {
        fill(self.prompt_speech, car_name)
    }

    /// Spoken acknowledgment after the command succeeds.
    pub fn confirm(&self, car_name: &str) -> String {
        fill(self.confirm_speech, car_name)
    }

    /// Spoken response when the user declines.
    pub fn noop(&self) -> String {
        self.noop_speech.to_string()
    }
}

/// Every command intent the assistant understands.
pub const COMMAND_TABLE: &[CommandSpec] = &[
    CommandSpec {
        intent: "AutoConditioningStart",
        command: "auto_conditioning_start",
        prompt_speech: "Heat up {car}?",
        confirm_speech: "Heating up {car}.",
        noop_speech: "I won't heat anything up.",
    },
    CommandSpec {
        intent: "AutoConditioningStop",
        command: "auto_conditioning_stop",
        prompt_speech: "Turn off climate control for {car}?",
        confirm_speech: "Turned off climate control for {car}.",
        noop_speech: "I won't do anything.",
    },
    CommandSpec {
        intent: "ChargeStart",
        command: "charge_start",
        prompt_speech: "Start charging {car}?",
        confirm_speech: "Preparing to charge {car}.",
        noop_speech: "I won't charge anything.",
    },
    CommandSpec {
        intent: "ChargeStop",
        command: "charge_stop",
        prompt_speech: "Stop charging {car}?",
        confirm_speech: "Stopping charging for {car}.",
        noop_speech: "I won't do anything.",
    },
    CommandSpec {
        intent: "DoorLock",
        command: "door_lock",
        prompt_speech: "Lock {car}?",
        confirm_speech: "Locking {car}.",
        noop_speech: "I won't do anything.",
    },
    CommandSpec {
        intent: "DoorUnlock",
        command: "door_unlock",
        prompt_speech: "Unlock {car}?",
        confirm_speech: "Unlocking {car}.",
        noop_speech: "I won't do anything.",
    },
];

/// Look up a command table entry by intent name.
pub fn find_command(intent: &str) -> Option<&'static CommandSpec> {
    COMMAND_TABLE.iter().find(|spec| spec.intent == intent)
}

fn fill(template: &str, car_name: &str) -> String {
    template.replace("{car}", car_name)
}

/// Generic handler for the whole command table. A command the car does not
/// accept (asleep) triggers the wake-up side effect and the apology sentence,
/// same as an unavailable status query.
pub struct CommandSkill;

impl IntentSkill for CommandSkill {
    fn name(&self) -> &str {
        "VehicleCommand"
    }

    fn can_handle(&self, intent: &str) -> bool {
        find_command(intent).is_some()
    }

    fn handle(&self, ctx: &SkillContext, intent: &str) -> SkillResult<String> {
        let spec = find_command(intent)
            .ok_or_else(|| SkillError::UnknownIntent(intent.to_string()))?;
        let car = ctx.primary_vehicle()?;
        let name = car.display_name();

        if car.command(spec.command)? {
            info!(intent, command = spec.command, vehicle = name, "command accepted");
            Ok(spec.confirm(name))
        } else {
            info!(intent, command = spec.command, vehicle = name, "vehicle asleep, waking");
            car.wake_up()?;
            Ok(sleeping_phrase(name))
        }
    }
}
