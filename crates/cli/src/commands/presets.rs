use serde::Serialize;
use shopassist_core::domain::preferences::{SearchPreset, SEARCH_PRESETS};

use crate::commands::{serialize_payload, CommandResult};

#[derive(Debug, Serialize)]
struct PresetsPayload<'a> {
    command: &'static str,
    status: &'static str,
    presets: &'a [SearchPreset],
}

pub fn run(json: bool) -> CommandResult {
    if json {
        let payload = PresetsPayload { command: "presets", status: "ok", presets: &SEARCH_PRESETS };
        return CommandResult::text(serialize_payload(&payload));
    }

    let mut lines = vec!["preference presets:".to_string()];
    for preset in &SEARCH_PRESETS {
        let weights = preset.weights;
        lines.push(format!(
            "- {id:<17} {label}: {description} (value {value:.2}, speed {speed:.2}, trust {trust:.2}, quality {quality:.2})",
            id = preset.id.as_str(),
            label = preset.label,
            description = preset.description,
            value = weights.value,
            speed = weights.speed,
            trust = weights.trust,
            quality = weights.quality,
        ));
    }
    CommandResult::text(lines.join("\n"))
}
