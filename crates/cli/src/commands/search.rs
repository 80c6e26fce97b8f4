//! `shopassist search`: drives one page session to completion against the
//! configured backend and prints the resulting recommendations.

use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use serde::Serialize;
use shopassist_core::audit::InMemoryAuditSink;
use shopassist_core::config::{AppConfig, BackendMode};
use shopassist_core::domain::preferences::{PreferenceWeights, PresetType};
use shopassist_core::domain::product::Product;
use shopassist_core::domain::recommendation::Recommendation;
use shopassist_core::engine::ComparisonEngine;
use shopassist_core::errors::{ApplicationError, SEARCH_FAILED_MESSAGE};
use shopassist_core::flows::PageState;
use shopassist_core::page::{spawn_page, Intent, PageController, PageView};
use shopassist_core::service::{ComparisonService, MockComparisonService};
use shopassist_http::HttpComparisonService;
use tracing::info;

use crate::commands::{serialize_payload, CommandResult};

#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    #[arg(help = "Free-text product query, e.g. \"Samsung TV\"")]
    pub query: String,
    #[arg(long, help = "5-digit US zip code used for delivery estimates")]
    pub zip: Option<String>,
    #[arg(long, help = "Preset: best_value|fastest_delivery|most_trusted|custom")]
    pub preset: Option<PresetType>,
    #[arg(long, help = "Custom weight for total cost (0.0-1.0)")]
    pub value: Option<f64>,
    #[arg(long, help = "Custom weight for delivery speed (0.0-1.0)")]
    pub speed: Option<f64>,
    #[arg(long, help = "Custom weight for retailer trust (0.0-1.0)")]
    pub trust: Option<f64>,
    #[arg(long, help = "Custom weight for review quality (0.0-1.0)")]
    pub quality: Option<f64>,
    #[arg(long, help = "Variant id to compare instead of the base product")]
    pub variant: Option<String>,
    #[arg(long, help = "Emit machine-readable JSON output")]
    pub json: bool,
}

impl SearchArgs {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            zip: None,
            preset: None,
            value: None,
            speed: None,
            trust: None,
            quality: None,
            variant: None,
            json: false,
        }
    }

    fn custom_weights(&self) -> Option<PreferenceWeights> {
        let axes = [self.value, self.speed, self.trust, self.quality];
        if axes.iter().all(Option::is_none) {
            return None;
        }
        Some(PreferenceWeights::new(
            self.value.unwrap_or(0.0),
            self.speed.unwrap_or(0.0),
            self.trust.unwrap_or(0.0),
            self.quality.unwrap_or(0.0),
        ))
    }

    /// The preset change to apply before searching, if the flags ask for one.
    fn preference_intent(&self) -> Result<Option<Intent>, ArgumentConflict> {
        match (self.preset, self.custom_weights()) {
            (None, None) => Ok(None),
            (Some(preset), None) => Ok(Some(Intent::ChangePreset { preset, weights: None })),
            (None | Some(PresetType::Custom), Some(weights)) => {
                Ok(Some(Intent::ChangePreset { preset: PresetType::Custom, weights: Some(weights) }))
            }
            (Some(preset), Some(_)) => Err(ArgumentConflict(preset)),
        }
    }
}

#[derive(Debug)]
struct ArgumentConflict(PresetType);

#[derive(Debug, Serialize)]
struct SearchPayload<'a> {
    command: &'static str,
    status: &'static str,
    state: &'static str,
    query: &'a str,
    zip_code: Option<&'a str>,
    preset: &'static str,
    weights: PreferenceWeights,
    product: Option<&'a Product>,
    selected_variant_id: Option<&'a str>,
    recommendations: &'a [Recommendation],
    audit_events: &'a [String],
}

struct SearchReport {
    view: PageView,
    audit_events: Vec<String>,
}

pub async fn run(config: &AppConfig, args: &SearchArgs) -> CommandResult {
    match execute(config, args).await {
        Ok(report) => render(&report, args.json),
        Err(SearchFailure::Usage(ArgumentConflict(preset))) => CommandResult::failure(
            "search",
            "usage",
            format!(
                "custom weights cannot be combined with the `{}` preset; drop --preset or use --preset custom",
                preset.as_str()
            ),
            2,
        ),
        Err(SearchFailure::Application(error)) => CommandResult::failure(
            "search",
            error.error_class(),
            error.user_message(),
            exit_code_for(&error),
        ),
    }
}

enum SearchFailure {
    Usage(ArgumentConflict),
    Application(ApplicationError),
}

impl From<ArgumentConflict> for SearchFailure {
    fn from(conflict: ArgumentConflict) -> Self {
        Self::Usage(conflict)
    }
}

impl From<ApplicationError> for SearchFailure {
    fn from(error: ApplicationError) -> Self {
        Self::Application(error)
    }
}

async fn execute(config: &AppConfig, args: &SearchArgs) -> Result<SearchReport, SearchFailure> {
    let preference = args.preference_intent()?;
    let service = build_service(config)?;

    let audit = InMemoryAuditSink::default();
    let controller = PageController::new(config.search.default_preset)
        .with_audit(Arc::new(audit.clone()), Some(format!("cli-{}", std::process::id())));
    let (page, task) = spawn_page(service, controller);

    if let Some(intent) = preference {
        page.dispatch(intent).await?;
    }
    page.dispatch(Intent::Search { query: args.query.clone(), zip_code: args.zip.clone() })
        .await?;
    let mut view = page.settled().await?;

    if let Some(variant_id) = &args.variant {
        if view.selected_product.is_some() {
            page.dispatch(Intent::SelectVariant(variant_id.clone())).await?;
            view = page.settled().await?;
        }
    }

    drop(page);
    let _ = task.await;

    info!(
        event_name = "cli.search.completed",
        state = view.state.as_str(),
        recommendation_count = view.recommendations.len(),
        discarded_responses = view.discarded_responses,
        "search command completed"
    );
    Ok(SearchReport { view, audit_events: audit.event_types() })
}

fn build_service(config: &AppConfig) -> Result<Arc<dyn ComparisonService>, ApplicationError> {
    match config.backend.mode {
        BackendMode::Mock => {
            let engine = ComparisonEngine::seeded().with_currency(config.search.currency.clone());
            let mut service = MockComparisonService::new(engine);
            if config.backend.simulated_latency_ms > 0 {
                service =
                    service.with_latency(Duration::from_millis(config.backend.simulated_latency_ms));
            }
            Ok(Arc::new(service))
        }
        BackendMode::Http => {
            let service = HttpComparisonService::from_config(&config.backend)
                .map_err(|error| ApplicationError::Configuration(error.to_string()))?;
            Ok(Arc::new(service))
        }
    }
}

fn exit_code_for(error: &ApplicationError) -> u8 {
    match error {
        ApplicationError::Validation(_) | ApplicationError::Configuration(_) => 2,
        _ => 1,
    }
}

fn render(report: &SearchReport, json: bool) -> CommandResult {
    let view = &report.view;
    if view.state == PageState::Error {
        let message =
            view.error_message.clone().unwrap_or_else(|| SEARCH_FAILED_MESSAGE.to_string());
        return CommandResult::failure("search", "backend", message, 1);
    }

    if json {
        let payload = SearchPayload {
            command: "search",
            status: "ok",
            state: view.state.as_str(),
            query: &view.query,
            zip_code: view.zip_code.as_deref(),
            preset: view.selected_preset.as_str(),
            weights: view.weights(),
            product: view.selected_product.as_ref(),
            selected_variant_id: view.selected_variant_id.as_deref(),
            recommendations: &view.recommendations,
            audit_events: &report.audit_events,
        };
        return CommandResult::text(serialize_payload(&payload));
    }

    CommandResult::text(render_text(view))
}

fn render_text(view: &PageView) -> String {
    let Some(product) = &view.selected_product else {
        return format!("No products found for \"{}\".", view.query);
    };

    let mut lines = vec![
        format!("{} ({})", product.name, product.id),
        format!(
            "preset: {} | zip: {}",
            view.selected_preset.preset().label,
            view.zip_code.as_deref().unwrap_or("-")
        ),
    ];
    if let Some(variant_id) = &view.selected_variant_id {
        if let Some(variant) = product.variant(variant_id) {
            lines.push(format!("variant: {} ({})", variant.name, variant.id.as_str()));
        }
    }

    if view.recommendations.is_empty() {
        lines.push("No retailer offers are available for this product.".to_string());
    }
    for recommendation in &view.recommendations {
        lines.push(String::new());
        lines.push(format!(
            "{label}: {retailer} {currency} {total} | {window} ({method}) | overall {overall}",
            label = recommendation.kind.label(),
            retailer = recommendation.retailer.name,
            currency = recommendation.price_breakdown.currency,
            total = recommendation.price_breakdown.total_cost,
            window = recommendation.delivery.delivery_window,
            method = recommendation.delivery.shipping_method,
            overall = recommendation.scores.overall,
        ));
        lines.push(format!("  {}", recommendation.why_selected));
        for tradeoff in &recommendation.tradeoffs {
            lines.push(format!("  - {}", tradeoff.description));
        }
        lines.push(format!("  {}", recommendation.purchase_url));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use shopassist_core::domain::preferences::{PreferenceWeights, PresetType};
    use shopassist_core::page::Intent;

    use super::SearchArgs;

    #[test]
    fn weight_flags_imply_custom_preset_with_missing_axes_zeroed() {
        let mut args = SearchArgs::new("drill");
        args.speed = Some(1.0);

        let intent = args.preference_intent().expect("no conflict");

        assert_eq!(
            intent,
            Some(Intent::ChangePreset {
                preset: PresetType::Custom,
                weights: Some(PreferenceWeights::new(0.0, 1.0, 0.0, 0.0)),
            })
        );
    }

    #[test]
    fn named_preset_with_weights_is_a_conflict() {
        let mut args = SearchArgs::new("drill");
        args.preset = Some(PresetType::MostTrusted);
        args.value = Some(0.5);

        assert!(args.preference_intent().is_err());

        args.preset = Some(PresetType::Custom);
        assert!(args.preference_intent().is_ok());
    }

    #[test]
    fn no_flags_keep_the_configured_preset() {
        assert_eq!(SearchArgs::new("drill").preference_intent().expect("no conflict"), None);
    }
}
