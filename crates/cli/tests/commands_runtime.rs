use std::collections::HashSet;
use std::env;
use std::fs;
use std::sync::{Mutex, OnceLock};

use serde_json::Value;
use shopassist_cli::commands::search::SearchArgs;
use shopassist_cli::commands::{config, presets, search};
use shopassist_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use shopassist_core::domain::preferences::PresetType;

#[tokio::test]
async fn search_returns_three_picks_from_distinct_retailers() {
    let mut args = SearchArgs::new("Samsung TV");
    args.zip = Some("90210".to_string());
    args.json = true;

    let result = search::run(&AppConfig::default(), &args).await;
    assert_eq!(result.exit_code, 0, "expected successful search: {}", result.output);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["command"], "search");
    assert_eq!(payload["state"], "results");
    assert_eq!(payload["product"]["id"], "tv-samsung-55");

    let recommendations = payload["recommendations"].as_array().expect("recommendation list");
    let kinds: Vec<&str> =
        recommendations.iter().filter_map(|item| item["type"].as_str()).collect();
    assert_eq!(kinds, ["best_value", "fastest_delivery", "best_quality"]);

    let retailers: HashSet<&str> =
        recommendations.iter().filter_map(|item| item["retailer"]["id"].as_str()).collect();
    assert_eq!(retailers.len(), 3);
    assert_eq!(recommendations[0]["retailer"]["id"], "walmart");
}

#[tokio::test]
async fn search_without_matches_reports_no_results() {
    let mut args = SearchArgs::new("zzznonexistentproduct");
    args.json = true;

    let result = search::run(&AppConfig::default(), &args).await;
    assert_eq!(result.exit_code, 0);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["state"], "no_results");
    assert_eq!(payload["recommendations"], Value::Array(Vec::new()));
    assert_eq!(payload["product"], Value::Null);
}

#[tokio::test]
async fn search_rejects_malformed_zip_before_querying() {
    let mut args = SearchArgs::new("Samsung TV");
    args.zip = Some("9021".to_string());

    let result = search::run(&AppConfig::default(), &args).await;
    assert_eq!(result.exit_code, 2);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["status"], "error");
    assert_eq!(payload["error_class"], "validation");
}

#[tokio::test]
async fn search_with_custom_weights_and_variant() {
    let mut args = SearchArgs::new("Samsung TV");
    args.speed = Some(1.0);
    args.variant = Some("tv-samsung-65".to_string());
    args.json = true;

    let result = search::run(&AppConfig::default(), &args).await;
    assert_eq!(result.exit_code, 0, "expected successful search: {}", result.output);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["preset"], "custom");
    assert_eq!(payload["weights"]["speed"], 1.0);
    assert_eq!(payload["selected_variant_id"], "tv-samsung-65");
    assert_eq!(payload["recommendations"][0]["variant"]["id"], "tv-samsung-65");

    let audit_events = payload["audit_events"].as_array().expect("audit trail");
    assert!(audit_events.iter().any(|event| event == "flow.transition_applied"));
}

#[tokio::test]
async fn search_uses_configured_default_preset() {
    let mut config = AppConfig::default();
    config.search.default_preset = PresetType::MostTrusted;
    let mut args = SearchArgs::new("drill");
    args.json = true;

    let result = search::run(&config, &args).await;

    let payload = parse_payload(&result.output);
    assert_eq!(payload["preset"], "most_trusted");
    assert_eq!(payload["state"], "results");
}

#[tokio::test]
async fn search_reports_conflicting_preference_flags() {
    let mut args = SearchArgs::new("drill");
    args.preset = Some(PresetType::FastestDelivery);
    args.value = Some(0.8);

    let result = search::run(&AppConfig::default(), &args).await;
    assert_eq!(result.exit_code, 2);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["error_class"], "usage");
}

#[tokio::test]
async fn search_text_output_lists_each_pick() {
    let mut args = SearchArgs::new("Samsung TV");
    args.zip = Some("90210".to_string());

    let result = search::run(&AppConfig::default(), &args).await;
    assert_eq!(result.exit_code, 0);

    assert!(result.output.starts_with("Samsung 55\" 4K Smart TV (tv-samsung-55)"));
    assert!(result.output.contains("Best Value: Walmart USD 487.29"));
    assert!(result.output.contains("Fastest: Amazon"));
    assert!(result.output.contains("Best Quality: Best Buy"));
}

#[test]
fn presets_lists_every_preset_as_json() {
    let result = presets::run(true);
    assert_eq!(result.exit_code, 0);

    let payload = parse_payload(&result.output);
    let ids: Vec<&str> = payload["presets"]
        .as_array()
        .expect("preset list")
        .iter()
        .filter_map(|preset| preset["id"].as_str())
        .collect();
    assert_eq!(ids, ["best_value", "fastest_delivery", "most_trusted", "custom"]);
    assert_eq!(payload["presets"][0]["weights"]["value"], 0.5);
}

#[test]
fn config_reports_sources_and_redacts_token() {
    with_env(
        &[
            ("SHOPASSIST_BACKEND_API_TOKEN", "sa-live-0123456789"),
            ("SHOPASSIST_LOG_LEVEL", "debug"),
        ],
        || {
            let result = config::run(&LoadOptions::default());
            assert_eq!(result.exit_code, 0, "{}", result.output);

            assert!(result
                .output
                .contains("- backend.api_token = sa-*** (source: env (SHOPASSIST_BACKEND_API_TOKEN))"));
            assert!(!result.output.contains("0123456789"));
            assert!(result
                .output
                .contains("- logging.level = debug (source: env (SHOPASSIST_LOG_LEVEL))"));
            assert!(result.output.contains("- backend.mode = mock (source: default)"));
        },
    );
}

#[test]
fn config_attributes_file_and_flag_sources() {
    with_env(&[], || {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("shopassist.toml");
        fs::write(&path, "[search]\ncurrency = \"CAD\"\n").expect("write config");

        let options = LoadOptions {
            config_path: Some(path.clone()),
            require_file: true,
            overrides: ConfigOverrides {
                log_level: Some("warn".to_string()),
                ..ConfigOverrides::default()
            },
        };
        let result = config::run(&options);
        assert_eq!(result.exit_code, 0, "{}", result.output);

        assert!(result
            .output
            .contains(&format!("- search.currency = CAD (source: file ({}))", path.display())));
        assert!(result.output.contains("- logging.level = warn (source: flag)"));
        assert!(result.output.contains("- backend.api_token = <unset> (source: default)"));
    });
}

#[test]
fn config_returns_validation_failure_code() {
    with_env(&[("SHOPASSIST_BACKEND_TIMEOUT_SECS", "0")], || {
        let result = config::run(&LoadOptions::default());
        assert_eq!(result.exit_code, 2);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "config");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "SHOPASSIST_BACKEND_MODE",
        "SHOPASSIST_BACKEND_BASE_URL",
        "SHOPASSIST_BACKEND_API_TOKEN",
        "SHOPASSIST_BACKEND_TIMEOUT_SECS",
        "SHOPASSIST_BACKEND_SIMULATED_LATENCY_MS",
        "SHOPASSIST_SEARCH_DEFAULT_PRESET",
        "SHOPASSIST_SEARCH_CURRENCY",
        "SHOPASSIST_LOGGING_LEVEL",
        "SHOPASSIST_LOGGING_FORMAT",
        "SHOPASSIST_LOG_LEVEL",
        "SHOPASSIST_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        match value {
            Some(value) => env::set_var(key, value),
            None => env::remove_var(key),
        }
    }
}
