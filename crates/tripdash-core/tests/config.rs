use std::collections::HashMap;
use std::path::Path;

use tripdash_core::config::{
    ConfigError, ENV_CACHE_CAPACITY, ENV_CURRENCY_SYMBOL, ENV_TOP_N,
};
use tripdash_core::currency::format_currency;
use tripdash_core::DashboardConfig;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults() {
    let config = DashboardConfig::default();

    assert_eq!(config.currency_symbol, "₹");
    assert_eq!(config.top_n, 10);
    assert_eq!(config.cache_capacity, 4);
}

#[test]
fn toml_fills_missing_keys_with_defaults() {
    let config = DashboardConfig::from_toml_str("top_n = 5\n").unwrap();

    assert_eq!(config.top_n, 5);
    assert_eq!(config.currency_symbol, "₹");
}

#[test]
fn unknown_toml_keys_are_rejected() {
    let err = DashboardConfig::from_toml_str("colour = \"blue\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
fn zero_top_n_is_rejected() {
    let err = DashboardConfig::from_toml_str("top_n = 0\n").unwrap_err();
    assert!(matches!(err, ConfigError::NotPositive { key: "top_n" }));
}

#[test]
fn environment_overrides_file_values() {
    let base = DashboardConfig::from_toml_str("currency_symbol = \"€\"\ntop_n = 3\n").unwrap();
    let config = base
        .with_overrides(lookup(&[
            (ENV_CURRENCY_SYMBOL, "$"),
            (ENV_TOP_N, " 7 "),
            (ENV_CACHE_CAPACITY, "9"),
        ]))
        .unwrap();

    assert_eq!(config.currency_symbol, "$");
    assert_eq!(config.top_n, 7);
    assert_eq!(config.cache_capacity, 9);
}

#[test]
fn malformed_override_names_the_variable() {
    let err = DashboardConfig::default()
        .with_overrides(lookup(&[(ENV_TOP_N, "ten")]))
        .unwrap_err();

    match err {
        ConfigError::InvalidValue { key, value } => {
            assert_eq!(key, ENV_TOP_N);
            assert_eq!(value, "ten");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_config_file_is_an_io_error() {
    let err = DashboardConfig::from_file(Path::new("/nonexistent/tripdash.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn currency_formatting() {
    assert_eq!(format_currency(1234.5, "₹"), "₹1,234.50");
    assert_eq!(format_currency(600.0, "₹"), "₹600.00");
    assert_eq!(format_currency(0.0, "₹"), "₹0.00");
    assert_eq!(format_currency(-20.0, "₹"), "₹-20.00");
    assert_eq!(format_currency(1_234_567.891, "$"), "$1,234,567.89");
    assert_eq!(format_currency(999.999, "₹"), "₹1,000.00");
}
