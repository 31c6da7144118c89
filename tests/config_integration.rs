use recipe_planner::config::AppConfig;
use recipe_planner::error::Error;
use serial_test::serial;
use std::env;
use std::fs;
use std::path::PathBuf;

const ARGV0: &str = "recipe-planner";

// Helper to clear environment variables that might interfere with tests
fn clear_env_vars() {
    unsafe {
        env::remove_var("RECIPE_SERVER__PORT");
        env::remove_var("RECIPE_CATALOG__BASE_URL");
        env::remove_var("RECIPE_STORAGE__MEAL_PLAN_PATH");
        env::remove_var("CONFIG_FILE");
        env::remove_var("PORT");
        env::remove_var("CATALOG_API_KEY");
        env::remove_var("MEAL_PLAN_PATH");
    }
}

#[test]
#[serial]
fn test_default_config() {
    clear_env_vars();

    let config = AppConfig::load_from_args([ARGV0]).expect("defaults should load");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.catalog.base_url, "https://api.spoonacular.com");
    assert_eq!(config.catalog.api_key, "");
    assert_eq!(config.storage.meal_plan_path, PathBuf::from("meal_plan.json"));
}

#[test]
#[serial]
fn test_env_override() {
    clear_env_vars();
    unsafe {
        env::set_var("RECIPE_SERVER__PORT", "9090");
        env::set_var("RECIPE_CATALOG__BASE_URL", "http://localhost:8089");
    }

    let config = AppConfig::load_from_args([ARGV0]).expect("Failed to load config");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.catalog.base_url, "http://localhost:8089");

    clear_env_vars();
}

#[test]
#[serial]
fn test_cli_beats_env() {
    clear_env_vars();
    unsafe {
        env::set_var("RECIPE_SERVER__PORT", "9090");
        env::set_var("CATALOG_API_KEY", "from-env");
    }

    let config = AppConfig::load_from_args([ARGV0, "--port", "4040", "--meal-plan", "plan.json"])
        .expect("Failed to load config");
    assert_eq!(config.server.port, 4040);
    assert_eq!(config.catalog.api_key, "from-env");
    assert_eq!(config.storage.meal_plan_path, PathBuf::from("plan.json"));
    assert!(!format!("{:?}", config.catalog).contains("from-env"));

    clear_env_vars();
}

#[test]
#[serial]
fn test_file_load() {
    clear_env_vars();

    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("planner.yaml");
    fs::write(
        &file_path,
        r#"
server:
  port: 7070
storage:
  meal_plan_path: /var/lib/planner/plan.json
    "#,
    )
    .expect("Failed to write temp config");

    // Tell AppConfig to use this file via Env Var
    unsafe {
        env::set_var("CONFIG_FILE", &file_path);
    }

    let config = AppConfig::load_from_args([ARGV0]).expect("Failed to load config from file");
    assert_eq!(config.server.port, 7070);
    assert_eq!(
        config.storage.meal_plan_path,
        PathBuf::from("/var/lib/planner/plan.json")
    );
    // Keys the file leaves out keep their defaults
    assert_eq!(config.server.host, "127.0.0.1");

    clear_env_vars();
}

#[test]
#[serial]
fn test_missing_explicit_file_is_an_error() {
    clear_env_vars();

    let result = AppConfig::load_from_args([ARGV0, "--config", "/nonexistent/planner.yaml"]);
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_invalid_values_are_config_errors() {
    clear_env_vars();

    let result = AppConfig::load_from_args([ARGV0, "--port", "not-a-port"]);
    assert!(matches!(result, Err(Error::Config(_))));

    unsafe {
        env::set_var("RECIPE_SERVER__PORT", "not-a-port");
    }
    let result = AppConfig::load_from_args([ARGV0]);
    clear_env_vars();

    let err = result.unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(err.to_string().starts_with("Configuration error"));
}

#[test]
#[serial]
fn test_cwd_config_fallback() {
    clear_env_vars();

    // Create ./config.yaml
    let config_content = r#"
server:
  port: 6060
    "#;
    let cwd_path = "config.yaml";
    fs::write(cwd_path, config_content).expect("Failed to write ./config.yaml");

    let config = AppConfig::load_from_args([ARGV0]);

    fs::remove_file(cwd_path).unwrap();

    assert_eq!(config.expect("Failed to load config").server.port, 6060);
}
