//! Behavioural tests for layered configuration loading.

use std::cell::RefCell;
use std::ffi::OsString;
use std::fs;
use std::sync::{Mutex, MutexGuard};

use once_cell::sync::Lazy;
use ortho_config::OrthoConfig;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

use sru_config::{
    Config, DEFAULT_MAXIMUM_RECORDS, default_log_filter, default_log_format, default_version,
};

const MAXIMUM_RECORDS_ENV: &str = "SRU_MAXIMUM_RECORDS";

static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

struct Harness {
    temp_dir: TempDir,
    cli_args: RefCell<Vec<OsString>>,
    env_overrides: RefCell<Vec<(String, Option<OsString>)>>,
    loaded: RefCell<Option<Config>>,
    error: RefCell<Option<String>>,
    _env_guard: MutexGuard<'static, ()>,
}

impl Harness {
    fn new() -> Self {
        let env_guard = ENV_MUTEX
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let temp_dir = match TempDir::new() {
            Ok(dir) => dir,
            Err(error) => panic!("failed to create temporary directory: {error}"),
        };
        let harness = Self {
            temp_dir,
            cli_args: RefCell::new(vec![OsString::from("sru-server")]),
            env_overrides: RefCell::new(Vec::new()),
            loaded: RefCell::new(None),
            error: RefCell::new(None),
            _env_guard: env_guard,
        };
        harness.clear_env(MAXIMUM_RECORDS_ENV);
        harness
    }

    fn write_config(&self, maximum_records: u32) {
        let path = self.temp_dir.path().join("sru.toml");
        let toml = format!("maximum_records = {maximum_records}\n");
        if let Err(error) = fs::write(&path, toml) {
            panic!("failed to write configuration: {error}");
        }
        let mut args = self.cli_args.borrow_mut();
        args.push(OsString::from("--config-path"));
        args.push(path.into_os_string());
    }

    fn remember(&self, key: &str) {
        let previous = std::env::var_os(key);
        self.env_overrides
            .borrow_mut()
            .push((key.to_owned(), previous));
    }

    fn set_env(&self, key: &str, value: &str) {
        self.remember(key);
        // Environment mutation is `unsafe` on edition 2024; the harness holds
        // `ENV_MUTEX` and restores every override in `Drop`.
        unsafe { std::env::set_var(key, value) };
    }

    fn clear_env(&self, key: &str) {
        self.remember(key);
        unsafe { std::env::remove_var(key) };
    }

    fn push_cli_arg(&self, arg: impl Into<OsString>) {
        self.cli_args.borrow_mut().push(arg.into());
    }

    fn load(&self) {
        if self.loaded.borrow().is_some() || self.error.borrow().is_some() {
            return;
        }
        let args = self.cli_args.borrow().clone();
        match Config::load_from_iter(args) {
            Ok(config) => *self.loaded.borrow_mut() = Some(config),
            Err(error) => *self.error.borrow_mut() = Some(error.to_string()),
        }
    }

    fn config(&self) -> Config {
        self.load();
        if let Some(error) = self.error.borrow().as_ref() {
            panic!("configuration failed to load: {error}");
        }
        match self.loaded.borrow().as_ref() {
            Some(config) => config.clone(),
            None => panic!("configuration was not loaded"),
        }
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        let mut overrides = self.env_overrides.borrow_mut();
        while let Some((key, value)) = overrides.pop() {
            match value {
                Some(os_value) => unsafe { std::env::set_var(&key, os_value) },
                None => unsafe { std::env::remove_var(&key) },
            }
        }
    }
}

#[fixture]
fn harness() -> Harness {
    Harness::new()
}

#[given("a configuration file setting the maximum records to {value}")]
fn given_configuration_file(harness: &Harness, value: u32) {
    harness.write_config(value);
}

#[given("the environment overrides the maximum records to {value}")]
fn given_environment_override(harness: &Harness, value: u32) {
    harness.set_env(MAXIMUM_RECORDS_ENV, &value.to_string());
}

#[when("the CLI sets the maximum records to {value}")]
fn when_cli_override(harness: &Harness, value: u32) {
    harness.push_cli_arg("--maximum-records");
    harness.push_cli_arg(value.to_string());
}

#[when("the configuration loads without overrides")]
fn when_load_without_overrides(harness: &Harness) {
    harness.load();
}

#[then("loading the configuration resolves the maximum records to {value}")]
fn then_resolved_maximum(harness: &Harness, value: u32) {
    assert_eq!(harness.config().maximum_records, value);
}

#[then("loading the configuration applies the built-in defaults")]
fn then_defaults_applied(harness: &Harness) {
    let config = harness.config();
    assert_eq!(config.maximum_records, DEFAULT_MAXIMUM_RECORDS);
    assert_eq!(config.default_version, default_version());
    assert_eq!(config.log_filter(), default_log_filter());
    assert_eq!(config.log_format(), default_log_format());
    assert_eq!(config.validate(), Ok(()));
}

#[scenario(path = "tests/features/configuration_precedence.feature")]
fn configuration_precedence(#[from(harness)] harness: Harness) {
    let _ = harness;
}
