// Copyright 2024 Paul Adamson
// Licensed under the Apache License, Version 2.0

//! Run configuration.
//!
//! One [`Config`] is created at process start and read by every component;
//! it is never mutated afterwards. Values are layered from three sources,
//! lowest priority first:
//!
//! 1. built-in defaults ([`Config::default`])
//! 2. a `sel.toml` file in the working directory (or an explicit path)
//! 3. `SEL_*` environment variables (e.g. `SEL_BROWSER=firefox`,
//!    `SEL_EXPLICIT_WAIT_SECS=30`)

use std::path::Path;
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::browser::BrowserKind;
use crate::error::{Error, Result};

/// Default WebDriver endpoint (chromedriver's standalone port).
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";
/// Default explicit wait window in seconds.
pub const DEFAULT_EXPLICIT_WAIT_SECS: u64 = 10;
/// Default polling interval in milliseconds.
pub const DEFAULT_POLLING_INTERVAL_MS: u64 = 100;

/// Where downloaded files are routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileDownloadMode {
	/// The browser writes downloads to its own download directory.
	Browser,
	/// Downloads are captured by the proxy layer. Requires `proxy_enabled`.
	Proxy,
}

/// An HTTP/SSL proxy the browser should route traffic through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
	pub host: String,
	pub port: u16,
	/// Credentials handed to the proxy layer. Never embedded into page URLs.
	pub username: Option<String>,
	pub password: Option<String>,
}

impl ProxyConfig {
	/// `host:port` form used in the W3C proxy capability.
	pub fn address(&self) -> String {
		format!("{}:{}", self.host, self.port)
	}
}

/// Process-wide options for the test-helper layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
	/// Browser backend to drive.
	pub browser: BrowserKind,
	/// Run the browser without a visible window.
	pub headless: bool,
	/// WebDriver endpoint the session is created against.
	pub webdriver_url: String,
	/// Base URL that relative navigation targets are resolved against.
	pub base_url: Option<String>,
	/// Wait window for readiness polls and condition assertions, in seconds.
	pub explicit_wait_secs: u64,
	/// Interval between poll attempts, in milliseconds.
	pub polling_interval_ms: u64,
	/// Page load timeout applied to the session, in seconds.
	pub page_load_timeout_secs: u64,
	/// Script execution timeout applied to the session, in seconds.
	pub script_timeout_secs: u64,
	/// Recreate the session transparently when the browser died under us.
	pub reopen_browser: bool,
	/// Treat a failed page-readiness poll as a hard error instead of a
	/// logged warning.
	pub strict_page_ready: bool,
	/// Route browser traffic through [`Config::proxy`].
	pub proxy_enabled: bool,
	/// Proxy instance used when `proxy_enabled` is set.
	pub proxy: Option<ProxyConfig>,
	/// File download routing.
	pub file_download: FileDownloadMode,
	/// Extra command-line flags passed to the browser binary.
	pub browser_args: Vec<String>,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			browser: BrowserKind::Chrome,
			headless: true,
			webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
			base_url: None,
			explicit_wait_secs: DEFAULT_EXPLICIT_WAIT_SECS,
			polling_interval_ms: DEFAULT_POLLING_INTERVAL_MS,
			page_load_timeout_secs: 30,
			script_timeout_secs: 30,
			reopen_browser: true,
			strict_page_ready: false,
			proxy_enabled: false,
			proxy: None,
			file_download: FileDownloadMode::Browser,
			browser_args: Vec::new(),
		}
	}
}

impl Config {
	/// Loads configuration from `sel.toml` (if present) and `SEL_*`
	/// environment variables on top of the defaults.
	pub fn load() -> Result<Self> {
		Self::figment(Toml::file("sel.toml")).extract().map_err(|e| {
			Error::Config(format!("failed to load configuration: {e}"))
		})
	}

	/// Loads configuration from an explicit TOML file path plus `SEL_*`
	/// environment variables.
	pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		if !path.exists() {
			return Err(Error::Config(format!(
				"config file not found: {}",
				path.display()
			)));
		}
		Self::figment(Toml::file(path)).extract().map_err(|e| {
			Error::Config(format!("failed to load configuration: {e}"))
		})
	}

	fn figment(file: figment::providers::Data<Toml>) -> Figment {
		Figment::new()
			.merge(Serialized::defaults(Config::default()))
			.merge(file)
			.merge(Env::prefixed("SEL_"))
	}

	pub fn explicit_wait(&self) -> Duration {
		Duration::from_secs(self.explicit_wait_secs)
	}

	pub fn polling_interval(&self) -> Duration {
		Duration::from_millis(self.polling_interval_ms)
	}

	pub fn page_load_timeout(&self) -> Duration {
		Duration::from_secs(self.page_load_timeout_secs)
	}

	pub fn script_timeout(&self) -> Duration {
		Duration::from_secs(self.script_timeout_secs)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults() {
		let config = Config::default();
		assert_eq!(config.browser, BrowserKind::Chrome);
		assert!(config.headless);
		assert_eq!(config.webdriver_url, DEFAULT_WEBDRIVER_URL);
		assert_eq!(config.explicit_wait(), Duration::from_secs(10));
		assert_eq!(config.polling_interval(), Duration::from_millis(100));
		assert_eq!(config.file_download, FileDownloadMode::Browser);
		assert!(!config.proxy_enabled);
		assert!(!config.strict_page_ready);
		assert!(config.reopen_browser);
	}

	#[test]
	fn load_from_toml_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("sel.toml");
		std::fs::write(
			&path,
			r#"
browser = "firefox"
headless = false
base_url = "https://app.example.test"
explicit_wait_secs = 25
browser_args = ["--lang=en-US"]

[proxy]
host = "127.0.0.1"
port = 8080
"#,
		)
		.unwrap();

		let config = Config::load_from(&path).unwrap();
		assert_eq!(config.browser, BrowserKind::Firefox);
		assert!(!config.headless);
		assert_eq!(config.base_url.as_deref(), Some("https://app.example.test"));
		assert_eq!(config.explicit_wait_secs, 25);
		assert_eq!(config.browser_args, vec!["--lang=en-US".to_string()]);
		let proxy = config.proxy.unwrap();
		assert_eq!(proxy.address(), "127.0.0.1:8080");
		assert_eq!(proxy.username, None);
		// File only configures the proxy instance, not its enablement.
		assert!(!config.proxy_enabled);
	}

	#[test]
	fn load_from_missing_file_is_a_config_error() {
		let err = Config::load_from("/definitely/not/here/sel.toml").unwrap_err();
		assert!(matches!(err, Error::Config(_)));
	}

	#[test]
	fn env_overrides_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("sel.toml");
		std::fs::write(&path, "explicit_wait_secs = 25\n").unwrap();

		// set_var is unsafe in edition 2024; this is the only test touching
		// this variable, and no other test asserts on polling_interval_ms.
		unsafe { std::env::set_var("SEL_POLLING_INTERVAL_MS", "42") };
		let config = Config::load_from(&path).unwrap();
		unsafe { std::env::remove_var("SEL_POLLING_INTERVAL_MS") };

		assert_eq!(config.explicit_wait_secs, 25);
		assert_eq!(config.polling_interval_ms, 42);
	}

	#[test]
	fn unknown_browser_in_file_is_rejected() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("sel.toml");
		std::fs::write(&path, "browser = \"netscape\"\n").unwrap();

		let err = Config::load_from(&path).unwrap_err();
		assert!(matches!(err, Error::Config(_)));
	}
}
