// Copyright 2024 Paul Adamson
// Licensed under the Apache License, Version 2.0

//! Browser backend selection and capability building.
//!
//! Each supported backend knows how to turn a [`Config`] into the
//! capabilities payload the WebDriver endpoint expects: headless flags,
//! container-hardening flags for Chrome, extra user args and the W3C proxy
//! capability. Everything past capability construction (process control,
//! session wire protocol) belongs to the wrapped library.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::json;
use thirtyfour::prelude::*;
use thirtyfour::{Capabilities, DesiredCapabilities};

use crate::config::Config;
use crate::error::{Error, Result};

/// Supported browser backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
	Chrome,
	Firefox,
}

impl fmt::Display for BrowserKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			BrowserKind::Chrome => f.write_str("chrome"),
			BrowserKind::Firefox => f.write_str("firefox"),
		}
	}
}

impl FromStr for BrowserKind {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		match s.trim().to_ascii_lowercase().as_str() {
			"chrome" => Ok(BrowserKind::Chrome),
			"firefox" => Ok(BrowserKind::Firefox),
			other => Err(Error::UnsupportedBrowser(other.to_string())),
		}
	}
}

impl BrowserKind {
	/// Builds the capabilities payload for this backend from the run
	/// configuration.
	pub fn capabilities(self, config: &Config) -> Result<Capabilities> {
		let mut caps: Capabilities = match self {
			BrowserKind::Chrome => {
				let mut caps = DesiredCapabilities::chrome();
				if config.headless {
					caps.add_arg("--headless=new")?;
				}
				// Required for containerized CI runners.
				caps.add_arg("--no-sandbox")?;
				caps.add_arg("--disable-dev-shm-usage")?;
				for arg in &config.browser_args {
					caps.add_arg(arg)?;
				}
				caps.into()
			}
			BrowserKind::Firefox => {
				let mut caps = DesiredCapabilities::firefox();
				if config.headless {
					caps.add_arg("-headless")?;
				}
				for arg in &config.browser_args {
					caps.add_arg(arg)?;
				}
				caps.into()
			}
		};

		if config.proxy_enabled {
			let proxy = config.proxy.as_ref().ok_or_else(|| {
				Error::ProxyMisconfigured(
					"proxy_enabled is set but no proxy instance is configured".to_string(),
				)
			})?;
			let address = proxy.address();
			tracing::debug!(%address, "routing browser traffic through proxy");
			caps.insert(
				"proxy".to_string(),
				json!({
					"proxyType": "manual",
					"httpProxy": address,
					"sslProxy": address,
				}),
			);
		}

		Ok(caps)
	}
}
