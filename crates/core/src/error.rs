//! Error types for the sel test-helper layer.

use std::time::Duration;

use thirtyfour::error::WebDriverError;
use thiserror::Error;

/// Result type alias for sel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving a browser through this layer.
#[derive(Debug, Error)]
pub enum Error {
	/// Browser name from the configuration is not one of the supported backends.
	#[error("Unsupported browser '{0}'. Supported backends: chrome, firefox")]
	UnsupportedBrowser(String),

	/// Configuration could not be loaded or is internally inconsistent.
	#[error("Configuration error: {0}")]
	Config(String),

	/// Proxy usage was requested but no usable proxy is configured.
	#[error("Proxy misconfigured: {0}")]
	ProxyMisconfigured(String),

	/// Non-basic credentials can only be injected through a proxy.
	#[error("Cannot use {scheme} authentication without a proxy server")]
	AuthRequiresProxy { scheme: String },

	/// Operation attempted after `quit()`.
	#[error("WebDriver session has been closed. Call open() to start a new browser")]
	DriverClosed,

	/// Session creation against the WebDriver endpoint failed.
	#[error("Failed to start WebDriver session at {url}: {source}")]
	SessionStart {
		url: String,
		#[source]
		source: WebDriverError,
	},

	/// A polling wait ran out of time.
	#[error("Timed out after {duration:?} waiting for {what}")]
	Timeout { what: String, duration: Duration },

	/// An assertion condition stayed unmet for the whole wait window.
	#[error("Condition \"{condition}\" unmet for element {locator} after {duration:?}")]
	ConditionFailed {
		condition: String,
		locator: String,
		duration: Duration,
	},

	/// Error surfaced by the wrapped WebDriver library.
	#[error(transparent)]
	WebDriver(#[from] WebDriverError),

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// I/O error.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}

impl Error {
	/// Returns true if this error is a wait or assertion timeout.
	pub fn is_timeout(&self) -> bool {
		matches!(
			self,
			Error::Timeout { .. } | Error::ConditionFailed { .. }
		)
	}

	/// Returns true if the wrapped library reported a stale element reference.
	pub fn is_stale(&self) -> bool {
		match self {
			Error::WebDriver(e) => is_stale(e),
			_ => false,
		}
	}
}

/// Classifies a raw WebDriver error as a stale-element failure.
pub(crate) fn is_stale(err: &WebDriverError) -> bool {
	matches!(err, WebDriverError::StaleElementReference(_))
}

/// Classifies a raw WebDriver error as "element not found".
pub(crate) fn is_not_found(err: &WebDriverError) -> bool {
	matches!(err, WebDriverError::NoSuchElement(_))
}

#[cfg(test)]
mod tests {
	use super::*;
	use thirtyfour::error::WebDriverErrorInfo;

	#[test]
	fn typed_stale_errors_are_classified() {
		let raw = WebDriverError::StaleElementReference(WebDriverErrorInfo::new(
			"stale element reference".to_string(),
		));
		assert!(is_stale(&raw));
		assert!(!is_not_found(&raw));

		let err = Error::WebDriver(WebDriverError::StaleElementReference(
			WebDriverErrorInfo::new(String::new()),
		));
		assert!(err.is_stale());
		assert!(!err.is_timeout());
	}

	#[test]
	fn typed_not_found_errors_are_classified() {
		let raw = WebDriverError::NoSuchElement(WebDriverErrorInfo::new(String::new()));
		assert!(is_not_found(&raw));
		assert!(!is_stale(&raw));
	}

	#[test]
	fn timeout_classification() {
		let err = Error::Timeout {
			what: "page ready".into(),
			duration: Duration::from_secs(5),
		};
		assert!(err.is_timeout());
		assert!(!err.is_stale());

		let err = Error::ConditionFailed {
			condition: "text \"ok\"".into(),
			locator: "css '#go'".into(),
			duration: Duration::from_secs(10),
		};
		assert!(err.is_timeout());
	}

	#[test]
	fn driver_closed_message_mentions_restart() {
		let msg = Error::DriverClosed.to_string();
		assert!(msg.contains("open()"), "got: {msg}");
	}

	#[test]
	fn condition_failed_mentions_locator_and_condition() {
		let err = Error::ConditionFailed {
			condition: "visible".into(),
			locator: "id 'submit'".into(),
			duration: Duration::from_secs(1),
		};
		let msg = err.to_string();
		assert!(msg.contains("visible"));
		assert!(msg.contains("id 'submit'"));
	}
}
