// Copyright 2024 Paul Adamson
// Licensed under the Apache License, Version 2.0

//! Polling waits.
//!
//! [`until`] is the one polling loop in the crate; readiness gates and
//! condition assertions are all built on it. The page-readiness gate is
//! advisory by default: a timeout is logged and execution proceeds, matching
//! the layer's historical behavior. `strict_page_ready` in the configuration
//! turns it into a hard error.

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, Instant};

use crate::driver::Driver;
use crate::error::{Error, Result};

/// Polls `probe` every `interval` until it yields a value or `timeout`
/// elapses.
///
/// The probe runs at least once, so a zero timeout still gives one attempt.
/// Probe errors abort the wait immediately.
pub async fn until<T, F, Fut>(
	what: &str,
	timeout: Duration,
	interval: Duration,
	mut probe: F,
) -> Result<T>
where
	F: FnMut() -> Fut,
	Fut: Future<Output = Result<Option<T>>>,
{
	let deadline = Instant::now() + timeout;
	loop {
		if let Some(value) = probe().await? {
			return Ok(value);
		}
		if Instant::now() >= deadline {
			return Err(Error::Timeout {
				what: what.to_string(),
				duration: timeout,
			});
		}
		sleep(interval).await;
	}
}

/// Waits for the document to be ready and pending jQuery AJAX to settle.
///
/// The two probes run in order, each bounded by the explicit-wait window.
/// With `strict_page_ready` unset a timeout is logged at `warn` and the
/// caller proceeds anyway.
pub(crate) async fn page_ready(driver: &Driver) -> Result<()> {
	let config = driver.config();
	let timeout = config.explicit_wait();
	let interval = config.polling_interval();

	tracing::debug!("waiting for page ready state");
	let ready = until("document ready state", timeout, interval, || async {
		let state = driver.execute("return document.readyState").await?;
		Ok((state == "complete").then_some(()))
	})
	.await;
	settle("page was not ready in time", config.strict_page_ready, ready)?;

	let idle = until("pending AJAX to settle", timeout, interval, || async {
		let quiet = driver
			.execute("return !window.jQuery || window.jQuery.active == 0")
			.await?;
		Ok(quiet.as_bool().unwrap_or(false).then_some(()))
	})
	.await;
	settle("jQuery was not finished in time", config.strict_page_ready, idle)?;

	Ok(())
}

fn settle(message: &str, strict: bool, outcome: Result<()>) -> Result<()> {
	match outcome {
		Ok(()) => Ok(()),
		Err(err) if err.is_timeout() && !strict => {
			tracing::warn!(error = %err, "{message}");
			Ok(())
		}
		Err(err) => Err(err),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::atomic::{AtomicU32, Ordering};

	#[tokio::test]
	async fn until_returns_on_first_success() {
		let calls = AtomicU32::new(0);
		let value = until(
			"counter to reach three",
			Duration::from_secs(5),
			Duration::from_millis(1),
			|| async {
				let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
				Ok((n >= 3).then_some(n))
			},
		)
		.await
		.unwrap();

		assert_eq!(value, 3);
		assert_eq!(calls.load(Ordering::SeqCst), 3);
	}

	#[tokio::test(start_paused = true)]
	async fn until_times_out() {
		let err = until(
			"something that never happens",
			Duration::from_secs(2),
			Duration::from_millis(100),
			|| async { Ok(None::<()>) },
		)
		.await
		.unwrap_err();

		assert!(err.is_timeout());
		assert!(err.to_string().contains("something that never happens"));
	}

	#[tokio::test]
	async fn until_probes_once_even_with_zero_timeout() {
		let calls = AtomicU32::new(0);
		let value = until(
			"immediate success",
			Duration::ZERO,
			Duration::from_millis(1),
			|| async {
				calls.fetch_add(1, Ordering::SeqCst);
				Ok(Some(7))
			},
		)
		.await
		.unwrap();

		assert_eq!(value, 7);
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn until_aborts_on_probe_error() {
		let calls = AtomicU32::new(0);
		let err = until(
			"a failing probe",
			Duration::from_secs(5),
			Duration::from_millis(1),
			|| async {
				calls.fetch_add(1, Ordering::SeqCst);
				Err::<Option<()>, _>(Error::Config("boom".into()))
			},
		)
		.await
		.unwrap_err();

		assert!(matches!(err, Error::Config(_)));
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn settle_is_advisory_unless_strict() {
		let timeout = Err(Error::Timeout {
			what: "x".into(),
			duration: Duration::from_secs(1),
		});
		assert!(settle("msg", false, timeout).is_ok());

		let timeout = Err(Error::Timeout {
			what: "x".into(),
			duration: Duration::from_secs(1),
		});
		assert!(settle("msg", true, timeout).unwrap_err().is_timeout());

		// Non-timeout errors always propagate.
		let hard = Err(Error::Config("bad".into()));
		assert!(settle("msg", false, hard).is_err());
	}
}
