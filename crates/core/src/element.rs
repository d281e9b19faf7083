//! Lazy element handles and the command layer.
//!
//! An [`Element`] is a locator bound to a driver handle; it never caches the
//! underlying DOM node between commands. Every command runs the same visible
//! sequence: listener hook, page-readiness gate, fresh lookup by locator,
//! the wrapped-library call, and one re-lookup retry if the node went stale
//! between lookup and use. Navigation or DOM mutation invalidates element
//! handles in the wrapped library, so re-resolving from the locator is the
//! staleness recovery.

use thirtyfour::prelude::*;

use crate::conditions::Condition;
use crate::driver::Driver;
use crate::error::{self, Error, Result};
use crate::locator::Locator;
use crate::wait;

/// A lazy handle to a DOM element: locator plus driver.
#[derive(Clone)]
pub struct Element {
	driver: Driver,
	locator: Locator,
}

impl Element {
	pub(crate) fn new(driver: Driver, locator: Locator) -> Self {
		Self { driver, locator }
	}

	pub fn locator(&self) -> &Locator {
		&self.locator
	}

	/// Pre-command gate: page readiness, then a fresh lookup.
	async fn resolve(&self) -> Result<WebElement> {
		wait::page_ready(&self.driver).await?;
		self.relocate().await
	}

	/// Looks the element up from scratch, waiting for it to appear within
	/// the explicit-wait window.
	async fn relocate(&self) -> Result<WebElement> {
		let session = self.driver.session().await?;
		let config = self.driver.config();
		session
			.query(self.locator.to_by())
			.wait(config.explicit_wait(), config.polling_interval())
			.first()
			.await
			.map_err(Into::into)
	}

	/// Clicks the element.
	pub async fn click(&self) -> Result<()> {
		self.driver.notify_before_command("click", &self.locator);
		let el = self.resolve().await?;
		match el.click().await {
			Err(e) if error::is_stale(&e) => {
				tracing::debug!(locator = %self.locator, "stale reference, re-locating");
				self.relocate().await?.click().await?;
			}
			other => other?,
		}
		self.driver.notify_after_command("click", &self.locator);
		Ok(())
	}

	/// Visible text content.
	pub async fn text(&self) -> Result<String> {
		self.driver.notify_before_command("text", &self.locator);
		let el = self.resolve().await?;
		let value = match el.text().await {
			Err(e) if error::is_stale(&e) => self.relocate().await?.text().await?,
			other => other?,
		};
		self.driver.notify_after_command("text", &self.locator);
		Ok(value)
	}

	/// Tag name of the element.
	pub async fn tag_name(&self) -> Result<String> {
		self.driver.notify_before_command("tag_name", &self.locator);
		let el = self.resolve().await?;
		let value = match el.tag_name().await {
			Err(e) if error::is_stale(&e) => self.relocate().await?.tag_name().await?,
			other => other?,
		};
		self.driver.notify_after_command("tag_name", &self.locator);
		Ok(value)
	}

	/// Attribute value, or `None` when absent.
	pub async fn attr(&self, name: &str) -> Result<Option<String>> {
		self.driver.notify_before_command("attr", &self.locator);
		let el = self.resolve().await?;
		let value = match el.attr(name).await {
			Err(e) if error::is_stale(&e) => self.relocate().await?.attr(name).await?,
			other => other?,
		};
		self.driver.notify_after_command("attr", &self.locator);
		Ok(value)
	}

	/// Form control value.
	pub async fn value(&self) -> Result<Option<String>> {
		self.driver.notify_before_command("value", &self.locator);
		let el = self.resolve().await?;
		let value = match el.value().await {
			Err(e) if error::is_stale(&e) => self.relocate().await?.value().await?,
			other => other?,
		};
		self.driver.notify_after_command("value", &self.locator);
		Ok(value)
	}

	/// Sends keystrokes to the element.
	pub async fn type_into(&self, text: &str) -> Result<()> {
		self.driver.notify_before_command("type_into", &self.locator);
		let el = self.resolve().await?;
		match el.send_keys(text).await {
			Err(e) if error::is_stale(&e) => {
				self.relocate().await?.send_keys(text).await?;
			}
			other => other?,
		}
		self.driver.notify_after_command("type_into", &self.locator);
		Ok(())
	}

	/// Clears a form control.
	pub async fn clear(&self) -> Result<()> {
		self.driver.notify_before_command("clear", &self.locator);
		let el = self.resolve().await?;
		match el.clear().await {
			Err(e) if error::is_stale(&e) => {
				self.relocate().await?.clear().await?;
			}
			other => other?,
		}
		self.driver.notify_after_command("clear", &self.locator);
		Ok(())
	}

	pub async fn is_displayed(&self) -> Result<bool> {
		self.driver.notify_before_command("is_displayed", &self.locator);
		let el = self.resolve().await?;
		let value = match el.is_displayed().await {
			Err(e) if error::is_stale(&e) => self.relocate().await?.is_displayed().await?,
			other => other?,
		};
		self.driver.notify_after_command("is_displayed", &self.locator);
		Ok(value)
	}

	pub async fn is_enabled(&self) -> Result<bool> {
		self.driver.notify_before_command("is_enabled", &self.locator);
		let el = self.resolve().await?;
		let value = match el.is_enabled().await {
			Err(e) if error::is_stale(&e) => self.relocate().await?.is_enabled().await?,
			other => other?,
		};
		self.driver.notify_after_command("is_enabled", &self.locator);
		Ok(value)
	}

	pub async fn is_selected(&self) -> Result<bool> {
		self.driver.notify_before_command("is_selected", &self.locator);
		let el = self.resolve().await?;
		let value = match el.is_selected().await {
			Err(e) if error::is_stale(&e) => self.relocate().await?.is_selected().await?,
			other => other?,
		};
		self.driver.notify_after_command("is_selected", &self.locator);
		Ok(value)
	}

	/// Asserts that every condition holds within the explicit-wait window.
	///
	/// Returns the element for chaining; fails with
	/// [`Error::ConditionFailed`] naming the first unmet condition.
	pub async fn should_have(&self, conditions: &[Condition]) -> Result<&Self> {
		for condition in conditions {
			self.assert_condition(condition, true).await?;
		}
		Ok(self)
	}

	/// Alias of [`Element::should_have`] reading better for state
	/// conditions (`should_be(&[Condition::Visible])`).
	pub async fn should_be(&self, conditions: &[Condition]) -> Result<&Self> {
		self.should_have(conditions).await
	}

	/// Asserts that every condition stays unmet within the wait window.
	pub async fn should_not_have(&self, conditions: &[Condition]) -> Result<&Self> {
		for condition in conditions {
			self.assert_condition(condition, false).await?;
		}
		Ok(self)
	}

	/// Alias of [`Element::should_not_have`] for state conditions.
	pub async fn should_not_be(&self, conditions: &[Condition]) -> Result<&Self> {
		self.should_not_have(conditions).await
	}

	/// Waits until the condition holds; same window and failure shape as
	/// the assertions.
	pub async fn wait_until(&self, condition: Condition) -> Result<()> {
		self.assert_condition(&condition, true).await
	}

	/// Waits until the condition stops holding.
	pub async fn wait_while(&self, condition: Condition) -> Result<()> {
		self.assert_condition(&condition, false).await
	}

	async fn assert_condition(&self, condition: &Condition, expected: bool) -> Result<()> {
		wait::page_ready(&self.driver).await?;
		let config = self.driver.config();
		let timeout = config.explicit_wait();

		let described = if expected {
			condition.to_string()
		} else {
			format!("not {condition}")
		};
		tracing::debug!(locator = %self.locator, condition = %described, "polling condition");

		let outcome = wait::until(
			&described,
			timeout,
			config.polling_interval(),
			|| async { Ok((self.probe(condition).await? == expected).then_some(())) },
		)
		.await;

		match outcome {
			Err(e) if e.is_timeout() => Err(Error::ConditionFailed {
				condition: described,
				locator: self.locator.to_string(),
				duration: timeout,
			}),
			other => other,
		}
	}

	/// One evaluation attempt. An element that is absent or went stale is
	/// reported as "condition unmet" so negative waits can succeed and
	/// positive waits keep polling.
	async fn probe(&self, condition: &Condition) -> Result<bool> {
		let session = self.driver.session().await?;
		let el = match session.find(self.locator.to_by()).await {
			Ok(el) => el,
			Err(e) if error::is_not_found(&e) || error::is_stale(&e) => return Ok(false),
			Err(e) => return Err(e.into()),
		};
		match condition.check(&el).await {
			Ok(met) => Ok(met),
			Err(e) if e.is_stale() => Ok(false),
			Err(e) => Err(e),
		}
	}
}

impl std::fmt::Debug for Element {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Element")
			.field("locator", &self.locator)
			.finish()
	}
}
