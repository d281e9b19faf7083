// Copyright 2024 Paul Adamson
// Licensed under the Apache License, Version 2.0

//! The driver handle: session lifecycle plus navigation.
//!
//! A [`Driver`] is an explicit per-task context object. Each test task
//! constructs (or clones) its own handle; there is no global or thread-local
//! registry. The underlying WebDriver session is created lazily on first
//! use, health-probed on access (so a browser that died under us is
//! recreated transparently when `reopen_browser` is set), and torn down by
//! [`Driver::quit`]. After `quit()` every operation fails with
//! [`Error::DriverClosed`] until [`Driver::open`] starts a fresh browser.

use std::sync::Arc;

use thirtyfour::WebDriver;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::element::Element;
use crate::error::{Error, Result};
use crate::listener::{DriverListener, Listeners};
use crate::locator::Locator;
use crate::navigate::{self, Auth};

#[derive(Default)]
struct SessionSlot {
	session: Option<WebDriver>,
	closed: bool,
}

impl SessionSlot {
	/// Marks the slot closed and hands the session over for teardown.
	///
	/// The flag is set here, before any teardown I/O, so a quit that fails
	/// (browser already gone) still leaves the handle closed.
	fn close(&mut self) -> Option<WebDriver> {
		self.closed = true;
		self.session.take()
	}
}

struct Inner {
	config: Config,
	slot: RwLock<SessionSlot>,
	listeners: parking_lot::RwLock<Listeners>,
}

/// Handle to one browser session.
///
/// Cloning is cheap and clones share the same session; at most one live
/// session exists per handle family.
#[derive(Clone)]
pub struct Driver {
	inner: Arc<Inner>,
}

impl Driver {
	/// Creates a driver handle. No browser session is started yet.
	pub fn new(config: Config) -> Self {
		Self {
			inner: Arc::new(Inner {
				config,
				slot: RwLock::new(SessionSlot::default()),
				listeners: parking_lot::RwLock::new(Listeners::default()),
			}),
		}
	}

	pub fn config(&self) -> &Config {
		&self.inner.config
	}

	/// Registers a listener; hooks fire in registration order.
	pub fn add_listener(&self, listener: Arc<dyn DriverListener>) {
		self.inner.listeners.write().push(listener);
	}

	/// Returns the live session, creating or recreating it as needed.
	pub(crate) async fn session(&self) -> Result<WebDriver> {
		{
			let slot = self.inner.slot.read().await;
			if slot.closed {
				return Err(Error::DriverClosed);
			}
			if let Some(session) = &slot.session {
				let session = session.clone();
				if !self.inner.config.reopen_browser {
					return Ok(session);
				}
				drop(slot);
				// Health probe: any answer means the browser is still there.
				if session.title().await.is_ok() {
					return Ok(session);
				}
				tracing::info!("browser session no longer answers, recreating it");
			}
		}

		let mut slot = self.inner.slot.write().await;
		if slot.closed {
			return Err(Error::DriverClosed);
		}
		// Another task may have created the session while we waited.
		if let Some(session) = &slot.session {
			if session.title().await.is_ok() {
				return Ok(session.clone());
			}
			slot.session = None;
		}

		let config = &self.inner.config;
		let caps = config.browser.capabilities(config)?;
		tracing::info!(
			browser = %config.browser,
			endpoint = %config.webdriver_url,
			"starting WebDriver session"
		);
		let session = WebDriver::new(&config.webdriver_url, caps)
			.await
			.map_err(|e| Error::SessionStart {
				url: config.webdriver_url.clone(),
				source: e,
			})?;
		session.set_page_load_timeout(config.page_load_timeout()).await?;
		session.set_script_timeout(config.script_timeout()).await?;

		slot.session = Some(session.clone());
		Ok(session)
	}

	/// Opens a URL, resolving it against the configured base URL.
	///
	/// Also clears the closed flag, so a quit driver can start a fresh
	/// browser by opening again.
	pub async fn open(&self, url: &str) -> Result<()> {
		self.open_inner(url, None).await
	}

	/// Opens a URL with credentials, routed per the auth rules (userinfo
	/// embedding without a proxy, proxy delegation otherwise).
	pub async fn open_with_auth(&self, url: &str, auth: &Auth) -> Result<()> {
		self.open_inner(url, Some(auth)).await
	}

	async fn open_inner(&self, url: &str, auth: Option<&Auth>) -> Result<()> {
		let target = navigate::prepare_url(&self.inner.config, url, auth)?;

		self.inner.slot.write().await.closed = false;
		let session = self.session().await?;

		self.inner.listeners.read().before_navigate(&target);
		tracing::info!(url = %target, "navigating");
		session.goto(&target).await?;
		self.inner.listeners.read().after_navigate(&target);
		Ok(())
	}

	/// Closes the browser session. Idempotent; later operations fail with
	/// [`Error::DriverClosed`] until the driver is opened again.
	pub async fn quit(&self) -> Result<()> {
		let Some(session) = self.inner.slot.write().await.close() else {
			return Ok(());
		};
		tracing::info!("quit called, terminating the browser");
		let outcome = session.quit().await;
		// The handle is already closed; listeners hear about the quit even
		// when the browser was gone before we could tell it to exit.
		self.inner.listeners.read().on_quit();
		Ok(outcome?)
	}

	/// Lazily binds a locator; nothing is looked up until a command runs.
	pub fn find(&self, locator: Locator) -> Element {
		Element::new(self.clone(), locator)
	}

	pub fn css(&self, selector: impl Into<String>) -> Element {
		self.find(Locator::css(selector))
	}

	pub fn id(&self, selector: impl Into<String>) -> Element {
		self.find(Locator::id(selector))
	}

	pub fn xpath(&self, selector: impl Into<String>) -> Element {
		self.find(Locator::xpath(selector))
	}

	pub fn name(&self, selector: impl Into<String>) -> Element {
		self.find(Locator::name(selector))
	}

	pub fn tag(&self, selector: impl Into<String>) -> Element {
		self.find(Locator::tag(selector))
	}

	pub fn class_name(&self, selector: impl Into<String>) -> Element {
		self.find(Locator::class_name(selector))
	}

	pub fn link_text(&self, selector: impl Into<String>) -> Element {
		self.find(Locator::link_text(selector))
	}

	pub fn partial_link_text(&self, selector: impl Into<String>) -> Element {
		self.find(Locator::partial_link_text(selector))
	}

	/// Current page title.
	pub async fn title(&self) -> Result<String> {
		Ok(self.session().await?.title().await?)
	}

	/// Current page URL.
	pub async fn current_url(&self) -> Result<String> {
		Ok(self.session().await?.current_url().await?.to_string())
	}

	/// Page source HTML.
	pub async fn source(&self) -> Result<String> {
		Ok(self.session().await?.source().await?)
	}

	/// Reloads the current page.
	pub async fn refresh(&self) -> Result<()> {
		Ok(self.session().await?.refresh().await?)
	}

	/// Maximizes the browser window.
	pub async fn maximize(&self) -> Result<()> {
		Ok(self.session().await?.maximize_window().await?)
	}

	/// Executes JavaScript in the page and returns the JSON result.
	pub async fn execute(&self, script: &str) -> Result<serde_json::Value> {
		tracing::debug!(script, "executing javascript");
		let ret = self.session().await?.execute(script, vec![]).await?;
		Ok(ret.json().clone())
	}

	pub(crate) fn notify_before_command(&self, command: &str, locator: &Locator) {
		self.inner.listeners.read().before_command(command, locator);
	}

	pub(crate) fn notify_after_command(&self, command: &str, locator: &Locator) {
		self.inner.listeners.read().after_command(command, locator);
	}
}

impl std::fmt::Debug for Driver {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Driver")
			.field("browser", &self.inner.config.browser)
			.field("webdriver_url", &self.inner.config.webdriver_url)
			.finish()
	}
}
