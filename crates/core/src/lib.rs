// Copyright 2024 Paul Adamson
// Licensed under the Apache License, Version 2.0

//! sel: fluent WebDriver test helpers on top of thirtyfour.
//!
//! This crate is a thin coordination layer for browser tests: locating page
//! elements, waiting for page readiness, asserting conditions and managing
//! the browser session lifecycle. All heavy lifting (the WebDriver wire
//! protocol, browser process control, DOM traversal, JavaScript execution)
//! is delegated to [`thirtyfour`].
//!
//! # Example
//!
//! ```ignore
//! use sel::{Condition, Config, Driver};
//!
//! #[tokio::main]
//! async fn main() -> sel::Result<()> {
//!     // Defaults, sel.toml and SEL_* environment variables, layered.
//!     let config = Config::load()?;
//!     let driver = Driver::new(config);
//!
//!     driver
//!         .open(
//!             "data:text/html,<html><body>\
//!                 <h1 id='title'>Welcome</h1>\
//!                 <button id='btn' onclick='this.textContent=\"Clicked\"'>Click me</button>\
//!             </body></html>",
//!         )
//!         .await?;
//!
//!     // Elements are lazy: nothing is looked up until a command runs, and
//!     // every command re-resolves the locator to dodge stale references.
//!     driver.id("btn").click().await?;
//!     driver
//!         .id("btn")
//!         .should_have(&[Condition::text("Clicked")])
//!         .await?;
//!
//!     assert_eq!(driver.id("title").tag_name().await?, "h1");
//!     driver.quit().await
//! }
//! ```
//!
//! # Relative URLs and basic auth
//!
//! ```ignore
//! use sel::{Auth, Config, Driver};
//!
//! # async fn run() -> sel::Result<()> {
//! let config = Config {
//!     base_url: Some("https://staging.example.test".into()),
//!     ..Config::default()
//! };
//! let driver = Driver::new(config);
//!
//! // Joined to the base URL; credentials land in the URL userinfo because
//! // no proxy is enabled.
//! driver
//!     .open_with_auth("/admin", &Auth::basic("qa", "hunter2"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod browser;
pub mod conditions;
pub mod config;
pub mod driver;
pub mod element;
pub mod listener;
pub mod locator;
pub mod navigate;
pub mod wait;

mod error;

pub use browser::BrowserKind;
pub use conditions::Condition;
pub use config::{Config, FileDownloadMode, ProxyConfig};
pub use driver::Driver;
pub use element::Element;
pub use error::{Error, Result};
pub use listener::DriverListener;
pub use locator::{Locator, Strategy};
pub use navigate::{Auth, AuthScheme};
