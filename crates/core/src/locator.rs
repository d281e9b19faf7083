// Copyright 2024 Paul Adamson
// Licensed under the Apache License, Version 2.0

//! Locator vocabulary: a (strategy, selector) pair identifying how to find
//! a DOM element. Mirrors the wrapped library's own selector strategies and
//! is a direct pass-through to [`thirtyfour::By`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thirtyfour::By;

/// Element lookup strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
	Id,
	XPath,
	Css,
	Name,
	Tag,
	ClassName,
	LinkText,
	PartialLinkText,
}

impl fmt::Display for Strategy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Strategy::Id => "id",
			Strategy::XPath => "xpath",
			Strategy::Css => "css",
			Strategy::Name => "name",
			Strategy::Tag => "tag",
			Strategy::ClassName => "class",
			Strategy::LinkText => "link text",
			Strategy::PartialLinkText => "partial link text",
		};
		f.write_str(name)
	}
}

/// How to find a DOM element: a strategy plus a selector string.
///
/// A `Locator` is inert data; nothing is looked up until a command runs.
/// Elements are re-resolved from their locator before every interaction, so
/// a locator is also the recovery recipe for stale references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
	pub strategy: Strategy,
	pub selector: String,
}

impl Locator {
	pub fn new(strategy: Strategy, selector: impl Into<String>) -> Self {
		Self {
			strategy,
			selector: selector.into(),
		}
	}

	pub fn id(selector: impl Into<String>) -> Self {
		Self::new(Strategy::Id, selector)
	}

	pub fn xpath(selector: impl Into<String>) -> Self {
		Self::new(Strategy::XPath, selector)
	}

	pub fn css(selector: impl Into<String>) -> Self {
		Self::new(Strategy::Css, selector)
	}

	pub fn name(selector: impl Into<String>) -> Self {
		Self::new(Strategy::Name, selector)
	}

	pub fn tag(selector: impl Into<String>) -> Self {
		Self::new(Strategy::Tag, selector)
	}

	pub fn class_name(selector: impl Into<String>) -> Self {
		Self::new(Strategy::ClassName, selector)
	}

	pub fn link_text(selector: impl Into<String>) -> Self {
		Self::new(Strategy::LinkText, selector)
	}

	pub fn partial_link_text(selector: impl Into<String>) -> Self {
		Self::new(Strategy::PartialLinkText, selector)
	}

	/// Maps this locator onto the wrapped library's selector type.
	pub fn to_by(&self) -> By {
		let selector = self.selector.as_str();
		match self.strategy {
			Strategy::Id => By::Id(selector),
			Strategy::XPath => By::XPath(selector),
			Strategy::Css => By::Css(selector),
			Strategy::Name => By::Name(selector),
			Strategy::Tag => By::Tag(selector),
			Strategy::ClassName => By::ClassName(selector),
			Strategy::LinkText => By::LinkText(selector),
			Strategy::PartialLinkText => By::PartialLinkText(selector),
		}
	}
}

impl fmt::Display for Locator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} '{}'", self.strategy, self.selector)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn display_includes_strategy_and_selector() {
		assert_eq!(Locator::css(".btn.primary").to_string(), "css '.btn.primary'");
		assert_eq!(Locator::id("submit").to_string(), "id 'submit'");
		assert_eq!(
			Locator::partial_link_text("Sign").to_string(),
			"partial link text 'Sign'"
		);
	}

	#[test]
	fn constructors_set_strategy() {
		assert_eq!(Locator::xpath("//div").strategy, Strategy::XPath);
		assert_eq!(Locator::name("email").strategy, Strategy::Name);
		assert_eq!(Locator::tag("button").strategy, Strategy::Tag);
		assert_eq!(Locator::class_name("nav").strategy, Strategy::ClassName);
		assert_eq!(Locator::link_text("Home").strategy, Strategy::LinkText);
	}
}
