//! Conditions evaluated against a resolved element.
//!
//! A condition is a predicate plus a human description; the description is
//! what shows up in `ConditionFailed` errors, so it reads like the assertion
//! ("text \"Welcome\"", "visible").

use std::fmt;

use thirtyfour::WebElement;

use crate::error::Result;

/// A predicate over a resolved DOM element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
	/// Exact (trimmed) text match.
	Text(String),
	/// Text contains the needle.
	TextContains(String),
	/// Attribute present with an exact value.
	Attribute { name: String, value: String },
	/// Form control value.
	Value(String),
	/// Tag name (case-insensitive).
	TagName(String),
	Visible,
	Hidden,
	Enabled,
	Disabled,
	Selected,
	/// Visible and enabled.
	Clickable,
	/// The locator resolves to an element at all.
	Present,
}

impl Condition {
	pub fn text(expected: impl Into<String>) -> Self {
		Condition::Text(expected.into())
	}

	pub fn text_contains(needle: impl Into<String>) -> Self {
		Condition::TextContains(needle.into())
	}

	pub fn attribute(name: impl Into<String>, value: impl Into<String>) -> Self {
		Condition::Attribute {
			name: name.into(),
			value: value.into(),
		}
	}

	pub fn value(expected: impl Into<String>) -> Self {
		Condition::Value(expected.into())
	}

	pub fn tag_name(expected: impl Into<String>) -> Self {
		Condition::TagName(expected.into())
	}

	/// Evaluates this condition against a resolved element.
	pub async fn check(&self, element: &WebElement) -> Result<bool> {
		let met = match self {
			Condition::Text(expected) => element.text().await?.trim() == expected,
			Condition::TextContains(needle) => element.text().await?.contains(needle.as_str()),
			Condition::Attribute { name, value } => {
				element.attr(name).await?.as_deref() == Some(value.as_str())
			}
			Condition::Value(expected) => {
				element.value().await?.as_deref() == Some(expected.as_str())
			}
			Condition::TagName(expected) => {
				element.tag_name().await?.eq_ignore_ascii_case(expected)
			}
			Condition::Visible => element.is_displayed().await?,
			Condition::Hidden => !element.is_displayed().await?,
			Condition::Enabled => element.is_enabled().await?,
			Condition::Disabled => !element.is_enabled().await?,
			Condition::Selected => element.is_selected().await?,
			Condition::Clickable => {
				element.is_displayed().await? && element.is_enabled().await?
			}
			Condition::Present => true,
		};
		Ok(met)
	}
}

impl fmt::Display for Condition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Condition::Text(expected) => write!(f, "text \"{expected}\""),
			Condition::TextContains(needle) => write!(f, "text containing \"{needle}\""),
			Condition::Attribute { name, value } => write!(f, "attribute {name}=\"{value}\""),
			Condition::Value(expected) => write!(f, "value \"{expected}\""),
			Condition::TagName(expected) => write!(f, "tag name \"{expected}\""),
			Condition::Visible => f.write_str("visible"),
			Condition::Hidden => f.write_str("hidden"),
			Condition::Enabled => f.write_str("enabled"),
			Condition::Disabled => f.write_str("disabled"),
			Condition::Selected => f.write_str("selected"),
			Condition::Clickable => f.write_str("clickable"),
			Condition::Present => f.write_str("present"),
		}
	}
}
