//! Driver event listeners.
//!
//! Explicit composition replaces the wrapped library's event-firing driver
//! wrapper: listeners are registered on the driver at construction time and
//! invoked synchronously around navigation and element commands. Hooks
//! default to no-ops so implementors pick the events they care about.

use std::sync::Arc;

use crate::locator::Locator;

/// Hooks fired around driver activity.
///
/// Implementations must be cheap and non-blocking; they run inline on the
/// calling task.
pub trait DriverListener: Send + Sync {
	/// Fired before the browser is told to navigate.
	fn before_navigate(&self, url: &str) {
		let _ = url;
	}

	/// Fired after a navigation returned successfully.
	fn after_navigate(&self, url: &str) {
		let _ = url;
	}

	/// Fired before an element command, with the command name and target.
	fn before_command(&self, command: &str, locator: &Locator) {
		let _ = (command, locator);
	}

	/// Fired after an element command returned successfully.
	fn after_command(&self, command: &str, locator: &Locator) {
		let _ = (command, locator);
	}

	/// Fired when the session is quit.
	fn on_quit(&self) {}
}

/// Registered listener set; dispatches each hook in registration order.
#[derive(Clone, Default)]
pub(crate) struct Listeners(Vec<Arc<dyn DriverListener>>);

impl Listeners {
	pub(crate) fn push(&mut self, listener: Arc<dyn DriverListener>) {
		self.0.push(listener);
	}

	pub(crate) fn before_navigate(&self, url: &str) {
		for l in &self.0 {
			l.before_navigate(url);
		}
	}

	pub(crate) fn after_navigate(&self, url: &str) {
		for l in &self.0 {
			l.after_navigate(url);
		}
	}

	pub(crate) fn before_command(&self, command: &str, locator: &Locator) {
		for l in &self.0 {
			l.before_command(command, locator);
		}
	}

	pub(crate) fn after_command(&self, command: &str, locator: &Locator) {
		for l in &self.0 {
			l.after_command(command, locator);
		}
	}

	pub(crate) fn on_quit(&self) {
		for l in &self.0 {
			l.on_quit();
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Mutex;

	#[derive(Default)]
	struct Recording {
		events: Mutex<Vec<String>>,
	}

	impl DriverListener for Recording {
		fn before_navigate(&self, url: &str) {
			self.events.lock().unwrap().push(format!("before_navigate {url}"));
		}

		fn after_navigate(&self, url: &str) {
			self.events.lock().unwrap().push(format!("after_navigate {url}"));
		}

		fn before_command(&self, command: &str, locator: &Locator) {
			self.events
				.lock()
				.unwrap()
				.push(format!("before {command} {locator}"));
		}

		fn after_command(&self, command: &str, locator: &Locator) {
			self.events
				.lock()
				.unwrap()
				.push(format!("after {command} {locator}"));
		}

		fn on_quit(&self) {
			self.events.lock().unwrap().push("quit".to_string());
		}
	}

	#[test]
	fn hooks_fire_in_registration_order() {
		let first = Arc::new(Recording::default());
		let second = Arc::new(Recording::default());

		let mut listeners = Listeners::default();
		listeners.push(first.clone());
		listeners.push(second.clone());

		let locator = Locator::css("#go");
		listeners.before_navigate("https://app.test/");
		listeners.after_navigate("https://app.test/");
		listeners.before_command("click", &locator);
		listeners.after_command("click", &locator);
		listeners.on_quit();

		let expected = vec![
			"before_navigate https://app.test/".to_string(),
			"after_navigate https://app.test/".to_string(),
			"before click css '#go'".to_string(),
			"after click css '#go'".to_string(),
			"quit".to_string(),
		];
		assert_eq!(*first.events.lock().unwrap(), expected);
		assert_eq!(*second.events.lock().unwrap(), expected);
	}

	#[test]
	fn default_hooks_are_no_ops() {
		struct Silent;
		impl DriverListener for Silent {}

		let mut listeners = Listeners::default();
		listeners.push(Arc::new(Silent));
		listeners.before_command("text", &Locator::id("x"));
		listeners.on_quit();
	}
}
