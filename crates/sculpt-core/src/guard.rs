//! Recursion guard over the active resolution path
//!
//! The guard records which schemas are currently being resolved, innermost
//! last. A schema that is already on the path is not entered again; the
//! delegated field that asked for it is skipped instead. This bounds every
//! call chain on cyclic schema graphs.

/// Ordered stack of schema names under resolution
///
/// # Examples
///
/// ```
/// use sculpt_core::RecursionGuard;
///
/// let mut guard = RecursionGuard::new();
/// assert!(guard.enter("a"));
/// assert!(guard.enter("b"));
/// // `a` is already being resolved further up the path
/// assert!(!guard.enter("a"));
/// assert_eq!(guard.path(), ["a", "b"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecursionGuard {
	stack: Vec<String>,
}

impl RecursionGuard {
	/// Number of simultaneous entries a name may have once pushed
	pub const MAX_ENTRIES: usize = 1;

	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, name: impl Into<String>) {
		self.stack.push(name.into());
	}

	pub fn pop(&mut self) -> Option<String> {
		self.stack.pop()
	}

	/// Occurrences of `name` on the stack
	pub fn count(&self, name: &str) -> usize {
		self.stack.iter().filter(|entry| entry.as_str() == name).count()
	}

	/// Push `name` and report whether resolution may proceed
	///
	/// When the push makes `name` occur more than [`Self::MAX_ENTRIES`]
	/// times, it is undone and `false` is returned, leaving the stack as it
	/// was. Every `true` must be matched by exactly one [`Self::pop`].
	pub fn enter(&mut self, name: &str) -> bool {
		self.push(name);
		if self.count(name) > Self::MAX_ENTRIES {
			self.pop();
			return false;
		}
		true
	}

	pub fn depth(&self) -> usize {
		self.stack.len()
	}

	pub fn is_empty(&self) -> bool {
		self.stack.is_empty()
	}

	/// Active resolution path, outermost first
	pub fn path(&self) -> &[String] {
		&self.stack
	}

	pub fn reset(&mut self) {
		self.stack.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_push_pop_count() {
		// Arrange
		let mut guard = RecursionGuard::new();

		// Act
		guard.push("user");
		guard.push("photo");
		guard.push("user");

		// Assert
		assert_eq!(guard.count("user"), 2);
		assert_eq!(guard.count("photo"), 1);
		assert_eq!(guard.count("missing"), 0);
		assert_eq!(guard.pop().as_deref(), Some("user"));
		assert_eq!(guard.depth(), 2);
	}

	#[rstest]
	fn test_enter_refuses_reentry_and_stays_balanced() {
		let mut guard = RecursionGuard::new();
		assert!(guard.enter("node"));

		assert!(!guard.enter("node"));

		assert_eq!(guard.depth(), 1);
		assert_eq!(guard.count("node"), 1);
	}

	#[rstest]
	fn test_sibling_entries_are_allowed_after_leaving() {
		let mut guard = RecursionGuard::new();
		assert!(guard.enter("user"));
		assert!(guard.enter("photo"));
		guard.pop();

		assert!(guard.enter("photo"));
		assert_eq!(guard.path(), ["user", "photo"]);
	}

	#[rstest]
	fn test_reset_clears_path() {
		let mut guard = RecursionGuard::new();
		guard.push("a");
		guard.push("b");

		guard.reset();

		assert!(guard.is_empty());
		assert!(guard.pop().is_none());
	}
}
