// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{FlagsError, Result};

/// Validated, case-sensitive feature flag identifier.
///
/// Names are checked once at construction so a typo surfaces where the name is
/// built rather than as a silently-false membership test later. Clones share
/// the underlying string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FlagName(Arc<str>);

impl FlagName {
	pub const MAX_LEN: usize = 100;

	/// Creates a flag name, rejecting anything that fails [`FlagName::validate`].
	pub fn new(name: impl AsRef<str>) -> Result<Self> {
		let name = name.as_ref();
		if !Self::validate(name) {
			return Err(FlagsError::InvalidFlagName(name.to_string()));
		}
		Ok(Self(Arc::from(name)))
	}

	/// Validates the flag name format.
	///
	/// Valid names:
	/// - 1-100 ASCII characters
	/// - Start with a letter (either case)
	/// - Letters, digits, underscores and dots
	/// - No trailing dot and no consecutive dots
	pub fn validate(name: &str) -> bool {
		if name.is_empty() || name.len() > Self::MAX_LEN {
			return false;
		}

		let mut chars = name.chars();

		match chars.next() {
			Some(c) if c.is_ascii_alphabetic() => {}
			_ => return false,
		}

		let mut prev_was_dot = false;
		for c in chars {
			if c == '.' {
				if prev_was_dot {
					return false;
				}
				prev_was_dot = true;
			} else if c.is_ascii_alphanumeric() || c == '_' {
				prev_was_dot = false;
			} else {
				return false;
			}
		}

		!prev_was_dot
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for FlagName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl FromStr for FlagName {
	type Err = FlagsError;

	fn from_str(s: &str) -> Result<Self> {
		Self::new(s)
	}
}

impl TryFrom<String> for FlagName {
	type Error = FlagsError;

	fn try_from(value: String) -> Result<Self> {
		Self::new(value)
	}
}

impl TryFrom<&str> for FlagName {
	type Error = FlagsError;

	fn try_from(value: &str) -> Result<Self> {
		Self::new(value)
	}
}

impl From<FlagName> for String {
	fn from(name: FlagName) -> Self {
		name.0.to_string()
	}
}

impl AsRef<str> for FlagName {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl Borrow<str> for FlagName {
	fn borrow(&self) -> &str {
		&self.0
	}
}

/// An unordered collection of flag names; duplicates collapse.
///
/// Backed by a `BTreeSet` so that serialized output (e.g. the session copy of
/// temporary flags) is stable across requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagSet(BTreeSet<FlagName>);

impl FlagSet {
	pub fn new() -> Self {
		Self(BTreeSet::new())
	}

	/// Adds a flag. Returns false if it was already present.
	pub fn insert(&mut self, name: FlagName) -> bool {
		self.0.insert(name)
	}

	/// Removes a flag. Returns false if it was not present.
	pub fn remove(&mut self, name: &str) -> bool {
		self.0.remove(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.0.contains(name)
	}

	/// Returns a new set holding every flag in `self` or `other`.
	pub fn union(&self, other: &FlagSet) -> FlagSet {
		Self(self.0.union(&other.0).cloned().collect())
	}

	pub fn is_superset(&self, other: &FlagSet) -> bool {
		self.0.is_superset(&other.0)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &FlagName> {
		self.0.iter()
	}
}

impl FromIterator<FlagName> for FlagSet {
	fn from_iter<I: IntoIterator<Item = FlagName>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

impl Extend<FlagName> for FlagSet {
	fn extend<I: IntoIterator<Item = FlagName>>(&mut self, iter: I) {
		self.0.extend(iter);
	}
}

impl IntoIterator for FlagSet {
	type Item = FlagName;
	type IntoIter = std::collections::btree_set::IntoIter<FlagName>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

impl<'a> IntoIterator for &'a FlagSet {
	type Item = &'a FlagName;
	type IntoIter = std::collections::btree_set::Iter<'a, FlagName>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}
