// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::Serialize;

use crate::FlagSet;

/// Flags resolved for a single request.
///
/// Built once from the three sources; `all_flags` is their union and is
/// therefore a superset of each. There are no mutators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestFlagState {
	community_flags: FlagSet,
	person_flags: FlagSet,
	temp_flags: FlagSet,
	all_flags: FlagSet,
}

impl RequestFlagState {
	pub fn new(community_flags: FlagSet, person_flags: FlagSet, temp_flags: FlagSet) -> Self {
		let all_flags = community_flags.union(&person_flags).union(&temp_flags);
		Self {
			community_flags,
			person_flags,
			temp_flags,
			all_flags,
		}
	}

	pub fn community_flags(&self) -> &FlagSet {
		&self.community_flags
	}

	pub fn person_flags(&self) -> &FlagSet {
		&self.person_flags
	}

	/// Admin-only overrides from session and query parameters.
	pub fn temp_flags(&self) -> &FlagSet {
		&self.temp_flags
	}

	pub fn all_flags(&self) -> &FlagSet {
		&self.all_flags
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::FlagName;

	fn set(names: &[&str]) -> FlagSet {
		names.iter().map(|n| FlagName::new(n).unwrap()).collect()
	}

	#[test]
	fn test_all_flags_is_union() {
		let state = RequestFlagState::new(set(&["c1", "shared"]), set(&["p1", "shared"]), set(&["t1"]));

		assert_eq!(state.all_flags(), &set(&["c1", "p1", "shared", "t1"]));
		assert_eq!(state.community_flags(), &set(&["c1", "shared"]));
		assert_eq!(state.person_flags(), &set(&["p1", "shared"]));
		assert_eq!(state.temp_flags(), &set(&["t1"]));
	}

	#[test]
	fn test_empty_sources() {
		let state = RequestFlagState::new(FlagSet::new(), FlagSet::new(), FlagSet::new());
		assert!(state.all_flags().is_empty());
	}
}
