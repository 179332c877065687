// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::FlagSet;

/// Unique identifier for a community (tenant/marketplace).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommunityId(pub Uuid);

impl CommunityId {
	pub fn new() -> Self {
		Self(Uuid::new_v4())
	}
}

impl Default for CommunityId {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Display for CommunityId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl std::str::FromStr for CommunityId {
	type Err = uuid::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self(Uuid::parse_str(s)?))
	}
}

/// Unique identifier for an authenticated person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonId(pub Uuid);

impl PersonId {
	pub fn new() -> Self {
		Self(Uuid::new_v4())
	}
}

impl Default for PersonId {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Display for PersonId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl std::str::FromStr for PersonId {
	type Err = uuid::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self(Uuid::parse_str(s)?))
	}
}

/// Identity inputs used to fetch flags for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagQueryContext {
	pub community_id: CommunityId,
	/// None for anonymous requests.
	pub person_id: Option<PersonId>,
}

impl FlagQueryContext {
	pub fn new(community_id: CommunityId) -> Self {
		Self {
			community_id,
			person_id: None,
		}
	}

	pub fn with_person(mut self, person_id: PersonId) -> Self {
		self.person_id = Some(person_id);
		self
	}

	/// Query for flags enabled on the whole community.
	pub fn community_scope(&self) -> FeatureScope {
		FeatureScope::Community {
			community_id: self.community_id,
		}
	}

	/// Query for flags enabled on the person within the community.
	///
	/// An anonymous request still produces a person query with no person id.
	pub fn person_scope(&self) -> FeatureScope {
		FeatureScope::Person {
			community_id: self.community_id,
			person_id: self.person_id,
		}
	}
}

/// Shape of a query sent to the flag storage service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum FeatureScope {
	Community {
		community_id: CommunityId,
	},
	Person {
		community_id: CommunityId,
		person_id: Option<PersonId>,
	},
}

impl FeatureScope {
	pub fn community_id(&self) -> CommunityId {
		match self {
			FeatureScope::Community { community_id } => *community_id,
			FeatureScope::Person { community_id, .. } => *community_id,
		}
	}

	pub fn person_id(&self) -> Option<PersonId> {
		match self {
			FeatureScope::Community { .. } => None,
			FeatureScope::Person { person_id, .. } => *person_id,
		}
	}
}

/// A present result from the flag storage service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureRecord {
	pub features: FlagSet,
}

impl FeatureRecord {
	pub fn new(features: FlagSet) -> Self {
		Self { features }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_person_scope_passes_through_anonymous() {
		let community_id = CommunityId::new();
		let ctx = FlagQueryContext::new(community_id);

		assert_eq!(
			ctx.person_scope(),
			FeatureScope::Person {
				community_id,
				person_id: None,
			}
		);
		assert_ne!(ctx.person_scope(), ctx.community_scope());
	}

	#[test]
	fn test_scope_accessors() {
		let community_id = CommunityId::new();
		let person_id = PersonId::new();
		let ctx = FlagQueryContext::new(community_id).with_person(person_id);

		assert_eq!(ctx.community_scope().community_id(), community_id);
		assert_eq!(ctx.community_scope().person_id(), None);
		assert_eq!(ctx.person_scope().person_id(), Some(person_id));
	}

	#[test]
	fn test_id_roundtrip_through_string() {
		let id = PersonId::new();
		let parsed: PersonId = id.to_string().parse().unwrap();
		assert_eq!(id, parsed);
		assert!("not-a-uuid".parse::<CommunityId>().is_err());
	}
}
