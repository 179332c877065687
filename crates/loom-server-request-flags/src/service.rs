// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Outbound contract to the flag storage service.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use loom_request_flags_core::{CommunityId, FeatureRecord, FeatureScope, FlagName, FlagSet, PersonId};
use tokio::sync::RwLock;
use tracing::instrument;

use crate::error::Result;

/// Read access to stored community and person flags.
#[async_trait]
pub trait FeatureFlagService: Send + Sync {
	/// Looks up the features stored for a scope.
	///
	/// `Ok(None)` means the service has no record for the scope and is mapped
	/// to an empty set by callers. `Err` is reserved for failures talking to the
	/// service.
	async fn get(&self, scope: &FeatureScope) -> Result<Option<FeatureRecord>>;
}

/// In-memory flag storage.
///
/// Cloning shares the underlying maps. Person flags are keyed by community and
/// person, so a person query without a person id never matches a record.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFlagService {
	inner: Arc<RwLock<StoreInner>>,
}

#[derive(Debug, Default)]
struct StoreInner {
	communities: HashMap<CommunityId, FlagSet>,
	persons: HashMap<(CommunityId, PersonId), FlagSet>,
}

impl InMemoryFlagService {
	pub fn new() -> Self {
		Self::default()
	}

	/// Replaces the community's feature set.
	pub async fn set_community_features(&self, community_id: CommunityId, features: FlagSet) {
		self
			.inner
			.write()
			.await
			.communities
			.insert(community_id, features);
	}

	pub async fn set_person_features(
		&self,
		community_id: CommunityId,
		person_id: PersonId,
		features: FlagSet,
	) {
		self
			.inner
			.write()
			.await
			.persons
			.insert((community_id, person_id), features);
	}

	pub async fn enable_for_community(&self, community_id: CommunityId, name: FlagName) {
		let mut inner = self.inner.write().await;
		inner.communities.entry(community_id).or_default().insert(name);
	}

	/// Removes a feature. The community keeps a (possibly empty) record.
	pub async fn disable_for_community(&self, community_id: CommunityId, name: &FlagName) {
		let mut inner = self.inner.write().await;
		inner
			.communities
			.entry(community_id)
			.or_default()
			.remove(name.as_str());
	}

	pub async fn enable_for_person(
		&self,
		community_id: CommunityId,
		person_id: PersonId,
		name: FlagName,
	) {
		let mut inner = self.inner.write().await;
		inner
			.persons
			.entry((community_id, person_id))
			.or_default()
			.insert(name);
	}

	pub async fn disable_for_person(
		&self,
		community_id: CommunityId,
		person_id: PersonId,
		name: &FlagName,
	) {
		let mut inner = self.inner.write().await;
		inner
			.persons
			.entry((community_id, person_id))
			.or_default()
			.remove(name.as_str());
	}

	pub async fn clear(&self) {
		let mut inner = self.inner.write().await;
		inner.communities.clear();
		inner.persons.clear();
	}
}

#[async_trait]
impl FeatureFlagService for InMemoryFlagService {
	#[instrument(skip(self), fields(community_id = %scope.community_id()))]
	async fn get(&self, scope: &FeatureScope) -> Result<Option<FeatureRecord>> {
		let inner = self.inner.read().await;
		let features = match scope {
			FeatureScope::Community { community_id } => inner.communities.get(community_id),
			FeatureScope::Person {
				community_id,
				person_id: Some(person_id),
			} => inner.persons.get(&(*community_id, *person_id)),
			FeatureScope::Person {
				person_id: None, ..
			} => None,
		};
		Ok(features.cloned().map(FeatureRecord::new))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn name(s: &str) -> FlagName {
		FlagName::new(s).unwrap()
	}

	#[tokio::test]
	async fn test_unknown_community_has_no_record() {
		let service = InMemoryFlagService::new();
		let scope = FeatureScope::Community {
			community_id: CommunityId::new(),
		};
		assert!(service.get(&scope).await.unwrap().is_none());
	}

	#[tokio::test]
	async fn test_enable_and_disable_for_community() {
		let service = InMemoryFlagService::new();
		let community_id = CommunityId::new();
		let scope = FeatureScope::Community { community_id };

		service.enable_for_community(community_id, name("foo")).await;
		service.enable_for_community(community_id, name("bar")).await;
		let record = service.get(&scope).await.unwrap().unwrap();
		assert_eq!(record.features.len(), 2);

		service.disable_for_community(community_id, &name("foo")).await;
		service.disable_for_community(community_id, &name("bar")).await;
		let record = service.get(&scope).await.unwrap().unwrap();
		assert!(record.features.is_empty());
	}

	#[tokio::test]
	async fn test_person_flags_are_scoped_to_community() {
		let service = InMemoryFlagService::new();
		let community_id = CommunityId::new();
		let person_id = PersonId::new();
		service
			.enable_for_person(community_id, person_id, name("beta"))
			.await;

		let own = FeatureScope::Person {
			community_id,
			person_id: Some(person_id),
		};
		let record = service.get(&own).await.unwrap().unwrap();
		assert!(record.features.contains("beta"));

		let other_community = FeatureScope::Person {
			community_id: CommunityId::new(),
			person_id: Some(person_id),
		};
		assert!(service.get(&other_community).await.unwrap().is_none());

		service
			.disable_for_person(community_id, person_id, &name("beta"))
			.await;
		let record = service.get(&own).await.unwrap().unwrap();
		assert!(record.features.is_empty());
	}

	#[tokio::test]
	async fn test_anonymous_person_query_has_no_record() {
		let service = InMemoryFlagService::new();
		let community_id = CommunityId::new();
		service
			.enable_for_community(community_id, name("community_only"))
			.await;

		let anonymous = FeatureScope::Person {
			community_id,
			person_id: None,
		};
		assert!(service.get(&anonymous).await.unwrap().is_none());
	}

	#[tokio::test]
	async fn test_clear() {
		let service = InMemoryFlagService::new();
		let community_id = CommunityId::new();
		service
			.set_community_features(community_id, [name("foo")].into_iter().collect())
			.await;
		service.clear().await;

		let scope = FeatureScope::Community { community_id };
		assert!(service.get(&scope).await.unwrap().is_none());
	}

	#[tokio::test]
	async fn test_clones_share_state() {
		let service = InMemoryFlagService::new();
		let clone = service.clone();
		let community_id = CommunityId::new();

		service.enable_for_community(community_id, name("foo")).await;

		let scope = FeatureScope::Community { community_id };
		assert!(clone.get(&scope).await.unwrap().is_some());
	}
}
