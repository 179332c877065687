// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Fetching each of the three flag sources.

use loom_request_flags_core::{FlagName, FlagQueryContext, FlagSet};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::RequestFlagsConfig;
use crate::error::Result;
use crate::request::FlagRequest;
use crate::service::FeatureFlagService;

/// Flags enabled for the whole community. No record means no flags.
#[instrument(skip(service, ctx), fields(community_id = %ctx.community_id))]
pub async fn fetch_community_flags<S>(service: &S, ctx: &FlagQueryContext) -> Result<FlagSet>
where
	S: FeatureFlagService + ?Sized,
{
	let record = service.get(&ctx.community_scope()).await?;
	let flags = record.map(|r| r.features).unwrap_or_default();
	debug!(count = flags.len(), "fetched community flags");
	Ok(flags)
}

/// Flags enabled for the person within the community.
///
/// Anonymous requests still query the service with no person id.
#[instrument(
	skip(service, ctx),
	fields(community_id = %ctx.community_id, person_id = ?ctx.person_id)
)]
pub async fn fetch_person_flags<S>(service: &S, ctx: &FlagQueryContext) -> Result<FlagSet>
where
	S: FeatureFlagService + ?Sized,
{
	let record = service.get(&ctx.person_scope()).await?;
	let flags = record.map(|r| r.features).unwrap_or_default();
	debug!(count = flags.len(), "fetched person flags");
	Ok(flags)
}

/// Temporary override flags: the session copy plus the override parameter.
///
/// Always empty for non-admins; neither the session nor the query is read.
pub fn fetch_temp_flags<R>(is_admin: bool, request: &R, config: &RequestFlagsConfig) -> FlagSet
where
	R: FlagRequest + ?Sized,
{
	if !is_admin {
		return FlagSet::new();
	}

	let from_session = session_flags(request.session_value(&config.session_key));
	let from_params = param_flags(request.query_values(&config.override_param));

	from_session.union(&from_params)
}

fn session_flags(value: Option<Value>) -> FlagSet {
	match value {
		None | Some(Value::Null) => FlagSet::new(),
		Some(Value::Array(items)) => items
			.iter()
			.filter_map(|item| match item.as_str() {
				Some(name) => valid_name(name, "session"),
				None => {
					warn!(entry = %item, "ignoring non-string temporary flag in session");
					None
				}
			})
			.collect(),
		Some(other) => {
			warn!(value = %other, "ignoring malformed temporary flags in session");
			FlagSet::new()
		}
	}
}

fn param_flags(values: Vec<String>) -> FlagSet {
	values
		.iter()
		.filter_map(|name| valid_name(name, "query"))
		.collect()
}

fn valid_name(name: &str, source: &'static str) -> Option<FlagName> {
	match FlagName::new(name) {
		Ok(name) => Some(name),
		Err(e) => {
			warn!(source, error = %e, "ignoring invalid temporary flag");
			None
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::request::MemoryRequest;
	use crate::service::InMemoryFlagService;
	use loom_request_flags_core::{CommunityId, PersonId};
	use serde_json::json;

	fn set(names: &[&str]) -> FlagSet {
		names.iter().map(|n| FlagName::new(n).unwrap()).collect()
	}

	fn admin_request() -> MemoryRequest {
		MemoryRequest::new(CommunityId::new())
			.with_session_value("feature_flags", json!(["a"]))
			.with_query_value("enable_feature", "b")
	}

	#[tokio::test]
	async fn test_community_flags_default_to_empty() {
		let service = InMemoryFlagService::new();
		let ctx = FlagQueryContext::new(CommunityId::new());
		assert!(fetch_community_flags(&service, &ctx).await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_community_flags_from_record() {
		let service = InMemoryFlagService::new();
		let community_id = CommunityId::new();
		service
			.set_community_features(community_id, set(&["topbar_v1"]))
			.await;

		let ctx = FlagQueryContext::new(community_id);
		let flags = fetch_community_flags(&service, &ctx).await.unwrap();
		assert_eq!(flags, set(&["topbar_v1"]));
	}

	#[tokio::test]
	async fn test_person_flags_anonymous_is_empty() {
		let service = InMemoryFlagService::new();
		let community_id = CommunityId::new();
		service.set_community_features(community_id, set(&["c"])).await;

		let ctx = FlagQueryContext::new(community_id);
		assert!(fetch_person_flags(&service, &ctx).await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_person_flags_from_record() {
		let service = InMemoryFlagService::new();
		let community_id = CommunityId::new();
		let person_id = PersonId::new();
		service
			.set_person_features(community_id, person_id, set(&["p1"]))
			.await;

		let ctx = FlagQueryContext::new(community_id).with_person(person_id);
		assert_eq!(fetch_person_flags(&service, &ctx).await.unwrap(), set(&["p1"]));
	}

	#[test]
	fn test_temp_flags_ignored_for_non_admin() {
		let flags = fetch_temp_flags(false, &admin_request(), &RequestFlagsConfig::default());
		assert!(flags.is_empty());
	}

	#[test]
	fn test_temp_flags_union_session_and_params() {
		let flags = fetch_temp_flags(true, &admin_request(), &RequestFlagsConfig::default());
		assert_eq!(flags, set(&["a", "b"]));
	}

	#[test]
	fn test_temp_flags_absent_inputs() {
		let request = MemoryRequest::new(CommunityId::new());
		let flags = fetch_temp_flags(true, &request, &RequestFlagsConfig::default());
		assert!(flags.is_empty());
	}

	#[test]
	fn test_temp_flags_malformed_session() {
		let request = MemoryRequest::new(CommunityId::new())
			.with_session_value("feature_flags", json!({"a": true}))
			.with_query_value("enable_feature", "b");
		let flags = fetch_temp_flags(true, &request, &RequestFlagsConfig::default());
		assert_eq!(flags, set(&["b"]));
	}

	#[test]
	fn test_temp_flags_skip_invalid_entries() {
		let request = MemoryRequest::new(CommunityId::new())
			.with_session_value("feature_flags", json!(["a", 7, "not valid"]))
			.with_query_value("enable_feature", "b")
			.with_query_value("enable_feature", "");
		let flags = fetch_temp_flags(true, &request, &RequestFlagsConfig::default());
		assert_eq!(flags, set(&["a", "b"]));
	}

	#[test]
	fn test_temp_flags_use_configured_names() {
		let config = RequestFlagsConfig {
			session_key: "admin_flags".to_string(),
			override_param: "ff".to_string(),
		};
		let request = MemoryRequest::new(CommunityId::new())
			.with_session_value("admin_flags", json!(["x"]))
			.with_session_value("feature_flags", json!(["ignored"]))
			.with_query_value("ff", "y")
			.with_query_value("enable_feature", "also_ignored");

		let flags = fetch_temp_flags(true, &request, &config);
		assert_eq!(flags, set(&["x", "y"]));
	}
}
