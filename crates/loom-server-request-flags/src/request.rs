// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Inbound contract from the host web framework.

use std::collections::HashMap;

use loom_request_flags_core::{CommunityId, FlagQueryContext, PersonId};
use serde_json::Value;

/// What the resolver needs from the request being served.
///
/// Hosts implement this over their own request, session and tenant types.
pub trait FlagRequest {
	/// Community resolved from the request's active tenant.
	fn community_id(&self) -> CommunityId;

	/// Person resolved from the authenticated session. None when anonymous.
	fn person_id(&self) -> Option<PersonId>;

	/// All values of a query parameter in the order given; empty if absent.
	fn query_values(&self, name: &str) -> Vec<String>;

	fn session_value(&self, key: &str) -> Option<Value>;

	fn set_session_value(&mut self, key: &str, value: Value);

	fn flag_query_context(&self) -> FlagQueryContext {
		FlagQueryContext {
			community_id: self.community_id(),
			person_id: self.person_id(),
		}
	}
}

/// Request backed by plain in-memory maps.
///
/// The session map can be taken out with [`MemoryRequest::into_session`] and
/// handed to the next request to carry state across a multi-request flow.
#[derive(Debug, Clone)]
pub struct MemoryRequest {
	community_id: CommunityId,
	person_id: Option<PersonId>,
	query: Vec<(String, String)>,
	session: HashMap<String, Value>,
}

impl MemoryRequest {
	pub fn new(community_id: CommunityId) -> Self {
		Self {
			community_id,
			person_id: None,
			query: Vec::new(),
			session: HashMap::new(),
		}
	}

	pub fn with_person(mut self, person_id: PersonId) -> Self {
		self.person_id = Some(person_id);
		self
	}

	/// Appends a query parameter value; repeat for multi-valued parameters.
	pub fn with_query_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.push((name.into(), value.into()));
		self
	}

	pub fn with_session_value(mut self, key: impl Into<String>, value: Value) -> Self {
		self.session.insert(key.into(), value);
		self
	}

	pub fn with_session(mut self, session: HashMap<String, Value>) -> Self {
		self.session = session;
		self
	}

	pub fn session(&self) -> &HashMap<String, Value> {
		&self.session
	}

	pub fn into_session(self) -> HashMap<String, Value> {
		self.session
	}
}

impl FlagRequest for MemoryRequest {
	fn community_id(&self) -> CommunityId {
		self.community_id
	}

	fn person_id(&self) -> Option<PersonId> {
		self.person_id
	}

	fn query_values(&self, name: &str) -> Vec<String> {
		self
			.query
			.iter()
			.filter(|(k, _)| k == name)
			.map(|(_, v)| v.clone())
			.collect()
	}

	fn session_value(&self, key: &str) -> Option<Value> {
		self.session.get(key).cloned()
	}

	fn set_session_value(&mut self, key: &str, value: Value) {
		self.session.insert(key.to_string(), value);
	}
}
