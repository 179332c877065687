// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-request flag resolution.
//!
//! A [`RequestFlags`] is created for each inbound request and owned by the
//! code handling it. `init` fetches and caches the three flag sources once;
//! every predicate after that reads the cached [`RequestFlagState`]. Querying
//! before `init` is an integration bug and fails with
//! [`FlagsError::UninitializedState`] rather than reporting "no flags".

use std::sync::Arc;

use loom_request_flags_core::{FlagName, FlagSet, FlagsError, RequestFlagState};
use tracing::{debug, instrument};

use crate::config::RequestFlagsConfig;
use crate::error::Result;
use crate::fetch::{fetch_community_flags, fetch_person_flags, fetch_temp_flags};
use crate::request::FlagRequest;
use crate::service::FeatureFlagService;

/// Feature flags resolved for one request.
pub struct RequestFlags<S: FeatureFlagService + ?Sized> {
	service: Arc<S>,
	config: Arc<RequestFlagsConfig>,
	state: Option<RequestFlagState>,
}

impl<S: FeatureFlagService + ?Sized> RequestFlags<S> {
	pub fn new(service: Arc<S>, config: Arc<RequestFlagsConfig>) -> Self {
		Self {
			service,
			config,
			state: None,
		}
	}

	/// Resolves and caches the request's flags.
	///
	/// Fetches community and person flags from the service and temporary flags
	/// from the session and query (admins only), then writes the temporary set
	/// back to the session so later requests keep it. Once a call succeeds,
	/// further calls return immediately without fetching or touching the
	/// session. A service error is returned as-is and leaves the request
	/// uninitialized.
	#[instrument(
		skip(self, request),
		fields(community_id = %request.community_id(), person_id = ?request.person_id())
	)]
	pub async fn init<R>(&mut self, request: &mut R, is_admin: bool) -> Result<()>
	where
		R: FlagRequest + ?Sized,
	{
		if self.state.is_some() {
			debug!("request flags already initialized, skipping");
			return Ok(());
		}

		let ctx = request.flag_query_context();
		let community_flags = fetch_community_flags(self.service.as_ref(), &ctx).await?;
		let person_flags = fetch_person_flags(self.service.as_ref(), &ctx).await?;
		let temp_flags = fetch_temp_flags(is_admin, &*request, &self.config);

		request.set_session_value(&self.config.session_key, serde_json::to_value(&temp_flags)?);

		let state = RequestFlagState::new(community_flags, person_flags, temp_flags);
		debug!(
			community = state.community_flags().len(),
			person = state.person_flags().len(),
			temp = state.temp_flags().len(),
			all = state.all_flags().len(),
			"request flags resolved"
		);
		self.state = Some(state);
		Ok(())
	}

	pub fn is_initialized(&self) -> bool {
		self.state.is_some()
	}

	/// The resolved state, or `UninitializedState` before `init`.
	pub fn state(&self) -> Result<&RequestFlagState> {
		self
			.state
			.as_ref()
			.ok_or_else(|| FlagsError::UninitializedState.into())
	}

	/// True if the flag is enabled from any source.
	pub fn is_enabled(&self, name: &FlagName) -> Result<bool> {
		Ok(self.state()?.all_flags().contains(name.as_str()))
	}

	/// True if the flag is enabled for the community, ignoring person and
	/// temporary flags.
	pub fn is_enabled_for_community(&self, name: &FlagName) -> Result<bool> {
		Ok(self.state()?.community_flags().contains(name.as_str()))
	}

	/// True if the flag is enabled for the person, ignoring community and
	/// temporary flags.
	pub fn is_enabled_for_user(&self, name: &FlagName) -> Result<bool> {
		Ok(self.state()?.person_flags().contains(name.as_str()))
	}

	/// Fails with `FeatureNotEnabled` unless the flag is enabled.
	pub fn require_enabled(&self, name: &FlagName) -> Result<()> {
		if self.is_enabled(name)? {
			Ok(())
		} else {
			Err(FlagsError::FeatureNotEnabled(name.clone()).into())
		}
	}

	/// Runs `action` only if the flag is enabled.
	pub fn with_feature<T, F>(&self, name: &FlagName, action: F) -> Result<Option<T>>
	where
		F: FnOnce() -> T,
	{
		Ok(self.is_enabled(name)?.then(action))
	}

	pub fn all_flags(&self) -> Result<&FlagSet> {
		Ok(self.state()?.all_flags())
	}

	pub fn community_flags(&self) -> Result<&FlagSet> {
		Ok(self.state()?.community_flags())
	}

	pub fn person_flags(&self) -> Result<&FlagSet> {
		Ok(self.state()?.person_flags())
	}

	pub fn temp_flags(&self) -> Result<&FlagSet> {
		Ok(self.state()?.temp_flags())
	}
}

impl<S: FeatureFlagService + ?Sized> std::fmt::Debug for RequestFlags<S> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RequestFlags")
			.field("config", &self.config)
			.field("state", &self.state)
			.finish_non_exhaustive()
	}
}
