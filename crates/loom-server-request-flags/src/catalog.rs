// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Catalog of features that admins can toggle.
//!
//! Provides the data behind an admin feature list: each known feature with
//! whether it is currently enabled for the community and for the signed-in
//! user, plus helpers to turn a submitted toggle form back into flag names.

use std::collections::HashMap;

use loom_request_flags_core::{FlagName, FlagSet};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::resolver::RequestFlags;
use crate::service::FeatureFlagService;

/// A feature known to the admin UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureDescriptor {
	pub title: String,
	pub name: FlagName,
}

impl FeatureDescriptor {
	pub fn new(title: impl Into<String>, name: FlagName) -> Self {
		Self {
			title: title.into(),
			name,
		}
	}
}

/// A catalog feature with its enabled state for the current request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureStatus {
	pub title: String,
	pub name: FlagName,
	pub enabled_for_user: bool,
	pub enabled_for_community: bool,
}

/// Ordered list of toggleable features.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureCatalog {
	features: Vec<FeatureDescriptor>,
}

impl FeatureCatalog {
	pub fn new(features: Vec<FeatureDescriptor>) -> Self {
		Self { features }
	}

	pub fn features(&self) -> &[FeatureDescriptor] {
		&self.features
	}

	/// Current per-feature state, in catalog order.
	///
	/// Fails with `UninitializedState` if the request flags were not resolved.
	pub fn statuses<S>(&self, flags: &RequestFlags<S>) -> Result<Vec<FeatureStatus>>
	where
		S: FeatureFlagService + ?Sized,
	{
		self
			.features
			.iter()
			.map(|f| -> Result<FeatureStatus> {
				Ok(FeatureStatus {
					title: f.title.clone(),
					name: f.name.clone(),
					enabled_for_user: flags.is_enabled_for_user(&f.name)?,
					enabled_for_community: flags.is_enabled_for_community(&f.name)?,
				})
			})
			.collect()
	}

	/// Catalog features not in `enabled`, in catalog order.
	pub fn resolve_disabled(&self, enabled: &FlagSet) -> Vec<FlagName> {
		self
			.features
			.iter()
			.filter(|f| !enabled.contains(f.name.as_str()))
			.map(|f| f.name.clone())
			.collect()
	}
}

/// Names from a submitted toggle form whose value is exactly `"true"`.
///
/// Keys that are not valid flag names are skipped.
pub fn enabled_features(params: &HashMap<String, String>) -> FlagSet {
	params
		.iter()
		.filter(|(_, value)| value.as_str() == "true")
		.filter_map(|(key, _)| match FlagName::new(key) {
			Ok(name) => Some(name),
			Err(e) => {
				warn!(error = %e, "ignoring invalid feature in toggle form");
				None
			}
		})
		.collect()
}
