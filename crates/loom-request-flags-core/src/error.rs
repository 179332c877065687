// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

use crate::FlagName;

/// Errors that can occur while resolving or querying request feature flags.
#[derive(Debug, Error)]
pub enum FlagsError {
	/// A flag predicate was evaluated before `init` completed for the request.
	#[error("feature flags not initialized for this request, call init first")]
	UninitializedState,

	/// A required feature is not enabled for the request.
	#[error("missing required feature: {0}")]
	FeatureNotEnabled(FlagName),

	#[error("invalid flag name: {0:?}")]
	InvalidFlagName(String),

	#[error("serialization error: {0}")]
	Serialization(String),
}

impl From<serde_json::Error> for FlagsError {
	fn from(err: serde_json::Error) -> Self {
		FlagsError::Serialization(err.to_string())
	}
}

pub type Result<T> = std::result::Result<T, FlagsError>;
