// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use thiserror::Error;

/// Errors specific to request flag resolution on the server.
#[derive(Debug, Error)]
pub enum FlagsServerError {
	#[error(transparent)]
	Core(#[from] loom_request_flags_core::FlagsError),

	/// The flag storage service could not be reached or failed.
	///
	/// Distinct from the service having no record, which is not an error.
	#[error("flag service error: {message}")]
	Service { message: String },

	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	#[error(transparent)]
	Config(#[from] ConfigError),
}

impl FlagsServerError {
	pub fn service(message: impl Into<String>) -> Self {
		FlagsServerError::Service {
			message: message.into(),
		}
	}

	/// True if a flag was queried before the request was initialized.
	pub fn is_uninitialized(&self) -> bool {
		matches!(
			self,
			FlagsServerError::Core(loom_request_flags_core::FlagsError::UninitializedState)
		)
	}

	/// True if a gated feature was not enabled for the request.
	pub fn is_feature_not_enabled(&self) -> bool {
		matches!(
			self,
			FlagsServerError::Core(loom_request_flags_core::FlagsError::FeatureNotEnabled(_))
		)
	}
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("Invalid value for {key}: {message}")]
	InvalidValue { key: String, message: String },

	#[error("Failed to parse TOML config at {path}: {source}")]
	TomlParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Failed to read config file {path}: {source}")]
	FileRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Validation error: {0}")]
	Validation(String),
}

pub type Result<T> = std::result::Result<T, FlagsServerError>;

#[cfg(test)]
mod tests {
	use super::*;
	use loom_request_flags_core::{FlagName, FlagsError};

	#[test]
	fn test_error_kind_helpers() {
		let err = FlagsServerError::from(FlagsError::UninitializedState);
		assert!(err.is_uninitialized());
		assert!(!err.is_feature_not_enabled());

		let err = FlagsServerError::from(FlagsError::FeatureNotEnabled(
			FlagName::new("topbar_v1").unwrap(),
		));
		assert!(err.is_feature_not_enabled());
		assert_eq!(err.to_string(), "missing required feature: topbar_v1");

		let err = FlagsServerError::service("connection refused");
		assert!(!err.is_uninitialized());
		assert!(!err.is_feature_not_enabled());
	}
}
