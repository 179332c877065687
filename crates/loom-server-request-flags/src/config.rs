// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request flag configuration.
//!
//! Layered the same way as the rest of the server config: built-in defaults,
//! then an optional TOML file, then `LOOM_SERVER_FLAGS_*` environment
//! variables, each overriding the one before.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ConfigError;

pub const DEFAULT_SESSION_KEY: &str = "feature_flags";
pub const DEFAULT_OVERRIDE_PARAM: &str = "enable_feature";

pub const ENV_SESSION_KEY: &str = "LOOM_SERVER_FLAGS_SESSION_KEY";
pub const ENV_OVERRIDE_PARAM: &str = "LOOM_SERVER_FLAGS_OVERRIDE_PARAM";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestFlagsConfigLayer {
	#[serde(default)]
	pub session_key: Option<String>,
	#[serde(default)]
	pub override_param: Option<String>,
}

impl RequestFlagsConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.session_key.is_some() {
			self.session_key = other.session_key;
		}
		if other.override_param.is_some() {
			self.override_param = other.override_param;
		}
	}

	pub fn finalize(self) -> Result<RequestFlagsConfig, ConfigError> {
		let config = RequestFlagsConfig {
			session_key: self
				.session_key
				.unwrap_or_else(|| DEFAULT_SESSION_KEY.to_string()),
			override_param: self
				.override_param
				.unwrap_or_else(|| DEFAULT_OVERRIDE_PARAM.to_string()),
		};
		config.validate()?;
		Ok(config)
	}

	/// Parses a layer from TOML text.
	pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
		toml::from_str(content).map_err(|e| ConfigError::TomlParse {
			path: path.to_path_buf(),
			source: e,
		})
	}

	/// Reads a layer from a TOML file. A missing file yields an empty layer.
	pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
		if !path.exists() {
			debug!(path = %path.display(), "config file not found, skipping");
			return Ok(Self::default());
		}

		debug!(path = %path.display(), "loading config file");
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
			path: path.to_path_buf(),
			source: e,
		})?;
		Self::from_toml_str(&content, path)
	}

	/// Convention: LOOM_SERVER_FLAGS_<FIELD>. Empty values are ignored.
	pub fn from_env() -> Self {
		Self {
			session_key: env_var(ENV_SESSION_KEY),
			override_param: env_var(ENV_OVERRIDE_PARAM),
		}
	}
}

/// Resolved request flag configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestFlagsConfig {
	/// Session key holding the admin's accumulated temporary flags.
	pub session_key: String,
	/// Repeated query parameter whose values enable temporary flags.
	pub override_param: String,
}

impl Default for RequestFlagsConfig {
	fn default() -> Self {
		Self {
			session_key: DEFAULT_SESSION_KEY.to_string(),
			override_param: DEFAULT_OVERRIDE_PARAM.to_string(),
		}
	}
}

impl RequestFlagsConfig {
	fn validate(&self) -> Result<(), ConfigError> {
		check_key("session_key", &self.session_key)?;
		check_key("override_param", &self.override_param)
	}
}

fn check_key(key: &str, value: &str) -> Result<(), ConfigError> {
	if value.is_empty() {
		return Err(ConfigError::Validation(format!("{key} must not be empty")));
	}
	if value.chars().any(char::is_whitespace) {
		return Err(ConfigError::InvalidValue {
			key: key.to_string(),
			message: format!("'{value}' contains whitespace"),
		});
	}
	Ok(())
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

/// Load configuration from defaults and environment.
pub fn load_config() -> Result<RequestFlagsConfig, ConfigError> {
	let mut merged = RequestFlagsConfigLayer::default();
	merged.merge(RequestFlagsConfigLayer::from_env());
	finalize(merged)
}

/// Load configuration from defaults, a TOML file, and environment.
pub fn load_config_with_file(
	config_path: impl Into<PathBuf>,
) -> Result<RequestFlagsConfig, ConfigError> {
	let config_path = config_path.into();
	let mut merged = RequestFlagsConfigLayer::default();
	merged.merge(RequestFlagsConfigLayer::from_file(&config_path)?);
	merged.merge(RequestFlagsConfigLayer::from_env());
	finalize(merged)
}

fn finalize(layer: RequestFlagsConfigLayer) -> Result<RequestFlagsConfig, ConfigError> {
	let config = layer.finalize()?;
	info!(
		session_key = %config.session_key,
		override_param = %config.override_param,
		"request flags configuration loaded"
	);
	Ok(config)
}
