// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request-scoped feature flag resolution for the Loom server.
//!
//! For each request the resolver combines three flag sources into one
//! read-only view that lives as long as the request:
//! - Community flags and person flags, read from a [`FeatureFlagService`]
//! - Temporary flags, which admins enable with a repeated query parameter and
//!   which accumulate in the session across requests
//!
//! # Architecture
//!
//! - `resolver` - [`RequestFlags`], the per-request cache and predicates
//! - `fetch` - the three source fetches
//! - `service` - outbound flag storage trait and an in-memory store
//! - `request` - inbound host trait for session, query and identity
//! - `catalog` - admin feature list data
//! - `config` - layered configuration for session key and parameter name
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use loom_server_request_flags::{
//!     FlagName, InMemoryFlagService, MemoryRequest, RequestFlags, RequestFlagsConfig,
//! };
//!
//! let service = Arc::new(InMemoryFlagService::new());
//! let config = Arc::new(RequestFlagsConfig::default());
//!
//! // One per request
//! let mut flags = RequestFlags::new(service, config);
//! flags.init(&mut request, user_is_admin).await?;
//!
//! flags.require_enabled(&FlagName::new("topbar_v1")?)?;
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod fetch;
pub mod request;
pub mod resolver;
pub mod service;

pub use catalog::{enabled_features, FeatureCatalog, FeatureDescriptor, FeatureStatus};
pub use config::{load_config, load_config_with_file, RequestFlagsConfig, RequestFlagsConfigLayer};
pub use error::{ConfigError, FlagsServerError, Result};
pub use fetch::{fetch_community_flags, fetch_person_flags, fetch_temp_flags};
pub use request::{FlagRequest, MemoryRequest};
pub use resolver::RequestFlags;
pub use service::{FeatureFlagService, InMemoryFlagService};

// Re-export core types for convenience
pub use loom_request_flags_core::*;
