// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for request-scoped feature flag resolution.
//!
//! A request's effective flags come from three independent sources:
//! - Community flags, enabled for the whole tenant
//! - Person flags, enabled for the authenticated user
//! - Temporary flags, admin-only overrides carried in the session and query
//!
//! This crate holds the shared vocabulary for those sources. The resolver
//! itself lives in `loom-server-request-flags`.
//!
//! # Example
//!
//! ```
//! use loom_request_flags_core::{FlagName, FlagSet, RequestFlagState};
//!
//! let community: FlagSet = [FlagName::new("topbar_v1").unwrap()].into_iter().collect();
//! let person: FlagSet = [FlagName::new("beta.search").unwrap()].into_iter().collect();
//!
//! let state = RequestFlagState::new(community, person, FlagSet::new());
//! assert!(state.all_flags().contains("topbar_v1"));
//! assert!(state.all_flags().contains("beta.search"));
//! ```

pub mod context;
pub mod error;
pub mod flag;
pub mod state;

pub use context::{CommunityId, FeatureRecord, FeatureScope, FlagQueryContext, PersonId};
pub use error::{FlagsError, Result};
pub use flag::{FlagName, FlagSet};
pub use state::RequestFlagState;
