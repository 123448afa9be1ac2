//! Netdata Cloud provider adapters.
//!
//! # Overview
//! Maps declarative resource state onto `netdata_core::NetdataClient` calls.
//! The host framework owns plans, diffs and persisted state; this crate
//! performs the create, read, update, delete and import operations it asks
//! for, and answers data source lookups.
//!
//! # Quick Start
//!
//! ```ignore
//! use netdata_provider::{NetdataProvider, ProviderSettings};
//!
//! let provider = NetdataProvider::configure(&ProviderSettings::default())?;
//! let spaces = provider.resource("netdata_space")?;
//! let state = spaces.create(serde_json::json!({ "name": "ops" }))?;
//! ```
//!
//! # Design
//! - Configuration is resolved once; the resulting client is cloned into
//!   every resource and data source.
//! - Each resource validates its plan before issuing any request.
//! - Failures carry the operation and identifiers involved, plus the
//!   underlying client error.

pub mod config;
pub mod data_sources;
pub mod error;
pub mod logging;
pub mod provider;
pub mod resources;
pub mod sweeper;
pub mod validation;

pub use config::{ProviderConfig, ProviderSettings, ENV_PREFIX};
pub use data_sources::{RoomData, RoomDataSource, RoomLookup, SpaceData, SpaceDataSource, SpaceLookup};
pub use error::{ApiResultExt, ProviderError};
pub use logging::{init_logging, init_logging_with_default};
pub use provider::{NetdataProvider, PROVIDER_TYPE_NAME};
pub use sweeper::{sweep_invitations, SPACE_ID_ENV};
