//! Domain layer of the UFM partition client.
//!
//! This crate contains the partition key codec, the normalised [`IBNetwork`]
//! entity, the UFM wire records and their translation, the error taxonomy, and
//! the [`UfmClient`] port that transport crates implement.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* the manager needs; `rest` defines *how* it is supplied.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | [`PKey`] and the `0x<hex>` codec |
//! | [`types`] | [`IBNetwork`], [`Port`], patch selectors, QoS value sets |
//! | [`wire`] | UFM JSON records, request payloads, translation |
//! | [`client`] | The [`UfmClient`] transport port |
//! | [`config`] | [`UfmConfig`], [`Endpoint`], [`Scheme`] |
//! | [`errors`] | [`UfmError`] and the crate `Result` alias |

pub mod client;
pub mod config;
pub mod errors;
pub mod identifiers;
pub mod types;
pub mod wire;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use client::UfmClient;
pub use config::{Endpoint, Scheme, UfmConfig};
pub use errors::{Result, UfmError};
pub use identifiers::{format_pkey, is_pkey_valid, parse_pkey, PKey, PKEY_MASK};
pub use types::{
    is_supported_mtu, is_supported_rate_limit, is_valid_service_level, normalize_guid, Field,
    IBNetwork, Port, Strategy, MAX_SERVICE_LEVEL, SUPPORTED_MTUS, SUPPORTED_RATE_LIMITS,
};
