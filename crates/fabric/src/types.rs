//! Shared value types for the UFM partition domain.
//!
//! [`IBNetwork`] is the normalised view of one partition. [`Field`] and
//! [`Strategy`] select what a patch touches and how; every combination of the
//! two is meaningful, so dispatch over them is an exhaustive match rather than
//! a runtime "invalid field" branch.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{PKey, Result, UfmError};

// ---------------------------------------------------------------------------
// QoS value sets
// ---------------------------------------------------------------------------

/// MTU values (bytes) accepted by the fabric for a partition.
pub const SUPPORTED_MTUS: [i32; 2] = [2048, 4096];

/// Rate limits (Gb/s) supported by the hardware.
pub const SUPPORTED_RATE_LIMITS: [f64; 17] = [
    2.5, 5.0, 10.0, 14.0, 20.0, 25.0, 30.0, 40.0, 56.0, 60.0, 80.0, 100.0, 112.0, 120.0, 168.0,
    200.0, 300.0,
];

/// Highest service level a partition may use.
pub const MAX_SERVICE_LEVEL: i32 = 15;

/// Returns `true` if `mtu` is one of [`SUPPORTED_MTUS`].
pub fn is_supported_mtu(mtu: i32) -> bool {
    SUPPORTED_MTUS.contains(&mtu)
}

/// Returns `true` if `rate` is one of [`SUPPORTED_RATE_LIMITS`].
pub fn is_supported_rate_limit(rate: f64) -> bool {
    SUPPORTED_RATE_LIMITS.iter().any(|r| (r - rate).abs() < f64::EPSILON)
}

/// Returns `true` if `level` is in `0..=15`.
pub fn is_valid_service_level(level: i32) -> bool {
    (0..=MAX_SERVICE_LEVEL).contains(&level)
}

// ---------------------------------------------------------------------------
// IB network
// ---------------------------------------------------------------------------

/// One InfiniBand partition, keyed by its [`PKey`].
///
/// The client holds no copy between calls; every value of this type is either
/// a caller's desired state or a snapshot of what the service reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IBNetwork {
    /// Partition name as reported by the service; assigned by the service.
    #[serde(default)]
    pub name: String,

    /// Identity of the partition.
    pub pkey: PKey,

    /// Create a SHARP allocation for the partition.
    ///
    /// Client-side only: never sent to, nor read back from, the service, so it
    /// is always `false` after a read.
    #[serde(skip)]
    pub enable_sharp: bool,

    /// Member port GUIDs. Order and duplicates are the service's concern.
    #[serde(default)]
    pub guids: Vec<String>,

    /// MTU in bytes, normally one of [`SUPPORTED_MTUS`].
    pub mtu: i32,

    /// IP-over-IB enablement.
    pub ip_over_ib: bool,

    /// Store the PKey at index 0 of each member GUID's PKey table.
    pub index0: bool,

    /// Service level, normally in `0..=15`.
    pub service_level: i32,

    /// Rate limit, normally one of [`SUPPORTED_RATE_LIMITS`].
    pub rate_limit: f64,
}

impl IBNetwork {
    /// Creates a network with the fabric defaults (2k MTU, 2.5 rate limit,
    /// service level 0, IPoIB on) and no members.
    pub fn new(pkey: PKey) -> Self {
        Self {
            name: String::new(),
            pkey,
            enable_sharp: false,
            guids: Vec::new(),
            mtu: 2048,
            ip_over_ib: true,
            index0: false,
            service_level: 0,
            rate_limit: 2.5,
        }
    }
}

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// A physical port as reported by the UFM ports resource.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Port {
    /// Port name, e.g. `"0c42a10300f5e4a2_1"`.
    pub name: String,
    /// Port GUID.
    pub guid: String,
    /// GUID of the system (node) hosting the port.
    #[serde(alias = "systemID")]
    pub system_id: String,
    /// Host name of the system.
    pub system_name: String,
    /// Display name of the port within its system.
    pub dname: String,
    /// Local identifier assigned by the subnet manager.
    pub lid: u32,
    /// Logical link state (e.g. `"Active"`).
    pub logical_state: String,
    /// Physical link state (e.g. `"LinkUp"`).
    pub physical_state: String,
}

/// Normalises a GUID for comparison: lowercase, no `0x` prefix.
pub fn normalize_guid(guid: &str) -> String {
    let lower = guid.trim().to_ascii_lowercase();
    match lower.strip_prefix("0x") {
        Some(rest) => rest.to_string(),
        None => lower,
    }
}

// ---------------------------------------------------------------------------
// Patch selectors
// ---------------------------------------------------------------------------

/// The part of a partition a patch operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Service level, MTU and rate limit.
    Qos,
    /// GUID membership.
    Guid,
}

impl Field {
    /// Returns the wire/CLI spelling of the field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Qos => "qos",
            Self::Guid => "guid",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = UfmError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "qos" => Ok(Self::Qos),
            "guid" => Ok(Self::Guid),
            other => Err(UfmError::unknown(format!(
                "invalid field '{other}', expected one of 'qos' or 'guid'"
            ))),
        }
    }
}

/// How a patch combines the given values with the partition's current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Add the given values.
    Add,
    /// Remove the given values.
    Delete,
    /// Declare the given values.
    ///
    /// For GUIDs this is additive, exactly like [`Strategy::Add`]: members
    /// missing from the new list are not removed.
    Set,
}

impl Strategy {
    /// Returns the wire/CLI spelling of the strategy.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Delete => "delete",
            Self::Set => "set",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = UfmError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "add" => Ok(Self::Add),
            "delete" => Ok(Self::Delete),
            "set" => Ok(Self::Set),
            other => Err(UfmError::unknown(format!(
                "invalid strategy '{other}', expected one of 'add', 'delete' or 'set'"
            ))),
        }
    }
}
