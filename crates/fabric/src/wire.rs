//! UFM wire records and their translation to and from [`IBNetwork`].
//!
//! Read side: [`PKeyRecord`] is what the pkeys resource returns for one
//! partition (alone, or as a value of the listing maps keyed by the canonical
//! pkey string). Write side: each payload type is the body of exactly one
//! write endpoint and is built from an [`IBNetwork`], re-deriving the pkey
//! string through the codec every time.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{IBNetwork, PKey};

/// Membership type sent with every GUID add.
pub const FULL_MEMBERSHIP: &str = "full";

/// Listing shape of `GET /ufmRest/resources/pkeys?...`: canonical pkey string
/// to record.
pub type PKeyListing = HashMap<String, PKeyRecord>;

// ---------------------------------------------------------------------------
// Read records
// ---------------------------------------------------------------------------

/// QoS block of a [`PKeyRecord`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QosConf {
    pub service_level: i32,
    #[serde(rename = "mtu_limit")]
    pub mtu: i32,
    pub rate_limit: f64,
}

/// One GUID membership entry of a [`PKeyRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GuidEntry {
    pub guid: String,
    pub index0: bool,
    pub membership: String,
}

/// A partition as the UFM REST API reports it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PKeyRecord {
    /// Partition name.
    pub partition: String,
    pub ip_over_ib: bool,
    #[serde(rename = "qos_conf")]
    pub qos: QosConf,
    pub guids: Vec<GuidEntry>,
}

impl PKeyRecord {
    /// Translates the record into the domain view of partition `pkey`.
    ///
    /// The wire format carries `index0` per GUID while [`IBNetwork`] carries a
    /// single flag; the result takes the value of the last entry, or `false`
    /// when there are no entries.
    pub fn into_network(self, pkey: PKey) -> IBNetwork {
        let index0 = self.guids.last().is_some_and(|entry| entry.index0);
        let guids = self.guids.into_iter().map(|entry| entry.guid).collect();

        IBNetwork {
            name: self.partition,
            pkey,
            enable_sharp: false,
            guids,
            mtu: self.qos.mtu,
            ip_over_ib: self.ip_over_ib,
            index0,
            service_level: self.qos.service_level,
            rate_limit: self.qos.rate_limit,
        }
    }
}

/// Body of `GET /ufmRest/app/ufm_version`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct VersionRecord {
    pub ufm_release_version: String,
}

// ---------------------------------------------------------------------------
// Write payloads
// ---------------------------------------------------------------------------

/// Body of `POST /ufmRest/resources/pkeys`: add GUIDs (creating the partition
/// if needed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddGuidsPayload {
    pub pkey: String,
    pub ip_over_ib: bool,
    pub index0: bool,
    pub membership: &'static str,
    pub guids: Vec<String>,
}

impl AddGuidsPayload {
    pub fn from_network(ib: &IBNetwork) -> Self {
        Self {
            pkey: ib.pkey.to_string(),
            ip_over_ib: ib.ip_over_ib,
            index0: ib.index0,
            membership: FULL_MEMBERSHIP,
            guids: ib.guids.clone(),
        }
    }
}

/// Body of `POST /ufmRest/actions/remove_guids_from_pkey`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoveGuidsPayload {
    pub pkey: String,
    pub guids: Vec<String>,
}

impl RemoveGuidsPayload {
    pub fn from_network(ib: &IBNetwork) -> Self {
        Self {
            pkey: ib.pkey.to_string(),
            guids: ib.guids.clone(),
        }
    }
}

/// Body of `POST /ufmRest/resources/pkeys/qos_conf`: overwrite the whole QoS
/// block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QosPayload {
    pub pkey: String,
    pub service_level: i32,
    #[serde(rename = "mtu_limit")]
    pub mtu: i32,
    pub rate_limit: f64,
}

impl QosPayload {
    pub fn from_network(ib: &IBNetwork) -> Self {
        Self {
            pkey: ib.pkey.to_string(),
            service_level: ib.service_level,
            mtu: ib.mtu,
            rate_limit: ib.rate_limit,
        }
    }
}
