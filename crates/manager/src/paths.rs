//! UFM REST resource paths used by the manager.

use fabric::PKey;

pub const VERSION: &str = "/ufmRest/app/ufm_version";
pub const PKEYS: &str = "/ufmRest/resources/pkeys";
pub const PKEYS_QOS: &str = "/ufmRest/resources/pkeys?qos_conf=true";
pub const PKEYS_GUIDS: &str = "/ufmRest/resources/pkeys?guids_data=true";
pub const QOS_CONF: &str = "/ufmRest/resources/pkeys/qos_conf";
pub const REMOVE_GUIDS: &str = "/ufmRest/actions/remove_guids_from_pkey";
pub const PORTS: &str = "/ufmRest/resources/ports";

/// `GET` path of one partition with both GUID and QoS data.
pub fn pkey_details(pkey: PKey) -> String {
    format!("{PKEYS}/{pkey}?guids_data=true&qos_conf=true")
}

/// `DELETE` path of one partition.
pub fn pkey(pkey: PKey) -> String {
    format!("{PKEYS}/{pkey}")
}
