//! IB network management over the UFM REST API.
//!
//! [`NetworkManager`] composes the [`fabric`] codec and translator with a
//! [`fabric::UfmClient`] transport to read, list, create, delete and patch
//! partitions.
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** The manager sequences calls between the domain
//! types in [`fabric`] and whichever transport it is given. It contains no
//! HTTP details of its own and never prints or exits; every failure comes back
//! as a [`fabric::UfmError`] whose kind is preserved from the layer that
//! produced it.
//!
//! ## Endpoints
//!
//! | Operation | Method | Path |
//! |-----------|--------|------|
//! | version probe | GET | `/ufmRest/app/ufm_version` |
//! | read one partition | GET | `/ufmRest/resources/pkeys/{pkey}?guids_data=true&qos_conf=true` |
//! | list all QoS | GET | `/ufmRest/resources/pkeys?qos_conf=true` |
//! | list all memberships | GET | `/ufmRest/resources/pkeys?guids_data=true` |
//! | create / add GUIDs | POST | `/ufmRest/resources/pkeys` |
//! | set QoS | POST | `/ufmRest/resources/pkeys/qos_conf` |
//! | remove GUIDs | POST | `/ufmRest/actions/remove_guids_from_pkey` |
//! | delete partition | DELETE | `/ufmRest/resources/pkeys/{pkey}` |
//! | list ports | GET | `/ufmRest/resources/ports` |

mod network;
pub mod paths;

pub use network::NetworkManager;
