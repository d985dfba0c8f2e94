//! The [`NetworkManager`] facade.

use std::collections::HashSet;
use std::sync::Arc;

use fabric::wire::{
    AddGuidsPayload, PKeyListing, PKeyRecord, QosPayload, RemoveGuidsPayload, VersionRecord,
};
use fabric::{
    normalize_guid, Endpoint, Field, IBNetwork, PKey, Port, Result, Strategy, UfmClient, UfmError,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::paths;

/// Manages IB networks (partitions) on one UFM server.
///
/// Holds only immutable connection state, so a single instance can be shared
/// (e.g. behind an `Arc`) by concurrent callers. Every operation performs its
/// round trips in sequence and returns the first error it meets; nothing is
/// retried and nothing already written is rolled back.
#[derive(Clone)]
pub struct NetworkManager {
    client: Arc<dyn UfmClient>,
    endpoint: Endpoint,
}

impl std::fmt::Debug for NetworkManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkManager")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl NetworkManager {
    pub fn new(client: Arc<dyn UfmClient>, endpoint: Endpoint) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        self.endpoint.url(path)
    }

    // -----------------------------------------------------------------------
    // Service
    // -----------------------------------------------------------------------

    /// Returns the UFM release version reported by the server.
    #[instrument(skip_all)]
    pub async fn version(&self) -> Result<String> {
        let data = self
            .client
            .get(&self.url(paths::VERSION))
            .await
            .map_err(|e| e.context("failed to get ufm version"))?;
        let record: VersionRecord = decode(&data, "ufm version")?;
        Ok(record.ufm_release_version)
    }

    /// Probes the server, failing if it cannot be reached with the configured
    /// credentials.
    #[instrument(skip_all)]
    pub async fn validate(&self) -> Result<()> {
        self.client
            .get(&self.url(paths::VERSION))
            .await
            .map(|_| ())
            .map_err(|e| e.context("failed to connect to ufm subnet manager"))
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Reads one partition with its GUID and QoS data.
    ///
    /// The service answers an unknown pkey with `200 {}` rather than a 404, so
    /// an empty-object body is reported as [`UfmError::NotFound`].
    #[instrument(skip_all, fields(pkey = %pkey))]
    pub async fn get(&self, pkey: PKey) -> Result<IBNetwork> {
        let data = self
            .client
            .get(&self.url(&paths::pkey_details(pkey)))
            .await
            .map_err(|e| e.context(format!("failed to get pkey {pkey}")))?;

        if is_empty_object(&data) {
            return Err(UfmError::not_found(format!("pkey {pkey} not found")));
        }

        let record: PKeyRecord = decode(&data, &format!("pkey {pkey}"))?;
        Ok(record.into_network(pkey))
    }

    /// Lists every partition, ordered by pkey.
    ///
    /// QoS and GUID membership come from two separate listings, read one after
    /// the other and merged by canonical pkey string. A pkey present only in
    /// the GUID listing is not returned; a pkey present only in the QoS listing
    /// is returned with no GUIDs.
    #[instrument(skip_all)]
    pub async fn list(&self) -> Result<Vec<IBNetwork>> {
        let qos = self.listing(paths::PKEYS_QOS).await?;
        let mut memberships = self.listing(paths::PKEYS_GUIDS).await?;

        let mut networks: Vec<IBNetwork> = qos
            .into_iter()
            .filter_map(|(key, mut record)| {
                let pkey = match key.parse::<PKey>() {
                    Ok(pkey) => pkey,
                    Err(e) => {
                        warn!(key = %key, error = %e, "skipping pkey listing entry");
                        return None;
                    }
                };
                if let Some(membership) = memberships.remove(&key) {
                    record.guids = membership.guids;
                }
                Some(record.into_network(pkey))
            })
            .collect();

        if !memberships.is_empty() {
            debug!(
                omitted = memberships.len(),
                "pkeys without qos configuration left out of the listing"
            );
        }

        networks.sort_by_key(|ib| ib.pkey);
        Ok(networks)
    }

    async fn listing(&self, path: &str) -> Result<PKeyListing> {
        let data = self
            .client
            .get(&self.url(path))
            .await
            .map_err(|e| e.context("failed to list pkeys"))?;
        decode(&data, "pkey listing")
    }

    /// Lists fabric ports.
    ///
    /// With `guids`, only ports whose GUID is in the list are returned (GUIDs
    /// compare case-insensitively, with or without a `0x` prefix). With `None`,
    /// every port is returned.
    #[instrument(skip_all, fields(filtered = guids.is_some()))]
    pub async fn list_ports(&self, guids: Option<&[String]>) -> Result<Vec<Port>> {
        let data = self
            .client
            .get(&self.url(paths::PORTS))
            .await
            .map_err(|e| e.context("failed to list ports"))?;
        let ports: Vec<Port> = decode(&data, "ports")?;

        let Some(guids) = guids else {
            return Ok(ports);
        };
        let wanted: HashSet<String> = guids.iter().map(|g| normalize_guid(g)).collect();
        Ok(ports
            .into_iter()
            .filter(|port| wanted.contains(&normalize_guid(&port.guid)))
            .collect())
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Creates the partition by adding `ib.guids` to it.
    ///
    /// This is exactly the GUID add write: it does not check whether the
    /// partition already exists and it does not push QoS. Follow with
    /// `patch(ib, Field::Qos, _)` to apply QoS; if that second call fails the
    /// partition stays live with the service's default QoS.
    #[instrument(skip_all, fields(pkey = %ib.pkey))]
    pub async fn create(&self, ib: &IBNetwork) -> Result<()> {
        self.add_guids(ib).await
    }

    /// Deletes the partition.
    #[instrument(skip_all, fields(pkey = %pkey))]
    pub async fn delete(&self, pkey: PKey) -> Result<()> {
        self.client
            .delete(&self.url(&paths::pkey(pkey)))
            .await
            .map(|_| ())
            .map_err(|e| e.context(format!("failed to delete pkey {pkey}")))
    }

    /// Applies `ib` to the partition according to `field` and `strategy`.
    ///
    /// | field | strategy | effect |
    /// |-------|----------|--------|
    /// | `Guid` | `Add`, `Set` | add `ib.guids` with full membership |
    /// | `Guid` | `Delete` | remove `ib.guids` |
    /// | `Qos` | any | overwrite service level, MTU and rate limit |
    ///
    /// `Set` on GUIDs is additive: members absent from `ib.guids` are kept.
    #[instrument(skip_all, fields(pkey = %ib.pkey, field = %field, strategy = %strategy))]
    pub async fn patch(&self, ib: &IBNetwork, field: Field, strategy: Strategy) -> Result<()> {
        match (field, strategy) {
            (Field::Guid, Strategy::Add | Strategy::Set) => self.add_guids(ib).await,
            (Field::Guid, Strategy::Delete) => self.remove_guids(ib).await,
            (Field::Qos, _) => self.set_qos(ib).await,
        }
    }

    async fn add_guids(&self, ib: &IBNetwork) -> Result<()> {
        let body = encode(&AddGuidsPayload::from_network(ib))?;
        self.write(paths::PKEYS, body, &format!("failed to add guids to pkey {}", ib.pkey))
            .await
    }

    async fn remove_guids(&self, ib: &IBNetwork) -> Result<()> {
        let body = encode(&RemoveGuidsPayload::from_network(ib))?;
        self.write(
            paths::REMOVE_GUIDS,
            body,
            &format!("failed to remove guids from pkey {}", ib.pkey),
        )
        .await
    }

    async fn set_qos(&self, ib: &IBNetwork) -> Result<()> {
        let body = encode(&QosPayload::from_network(ib))?;
        self.write(
            paths::QOS_CONF,
            body,
            &format!("failed to update qos of pkey {}", ib.pkey),
        )
        .await
    }

    async fn write(&self, path: &str, body: Vec<u8>, context: &str) -> Result<()> {
        self.client
            .post(&self.url(path), body)
            .await
            .map(|_| ())
            .map_err(|e| e.context(context))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn is_empty_object(body: &[u8]) -> bool {
    body.trim_ascii() == b"{}"
}

fn decode<T: DeserializeOwned>(data: &[u8], what: &str) -> Result<T> {
    serde_json::from_slice(data)
        .map_err(|e| UfmError::unknown(format!("failed to unmarshal {what} with error: {e}")))
}

fn encode<T: Serialize>(payload: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(payload)
        .map_err(|e| UfmError::unknown(format!("failed to marshal IB with error: {e}")))
}
