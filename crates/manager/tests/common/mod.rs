//! In-memory UFM server used by the manager tests.
//!
//! [`FakeUfm`] implements [`UfmClient`] by applying each request to a small
//! model of the UFM pkey and port resources, and records every call so tests
//! can assert on the exact requests the manager issued.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fabric::wire::{GuidEntry, PKeyRecord, QosConf};
use fabric::{Endpoint, Port, Result, Scheme, UfmClient, UfmError};
use manager::{paths, NetworkManager};
use serde_json::{json, Map, Value};

pub const BASE: &str = "http://ufm.test:80";
pub const UFM_VERSION: &str = "6.14.1-2";

/// One request seen by the fake.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Default)]
struct State {
    pkeys: BTreeMap<String, PKeyRecord>,
    membership_only: BTreeMap<String, Vec<GuidEntry>>,
    ports: Vec<Port>,
    raw: BTreeMap<(&'static str, String), Vec<u8>>,
    failures: BTreeMap<(&'static str, String), UfmError>,
    calls: Vec<Call>,
}

#[derive(Default)]
pub struct FakeUfm {
    state: Mutex<State>,
}

impl FakeUfm {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A manager whose endpoint resolves to this fake.
    pub fn manager(self: &Arc<Self>) -> NetworkManager {
        let client: Arc<dyn UfmClient> = self.clone();
        NetworkManager::new(
            client,
            Endpoint {
                scheme: Scheme::Http,
                address: "ufm.test".to_string(),
                port: 80,
            },
        )
    }

    /// Stores a partition under `key` (canonical pkey string).
    pub fn insert(&self, key: &str, record: PKeyRecord) {
        self.state().pkeys.insert(key.to_string(), record);
    }

    /// Stores a partition with `guids` and default QoS.
    pub fn insert_with_guids(&self, key: &str, guids: &[&str]) {
        self.insert(key, record(&format!("pkey_{key}"), guids));
    }

    /// Makes `key` appear in the membership listing but not the QoS listing.
    pub fn insert_membership_only(&self, key: &str, guids: &[&str]) {
        self.state()
            .membership_only
            .insert(key.to_string(), entries(guids, false));
    }

    pub fn add_port(&self, port: Port) {
        self.state().ports.push(port);
    }

    /// Answers `method path` with `body` verbatim instead of the model.
    pub fn respond_raw(&self, method: &'static str, path: &str, body: &str) {
        self.state()
            .raw
            .insert((method, path.to_string()), body.as_bytes().to_vec());
    }

    /// Fails every `method path` request with `err`.
    pub fn fail(&self, method: &'static str, path: &str, err: UfmError) {
        self.state().failures.insert((method, path.to_string()), err);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn record(&self, key: &str) -> Option<PKeyRecord> {
        self.state().pkeys.get(key).cloned()
    }

    pub fn guids(&self, key: &str) -> Vec<String> {
        self.record(key)
            .map(|r| r.guids.into_iter().map(|e| e.guid).collect())
            .unwrap_or_default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    fn handle(&self, method: &'static str, url: &str, body: Option<Vec<u8>>) -> Result<Vec<u8>> {
        let path = url
            .strip_prefix(BASE)
            .unwrap_or_else(|| panic!("request outside the fake endpoint: {url}"))
            .to_string();
        let body = body.map(|b| serde_json::from_slice::<Value>(&b).unwrap());

        let mut state = self.state();
        state.calls.push(Call {
            method,
            path: path.clone(),
            body: body.clone(),
        });

        let key = (method, path.clone());
        if let Some(err) = state.failures.get(&key) {
            return Err(err.clone());
        }
        if let Some(raw) = state.raw.get(&key) {
            return Ok(raw.clone());
        }

        let reply = state.route(method, &path, body)?;
        Ok(serde_json::to_vec(&reply).unwrap())
    }
}

impl State {
    fn route(&mut self, method: &str, path: &str, body: Option<Value>) -> Result<Value> {
        let pkey_path = path.strip_prefix(&format!("{}/", paths::PKEYS));

        match (method, path) {
            ("GET", paths::VERSION) => Ok(json!({ "ufm_release_version": UFM_VERSION })),
            ("GET", paths::PKEYS_QOS) => Ok(self.qos_listing()),
            ("GET", paths::PKEYS_GUIDS) => Ok(self.membership_listing()),
            ("GET", paths::PORTS) => Ok(serde_json::to_value(&self.ports).unwrap()),
            ("POST", paths::PKEYS) => self.add_guids(body.unwrap()),
            ("POST", paths::QOS_CONF) => self.set_qos(body.unwrap()),
            ("POST", paths::REMOVE_GUIDS) => self.remove_guids(body.unwrap()),
            ("GET", _) if pkey_path.is_some() => {
                let key = pkey_path
                    .and_then(|p| p.strip_suffix("?guids_data=true&qos_conf=true"))
                    .unwrap();
                // UFM answers unknown pkeys with an empty object, not a 404.
                Ok(self
                    .pkeys
                    .get(key)
                    .map(|r| serde_json::to_value(r).unwrap())
                    .unwrap_or_else(|| json!({})))
            }
            ("DELETE", _) if pkey_path.is_some() => match self.pkeys.remove(pkey_path.unwrap()) {
                Some(_) => Ok(json!({})),
                None => Err(UfmError::not_found("Not Found")),
            },
            _ => Err(UfmError::not_found("Not Found")),
        }
    }

    fn qos_listing(&self) -> Value {
        let listing: Map<String, Value> = self
            .pkeys
            .iter()
            .map(|(key, r)| {
                let entry = json!({
                    "partition": r.partition,
                    "ip_over_ib": r.ip_over_ib,
                    "qos_conf": r.qos,
                });
                (key.clone(), entry)
            })
            .collect();
        Value::Object(listing)
    }

    fn membership_listing(&self) -> Value {
        let mut listing: Map<String, Value> = self
            .pkeys
            .iter()
            .filter(|(_, r)| !r.guids.is_empty())
            .map(|(key, r)| {
                let entry = json!({ "partition": r.partition, "guids": r.guids });
                (key.clone(), entry)
            })
            .collect();
        for (key, guids) in &self.membership_only {
            listing.insert(key.clone(), json!({ "partition": key, "guids": guids }));
        }
        Value::Object(listing)
    }

    fn add_guids(&mut self, body: Value) -> Result<Value> {
        let key = body["pkey"].as_str().unwrap().to_string();
        let index0 = body["index0"].as_bool().unwrap();
        let membership = body["membership"].as_str().unwrap().to_string();

        let record = self
            .pkeys
            .entry(key.clone())
            .or_insert_with(|| record(&format!("api_{key}"), &[]));
        record.ip_over_ib = body["ip_over_ib"].as_bool().unwrap();
        for guid in body["guids"].as_array().unwrap() {
            let guid = guid.as_str().unwrap();
            match record.guids.iter_mut().find(|e| e.guid == guid) {
                Some(entry) => {
                    entry.index0 = index0;
                    entry.membership = membership.clone();
                }
                None => record.guids.push(GuidEntry {
                    guid: guid.to_string(),
                    index0,
                    membership: membership.clone(),
                }),
            }
        }
        Ok(json!({}))
    }

    fn remove_guids(&mut self, body: Value) -> Result<Value> {
        let key = body["pkey"].as_str().unwrap();
        let record = self
            .pkeys
            .get_mut(key)
            .ok_or_else(|| UfmError::not_found("Not Found"))?;
        let removed: Vec<&str> = body["guids"]
            .as_array()
            .unwrap()
            .iter()
            .map(|g| g.as_str().unwrap())
            .collect();
        record.guids.retain(|e| !removed.contains(&e.guid.as_str()));
        Ok(json!({}))
    }

    fn set_qos(&mut self, body: Value) -> Result<Value> {
        let key = body["pkey"].as_str().unwrap();
        let record = self
            .pkeys
            .get_mut(key)
            .ok_or_else(|| UfmError::not_found("Not Found"))?;
        record.qos = serde_json::from_value(body).unwrap();
        Ok(json!({}))
    }
}

#[async_trait]
impl UfmClient for FakeUfm {
    async fn get(&self, url: &str) -> Result<Vec<u8>> {
        self.handle("GET", url, None)
    }

    async fn post(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>> {
        self.handle("POST", url, Some(body))
    }

    async fn put(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>> {
        self.handle("PUT", url, Some(body))
    }

    async fn delete(&self, url: &str) -> Result<Vec<u8>> {
        self.handle("DELETE", url, None)
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn entries(guids: &[&str], index0: bool) -> Vec<GuidEntry> {
    guids
        .iter()
        .map(|g| GuidEntry {
            guid: g.to_string(),
            index0,
            membership: "full".to_string(),
        })
        .collect()
}

/// A record with UFM's default QoS and full-membership `guids`.
pub fn record(name: &str, guids: &[&str]) -> PKeyRecord {
    PKeyRecord {
        partition: name.to_string(),
        ip_over_ib: true,
        qos: QosConf {
            service_level: 0,
            mtu: 2048,
            rate_limit: 2.5,
        },
        guids: entries(guids, false),
    }
}

pub fn port(name: &str, guid: &str) -> Port {
    Port {
        name: name.to_string(),
        guid: guid.to_string(),
        system_name: "node01".to_string(),
        lid: 7,
        logical_state: "Active".to_string(),
        physical_state: "LinkUp".to_string(),
        ..Port::default()
    }
}
