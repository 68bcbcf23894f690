//! Route table model
//!
//! Field names follow the routing daemon's JSON output so a parsed table can
//! be written back out without renaming anything. Fields this crate does not
//! interpret are kept in `extra`.

use crate::error::RouteviewError;
use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::btree_map;
use std::collections::{BTreeMap, HashSet};
use std::net::IpAddr;

/// Bit in [`NextHop::flags`] marking a recursively resolved nexthop
pub const NEXTHOP_FLAG_RECURSIVE: u32 = 1 << 2;

/// Bit in [`NextHop::flags`] marking a duplicate nexthop
pub const NEXTHOP_FLAG_DUPLICATE: u32 = 1 << 5;

fn is_false(b: &bool) -> bool {
    !*b
}

/// One forwarding path of a route
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextHop {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface_name: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub directly_connected: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub recursive: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub on_link: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vrf: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<u32>>,
    #[serde(default)]
    pub flags: u32,
    #[serde(default, skip_serializing_if = "is_false")]
    pub unreachable: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub reject: bool,
    #[serde(
        default,
        rename = "admin-prohibited",
        skip_serializing_if = "is_false"
    )]
    pub admin_prohibited: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub blackhole: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Identity of a nexthop when merging instances
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NexthopKey {
    Interface(String),
    Address { ip: Option<String>, active: bool },
}

impl NextHop {
    /// Interface name when present, otherwise address plus active state
    pub fn key(&self) -> NexthopKey {
        match &self.interface_name {
            Some(name) => NexthopKey::Interface(name.clone()),
            None => NexthopKey::Address {
                ip: self.ip.clone(),
                active: self.active,
            },
        }
    }

    /// Whether this nexthop leaves through a back-end interface
    pub fn is_backend(&self, backend: &HashSet<String>) -> bool {
        self.interface_name
            .as_ref()
            .map(|name| backend.contains(name))
            .unwrap_or(false)
    }

    pub fn is_recursive_or_duplicate(&self) -> bool {
        self.flags & (NEXTHOP_FLAG_RECURSIVE | NEXTHOP_FLAG_DUPLICATE) != 0
    }
}

/// One protocol's view of a prefix
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteEntry {
    pub protocol: String,
    #[serde(default)]
    pub distance: u32,
    #[serde(default)]
    pub metric: u32,
    #[serde(default, skip_serializing_if = "is_false")]
    pub selected: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub installed: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub queued: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub failed: bool,
    #[serde(default)]
    pub internal_next_hop_num: i64,
    #[serde(default)]
    pub internal_next_hop_active_num: i64,
    #[serde(default)]
    pub uptime: String,
    #[serde(default)]
    pub nexthops: Vec<NextHop>,
    /// Instance that reported this entry
    #[serde(skip)]
    pub instance: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RouteEntry {
    pub fn has_active_nexthop(&self) -> bool {
        self.nexthops.iter().any(|nh| nh.active)
    }
}

/// Prefix to route entries, as reported by one instance or merged across many
///
/// A prefix present in the table always maps to a non-empty entry list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteTable {
    routes: BTreeMap<String, Vec<RouteEntry>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a daemon route response, tagging entries with `instance`
    pub fn from_json(instance: &str, text: &str) -> Result<RouteTable, RouteviewError> {
        let mut table: RouteTable =
            serde_json::from_str(text).map_err(|e| RouteviewError::MalformedResponse {
                instance: instance.to_string(),
                reason: e.to_string(),
            })?;
        table.routes.retain(|_, entries| !entries.is_empty());
        for entries in table.routes.values_mut() {
            for entry in entries.iter_mut() {
                entry.instance = Some(instance.to_string());
            }
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn get(&self, prefix: &str) -> Option<&Vec<RouteEntry>> {
        self.routes.get(prefix)
    }

    /// Insert a prefix; empty entry lists are not stored
    pub fn insert(&mut self, prefix: impl Into<String>, entries: Vec<RouteEntry>) {
        if !entries.is_empty() {
            self.routes.insert(prefix.into(), entries);
        }
    }

    pub(crate) fn entry(&mut self, prefix: String) -> btree_map::Entry<'_, String, Vec<RouteEntry>> {
        self.routes.entry(prefix)
    }

    pub(crate) fn routes_mut(&mut self) -> &mut BTreeMap<String, Vec<RouteEntry>> {
        &mut self.routes
    }

    pub fn into_routes(self) -> BTreeMap<String, Vec<RouteEntry>> {
        self.routes
    }

    /// Prefixes in ascending numeric order of their network address
    pub fn sorted(&self) -> Vec<(&String, &Vec<RouteEntry>)> {
        let mut routes: Vec<_> = self.routes.iter().collect();
        routes.sort_by_cached_key(|(prefix, _)| prefix_sort_key(prefix));
        routes
    }

    pub fn nexthops_mut(&mut self) -> impl Iterator<Item = &mut NextHop> {
        self.routes
            .values_mut()
            .flat_map(|entries| entries.iter_mut())
            .flat_map(|entry| entry.nexthops.iter_mut())
    }
}

/// Sort key: IPv4 before IPv6, then address value, then prefix length;
/// unparsable keys sort last by text
fn prefix_sort_key(prefix: &str) -> (u8, u128, u8, String) {
    let parsed = prefix
        .parse::<IpNet>()
        .ok()
        .or_else(|| prefix.parse::<IpAddr>().ok().map(IpNet::from));
    match parsed {
        Some(IpNet::V4(net)) => (0, u32::from(net.network()) as u128, net.prefix_len(), String::new()),
        Some(IpNet::V6(net)) => (1, u128::from(net.network()), net.prefix_len(), String::new()),
        None => (2, 0, 0, prefix.to_string()),
    }
}
