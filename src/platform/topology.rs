//! Platform topology document
//!
//! The topology document stands in for the configuration database: it lists
//! the routing-daemon namespaces, the back-end (fabric) interfaces, the
//! configured BGP neighbor names, and the interface alias table.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

use super::Platform;
use crate::lens::bgp::NeighborNameTable;

/// A BGP dynamic-neighbor range entry
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PeerRange {
    pub name: String,
    #[serde(default)]
    pub ip_range: Vec<String>,
}

/// Topology of the local device as read from the topology file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Topology {
    /// Namespaces whose ASICs carry front-panel ports
    pub frontend_namespaces: Vec<String>,
    /// Namespaces whose ASICs only carry fabric links
    pub backend_namespaces: Vec<String>,
    /// ASIC-to-ASIC interface names, hidden in frontend views
    pub backend_interfaces: Vec<String>,
    /// BGP sessions between ASICs, hidden in frontend views
    pub internal_neighbors: Vec<String>,
    /// Static neighbor address to name map
    pub bgp_neighbors: HashMap<String, String>,
    /// Dynamic neighbor ranges, scanned in file order
    pub bgp_peer_ranges: Vec<PeerRange>,
    /// Interface name to alias map
    pub interface_aliases: HashMap<String, String>,
}

impl Topology {
    /// Load topology from a JSON file
    pub fn from_file(path: &str) -> Result<Topology> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Unable to read topology file {}: {}", path, e))?;
        Self::from_json_str(&content)
            .map_err(|e| anyhow!("Unable to parse topology file {}: {}", path, e))
    }

    /// Parse topology from a JSON string
    pub fn from_json_str(content: &str) -> Result<Topology> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load topology from an optional path; a missing path or file yields an
    /// empty (single-instance) topology
    pub fn load(path: Option<&str>) -> Result<Topology> {
        match path {
            Some(p) if Path::new(p).exists() => Self::from_file(p),
            Some(p) => {
                tracing::warn!(
                    "Topology file {} not found, assuming single-instance platform",
                    p
                );
                Ok(Topology::default())
            }
            None => Ok(Topology::default()),
        }
    }

    pub fn platform(&self) -> Platform {
        Platform::new(
            self.frontend_namespaces.clone(),
            self.backend_namespaces.clone(),
        )
    }

    pub fn backend_interfaces(&self) -> HashSet<String> {
        self.backend_interfaces.iter().cloned().collect()
    }

    pub fn internal_neighbors(&self) -> HashSet<String> {
        self.internal_neighbors.iter().cloned().collect()
    }

    /// Build the neighbor-name table; unparsable ranges are skipped
    pub fn neighbor_names(&self) -> NeighborNameTable {
        let mut table = NeighborNameTable::new();
        for (ip, name) in &self.bgp_neighbors {
            table.add_static(ip, name);
        }
        for range in &self.bgp_peer_ranges {
            for cidr in &range.ip_range {
                if let Err(e) = table.add_range(cidr, &range.name) {
                    tracing::warn!("Skipping peer range {} ({}): {}", cidr, range.name, e);
                }
            }
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "frontend_namespaces": ["asic0", "asic1"],
        "backend_namespaces": ["asic2"],
        "backend_interfaces": ["PortChannel4001", "Ethernet-BP0"],
        "internal_neighbors": ["10.1.0.1"],
        "bgp_neighbors": {"10.0.0.1": "ARISTA01T2"},
        "bgp_peer_ranges": [
            {"name": "BGPSLBPassive", "ip_range": ["10.255.0.0/25", "fc00::/64"]},
            {"name": "BROKEN", "ip_range": ["not-a-cidr"]}
        ],
        "interface_aliases": {"Ethernet0": "etp1"}
    }"#;

    #[test]
    fn test_parse_topology() {
        let topo = Topology::from_json_str(SAMPLE).unwrap();
        let platform = topo.platform();
        assert!(platform.is_multi_instance());
        assert_eq!(platform.namespaces(), vec!["asic0", "asic1", "asic2"]);
        assert!(topo.backend_interfaces().contains("PortChannel4001"));
        assert!(topo.internal_neighbors().contains("10.1.0.1"));
        assert_eq!(topo.interface_aliases.get("Ethernet0").unwrap(), "etp1");
    }

    #[test]
    fn test_neighbor_names_from_topology() {
        let topo = Topology::from_json_str(SAMPLE).unwrap();
        let names = topo.neighbor_names();
        assert_eq!(names.resolve("10.0.0.1"), "ARISTA01T2");
        assert_eq!(names.resolve("10.255.0.9"), "BGPSLBPassive");
        assert_eq!(names.resolve("fc00::5"), "BGPSLBPassive");
        assert_eq!(names.resolve("192.0.2.1"), "NotAvailable");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let topo = Topology::from_json_str("{}").unwrap();
        assert!(!topo.platform().is_multi_instance());
        assert!(topo.backend_interfaces().is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let topo = Topology::load(Some(&path)).unwrap();
        assert_eq!(topo.frontend_namespaces.len(), 2);

        let missing = Topology::load(Some("/nonexistent/topology.json")).unwrap();
        assert!(missing.frontend_namespaces.is_empty());
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        let path = file.path().to_str().unwrap().to_string();
        assert!(Topology::load(Some(&path)).is_err());
    }
}
