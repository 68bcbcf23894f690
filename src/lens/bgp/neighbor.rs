//! BGP neighbor address to name resolution

use crate::error::RouteviewError;
use ipnet::IpNet;
use std::collections::HashMap;
use std::net::IpAddr;

/// Name reported for peers matching neither a static nor a dynamic entry
pub const NEIGHBOR_NAME_UNKNOWN: &str = "NotAvailable";

/// Configured neighbor names: exact addresses first, then dynamic ranges
///
/// Ranges are kept per address family in insertion order and matched
/// first-hit; overlapping ranges are not ranked by prefix length.
#[derive(Debug, Clone, Default)]
pub struct NeighborNameTable {
    static_names: HashMap<String, String>,
    ipv4_ranges: Vec<(IpNet, String)>,
    ipv6_ranges: Vec<(IpNet, String)>,
}

impl NeighborNameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_static(&mut self, ip: &str, name: &str) {
        self.static_names.insert(ip.to_string(), name.to_string());
    }

    /// Append a dynamic range for the family of `cidr`
    pub fn add_range(&mut self, cidr: &str, name: &str) -> Result<(), RouteviewError> {
        let net: IpNet = cidr.parse().map_err(|_| {
            RouteviewError::InvalidArgument(format!("'{}' is not a valid peer range", cidr))
        })?;
        let ranges = match net {
            IpNet::V4(_) => &mut self.ipv4_ranges,
            IpNet::V6(_) => &mut self.ipv6_ranges,
        };
        ranges.push((net, name.to_string()));
        Ok(())
    }

    /// True when neither static names nor ranges are configured
    pub fn is_empty(&self) -> bool {
        self.static_names.is_empty() && self.ipv4_ranges.is_empty() && self.ipv6_ranges.is_empty()
    }

    /// Name of the neighbor at `ip`, or [`NEIGHBOR_NAME_UNKNOWN`]
    pub fn resolve(&self, ip: &str) -> &str {
        if let Some(name) = self.static_names.get(ip) {
            return name;
        }
        let Ok(addr) = ip.parse::<IpAddr>() else {
            return NEIGHBOR_NAME_UNKNOWN;
        };
        let ranges = match addr {
            IpAddr::V4(_) => &self.ipv4_ranges,
            IpAddr::V6(_) => &self.ipv6_ranges,
        };
        ranges
            .iter()
            .find(|(net, _)| net.contains(&addr))
            .map(|(_, name)| name.as_str())
            .unwrap_or(NEIGHBOR_NAME_UNKNOWN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dynamic_range_match() {
        let mut table = NeighborNameTable::new();
        table.add_range("10.0.0.0/24", "LEAF1").unwrap();
        assert_eq!(table.resolve("10.0.0.5"), "LEAF1");
        assert_eq!(table.resolve("192.0.2.1"), "NotAvailable");
    }

    #[test]
    fn test_static_wins_over_range() {
        let mut table = NeighborNameTable::new();
        table.add_range("10.0.0.0/24", "LEAF1").unwrap();
        table.add_static("10.0.0.5", "SPINE1");
        assert_eq!(table.resolve("10.0.0.5"), "SPINE1");
        assert_eq!(table.resolve("10.0.0.6"), "LEAF1");
    }

    #[test]
    fn test_first_range_in_scan_order_wins() {
        let mut table = NeighborNameTable::new();
        table.add_range("10.0.0.0/8", "WIDE").unwrap();
        table.add_range("10.0.0.0/24", "NARROW").unwrap();
        assert_eq!(table.resolve("10.0.0.5"), "WIDE");
    }

    #[test]
    fn test_families_are_separate() {
        let mut table = NeighborNameTable::new();
        table.add_range("fc00::/64", "V6PEERS").unwrap();
        assert_eq!(table.resolve("fc00::1"), "V6PEERS");
        assert_eq!(table.resolve("10.0.0.1"), "NotAvailable");
    }

    #[test]
    fn test_unparsable_inputs() {
        let mut table = NeighborNameTable::new();
        assert!(table.add_range("10.0.0.0/40", "BAD").is_err());
        assert!(table.is_empty());
        assert_eq!(table.resolve("Ethernet0"), "NotAvailable");
    }
}
