//! Back-end nexthop filtering and interface alias substitution

use super::types::RouteTable;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// What a filtering pass removed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    pub nexthops_removed: usize,
    pub entries_removed: usize,
    pub prefixes_removed: usize,
}

/// Strip nexthops leaving through back-end interfaces
///
/// Entries left without nexthops are dropped, and so are prefixes left
/// without entries. `internalNextHopNum` always goes down by the number of
/// nexthops removed from the entry; `internalNextHopActiveNum` only does when
/// something was removed and the entry had a positive active count.
pub fn filter_backend(table: &mut RouteTable, backend: &HashSet<String>) -> FilterStats {
    let mut stats = FilterStats::default();
    if backend.is_empty() {
        return stats;
    }

    table.routes_mut().retain(|_, entries| {
        entries.retain_mut(|entry| {
            let original_active = entry.internal_next_hop_active_num;
            let before = entry.nexthops.len();
            entry.nexthops.retain(|nh| !nh.is_backend(backend));
            let removed = before - entry.nexthops.len();

            entry.internal_next_hop_num -= removed as i64;
            if removed > 0 && original_active > 0 {
                entry.internal_next_hop_active_num -= removed as i64;
            }
            stats.nexthops_removed += removed;

            let keep = removed == 0 || !entry.nexthops.is_empty();
            if !keep {
                stats.entries_removed += 1;
            }
            keep
        });

        let keep = !entries.is_empty();
        if !keep {
            stats.prefixes_removed += 1;
        }
        keep
    });

    stats
}

/// Replace interface names with their aliases; names without an alias stay
pub fn apply_aliases(table: &mut RouteTable, aliases: &HashMap<String, String>) {
    for nh in table.nexthops_mut() {
        if let Some(alias) = nh.interface_name.as_ref().and_then(|n| aliases.get(n)) {
            nh.interface_name = Some(alias.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn backend(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn connected_table() -> RouteTable {
        let text = json!({
            "10.0.0.0/8": [{
                "protocol": "connected",
                "nexthops": [{"interfaceName": "Eth0", "directlyConnected": true}]
            }]
        })
        .to_string();
        RouteTable::from_json("", &text).unwrap()
    }

    fn ecmp_table() -> RouteTable {
        let text = json!({
            "0.0.0.0/0": [{
                "protocol": "bgp",
                "internalNextHopNum": 3,
                "internalNextHopActiveNum": 3,
                "nexthops": [
                    {"ip": "10.0.0.1", "interfaceName": "PortChannel0001", "active": true},
                    {"ip": "10.1.0.1", "interfaceName": "PortChannel4001", "active": true},
                    {"ip": "10.2.0.1", "active": true}
                ]
            }],
            "192.168.0.0/24": [{
                "protocol": "bgp",
                "internalNextHopNum": 1,
                "internalNextHopActiveNum": 0,
                "nexthops": [{"ip": "10.1.0.1", "interfaceName": "PortChannel4001"}]
            }]
        })
        .to_string();
        RouteTable::from_json("asic0", &text).unwrap()
    }

    #[test]
    fn test_empty_backend_set_leaves_table_unchanged() {
        let mut table = connected_table();
        let stats = filter_backend(&mut table, &backend(&[]));
        assert_eq!(table, connected_table());
        assert_eq!(stats, FilterStats::default());
    }

    #[test]
    fn test_backend_only_prefix_is_removed() {
        let mut table = connected_table();
        let stats = filter_backend(&mut table, &backend(&["Eth0"]));
        assert!(table.is_empty());
        assert_eq!(stats.nexthops_removed, 1);
        assert_eq!(stats.entries_removed, 1);
        assert_eq!(stats.prefixes_removed, 1);
    }

    #[test]
    fn test_partial_removal_adjusts_counters() {
        let mut table = ecmp_table();
        filter_backend(&mut table, &backend(&["PortChannel4001"]));

        let entry = &table.get("0.0.0.0/0").unwrap()[0];
        assert_eq!(entry.nexthops.len(), 2);
        assert_eq!(entry.internal_next_hop_num, 2);
        assert_eq!(entry.internal_next_hop_active_num, 2);
        // nexthop without an interface name is never filtered
        assert!(entry.nexthops.iter().any(|nh| nh.interface_name.is_none()));
        assert!(table.get("192.168.0.0/24").is_none());
    }

    #[test]
    fn test_active_count_untouched_when_originally_zero() {
        let text = json!({
            "10.0.0.0/8": [{
                "protocol": "bgp",
                "internalNextHopNum": 2,
                "internalNextHopActiveNum": 0,
                "nexthops": [
                    {"ip": "10.1.0.1", "interfaceName": "PortChannel4001"},
                    {"ip": "10.0.0.1", "interfaceName": "PortChannel0001"}
                ]
            }]
        })
        .to_string();
        let mut table = RouteTable::from_json("", &text).unwrap();
        filter_backend(&mut table, &backend(&["PortChannel4001"]));

        let entry = &table.get("10.0.0.0/8").unwrap()[0];
        assert_eq!(entry.internal_next_hop_num, 1);
        assert_eq!(entry.internal_next_hop_active_num, 0);
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let set = backend(&["PortChannel4001"]);
        let mut once = ecmp_table();
        filter_backend(&mut once, &set);
        let mut twice = once.clone();
        let stats = filter_backend(&mut twice, &set);
        assert_eq!(once, twice);
        assert_eq!(stats, FilterStats::default());
    }

    #[test]
    fn test_apply_aliases() {
        let mut table = ecmp_table();
        let aliases: HashMap<String, String> =
            [("PortChannel0001".to_string(), "pc1".to_string())].into();
        apply_aliases(&mut table, &aliases);

        let entry = &table.get("0.0.0.0/0").unwrap()[0];
        assert_eq!(entry.nexthops[0].interface_name.as_deref(), Some("pc1"));
        assert_eq!(
            entry.nexthops[1].interface_name.as_deref(),
            Some("PortChannel4001")
        );
        assert_eq!(entry.nexthops[2].interface_name, None);
    }
}
