//! Merging per-instance route tables into one combined table

use super::types::{NextHop, RouteEntry, RouteTable};
use serde::Serialize;
use std::collections::btree_map::Entry;
use std::collections::HashSet;
use tracing::debug;

/// Protocols whose routes carry exactly one nexthop
pub const SINGLE_NEXTHOP_PROTOCOLS: &[&str] = &["connected", "local"];

pub fn is_single_nexthop_protocol(protocol: &str) -> bool {
    SINGLE_NEXTHOP_PROTOCOLS.contains(&protocol)
}

/// What a merge pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    pub prefixes_added: usize,
    pub entries_appended: usize,
    pub duplicates_discarded: usize,
    pub nexthops_added: usize,
}

/// Fold `incoming`, reported by `instance`, into `combined`
pub fn merge(combined: &mut RouteTable, instance: &str, incoming: RouteTable) -> MergeStats {
    let mut stats = MergeStats::default();

    for (prefix, entries) in incoming.into_routes() {
        match combined.entry(prefix) {
            Entry::Vacant(slot) => {
                slot.insert(entries);
                stats.prefixes_added += 1;
            }
            Entry::Occupied(slot) => {
                let prefix = slot.key().clone();
                let existing = slot.into_mut();
                for entry in entries {
                    merge_entry(existing, entry, &mut stats);
                }
                debug!("merged {} from instance '{}'", prefix, instance);
            }
        }
    }

    stats
}

fn merge_entry(existing: &mut Vec<RouteEntry>, incoming: RouteEntry, stats: &mut MergeStats) {
    if is_single_nexthop_protocol(&incoming.protocol) {
        let duplicate = existing
            .iter()
            .filter(|e| e.protocol == incoming.protocol)
            .any(|e| shares_interface(&e.nexthops, &incoming.nexthops));
        if duplicate {
            stats.duplicates_discarded += 1;
        } else {
            existing.push(incoming);
            stats.entries_appended += 1;
        }
        return;
    }

    let Some(target) = existing
        .iter_mut()
        .find(|e| e.protocol == incoming.protocol)
    else {
        existing.push(incoming);
        stats.entries_appended += 1;
        return;
    };

    let both_active = target.has_active_nexthop() && incoming.has_active_nexthop();
    // Only nexthops already on the target count as duplicates; repeats within
    // one instance's answer are kept as reported.
    let seen: HashSet<_> = target.nexthops.iter().map(NextHop::key).collect();
    let survivors: Vec<NextHop> = incoming
        .nexthops
        .into_iter()
        .filter(|nh| !seen.contains(&nh.key()))
        .collect();

    let added = survivors.len();
    target.nexthops.extend(survivors);
    target.internal_next_hop_num += added as i64;
    if both_active {
        target.internal_next_hop_active_num += added as i64;
    }
    stats.nexthops_added += added;
}

fn shares_interface(existing: &[NextHop], incoming: &[NextHop]) -> bool {
    existing
        .iter()
        .any(|e| incoming.iter().any(|i| i.interface_name == e.interface_name))
}
