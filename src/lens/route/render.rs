//! Route rendering: FRR-style text table, single-route detail, and JSON

use super::types::{NextHop, RouteEntry, RouteTable};
use super::CombinedRoutes;
use anyhow::Result;
use itertools::Itertools;
use serde_json::Value;
use std::collections::BTreeMap;

/// Names of the reserved MPLS labels 0 through 15
pub const MPLS_RESERVED_LABELS: [&str; 16] = [
    "IPv4 Explicit Null",
    "Router Alert",
    "IPv6 Explicit Null",
    "implicit-null",
    "Reserved (4)",
    "Reserved (5)",
    "Reserved (6)",
    "Entropy Label Indicator",
    "Reserved (8)",
    "Reserved (9)",
    "Reserved (10)",
    "Reserved (11)",
    "Reserved (12)",
    "Generic Associated Channel",
    "OAM Alert",
    "Extension",
];

pub const ROUTE_LEGEND: &str = "\
Codes: K - kernel route, C - connected, L - local, S - static,
       R - RIP, O - OSPF, I - IS-IS, B - BGP, E - EIGRP, N - NHRP,
       T - Table, v - VNC, V - VNC-Direct, A - Babel, D - SHARP,
       F - PBR, f - OpenFabric,
       > - selected route, * - FIB route, q - queued route, r - rejected route
";

/// Render a label stack, e.g. `[3, 20]` as `implicit-null/20`
pub fn decode_labels(labels: &[u32]) -> String {
    labels
        .iter()
        .map(|label| match MPLS_RESERVED_LABELS.get(*label as usize) {
            Some(name) => name.to_string(),
            None => label.to_string(),
        })
        .join("/")
}

/// One-letter code of a routing protocol as shown in the legend
pub fn protocol_code(protocol: &str) -> char {
    match protocol {
        "kernel" => 'K',
        "connected" => 'C',
        "local" => 'L',
        "static" => 'S',
        "rip" | "ripng" => 'R',
        "ospf" | "ospf6" => 'O',
        "isis" => 'I',
        "bgp" => 'B',
        "eigrp" => 'E',
        "nhrp" => 'N',
        "table" => 'T',
        "vnc" => 'v',
        "vnc-direct" => 'V',
        "babel" => 'A',
        "sharp" => 'D',
        "pbr" => 'F',
        "openfabric" => 'f',
        _ => '?',
    }
}

/// Status glyph of one nexthop of an entry
pub fn status_glyph(entry: &RouteEntry, nexthop: &NextHop) -> char {
    if entry.queued {
        'q'
    } else if entry.failed {
        'r'
    } else if entry.installed && !nexthop.is_recursive_or_duplicate() {
        '*'
    } else {
        ' '
    }
}

fn shows_distance_metric(entry: &RouteEntry) -> bool {
    entry.protocol != "connected" || entry.distance != 0 || entry.metric != 0
}

fn describe_nexthop(entry: &RouteEntry, nh: &NextHop) -> String {
    let iface = nh.interface_name.as_deref().unwrap_or("");
    let mut s = String::new();

    if let Some(ip) = &nh.ip {
        s.push_str(&format!(" via {},", ip));
        if let Some(name) = &nh.interface_name {
            s.push_str(&format!(" {},", name));
        }
    } else if nh.directly_connected {
        s.push_str(&format!(" is directly connected, {},", iface));
    } else if nh.unreachable {
        if nh.reject {
            s.push_str(" (ICMP unreachable)");
        } else if nh.admin_prohibited {
            s.push_str(" (ICMP admin-prohibited)");
        } else if nh.blackhole {
            s.push_str(" (blackhole)");
        }
    }

    if let Some(vrf) = &nh.vrf {
        s.push_str(&format!(" (vrf {}, {},", vrf, iface));
    }
    if !nh.active {
        s.push_str(" inactive");
    }
    if nh.on_link {
        s.push_str(" onlink");
    }
    if nh.recursive {
        s.push_str(" (recursive)");
    }
    if let Some(src) = &nh.source {
        s.push_str(&format!(", src {}", src));
    }
    if let Some(labels) = nh.labels.as_deref().filter(|l| !l.is_empty()) {
        s.push_str(&format!(", label {}", decode_labels(labels)));
    }
    s.push_str(&format!(" {}", entry.uptime));
    s
}

fn entry_lines(prefix: &str, entry: &RouteEntry, lines: &mut Vec<String>) {
    let code = protocol_code(&entry.protocol);
    let selected = if entry.selected { '>' } else { ' ' };

    let mut head = format!(" {}", prefix);
    if shows_distance_metric(entry) {
        head.push_str(&format!(" [{}/{}]", entry.distance, entry.metric));
    }
    let pad = " ".repeat(head.chars().count());

    if entry.nexthops.is_empty() {
        lines.push(format!("{}{} {} {}", code, selected, head, entry.uptime));
        return;
    }

    for (i, nh) in entry.nexthops.iter().enumerate() {
        let glyph = status_glyph(entry, nh);
        let description = describe_nexthop(entry, nh);
        if i == 0 {
            lines.push(format!("{}{}{}{}{}", code, selected, glyph, head, description));
        } else {
            lines.push(format!("  {}{}{}", glyph, pad, description));
        }
    }
}

fn table_lines(table: &RouteTable, lines: &mut Vec<String>) {
    for (prefix, entries) in table.sorted() {
        for entry in entries {
            entry_lines(prefix, entry, lines);
        }
    }
}

/// Legend followed by one line per nexthop
pub fn render_table(routes: &CombinedRoutes) -> String {
    let mut lines: Vec<String> = ROUTE_LEGEND.lines().map(|l| l.to_string()).collect();
    lines.push(String::new());

    match routes {
        CombinedRoutes::Merged(table) => table_lines(table, &mut lines),
        CombinedRoutes::PerInstance(tables) => {
            for (label, table) in tables {
                lines.push(format!("{}:", label));
                table_lines(table, &mut lines);
                lines.push(String::new());
            }
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn detail_nexthop(nh: &NextHop) -> String {
    let mut s = "  *".to_string();

    if nh.directly_connected {
        s.push_str(&format!(
            " directly connected, {}",
            nh.interface_name.as_deref().unwrap_or("")
        ));
    } else if let Some(ip) = &nh.ip {
        s.push_str(&format!(" {}", ip));
        match &nh.interface_name {
            Some(name) => s.push_str(&format!(", via {}", name)),
            None if nh.recursive => s.push_str(" (recursive)"),
            None => {}
        }
    } else if nh.unreachable {
        let kind = if nh.reject {
            "ICMP unreachable"
        } else if nh.admin_prohibited {
            "ICMP admin-prohibited"
        } else {
            "blackhole"
        };
        s.push_str(&format!(" unreachable ({})", kind));
    }

    if !nh.active {
        s.push_str(" inactive");
    }
    if let Some(labels) = nh.labels.as_deref().filter(|l| !l.is_empty()) {
        s.push_str(&format!(", label {}", decode_labels(labels)));
    }
    s
}

fn detail_table_lines(table: &RouteTable, lines: &mut Vec<String>) {
    for (prefix, entries) in table.sorted() {
        for entry in entries {
            lines.push(format!("Routing entry for {}", prefix));
            let mut known = format!(
                "  Known via \"{}\", distance {}, metric {}",
                entry.protocol, entry.distance, entry.metric
            );
            if entry.selected {
                known.push_str(", best");
            }
            lines.push(known);
            lines.push(format!("  Last update {} ago", entry.uptime));
            for nh in &entry.nexthops {
                lines.push(detail_nexthop(nh));
            }
            lines.push(String::new());
        }
    }
}

/// Detail view of the entries covering a single queried address
pub fn render_detail(routes: &CombinedRoutes) -> String {
    let mut lines = Vec::new();
    match routes {
        CombinedRoutes::Merged(table) => detail_table_lines(table, &mut lines),
        CombinedRoutes::PerInstance(tables) => {
            for (label, table) in tables {
                lines.push(format!("{}:", label));
                detail_table_lines(table, &mut lines);
            }
        }
    }
    lines.join("\n")
}

/// Key-sorted JSON dump, grouped by instance label when instances are kept apart
pub fn render_json(routes: &CombinedRoutes, pretty: bool) -> Result<String> {
    // Round-trip through Value so object keys come out sorted at every level.
    let value: Value = match routes {
        CombinedRoutes::Merged(table) => serde_json::to_value(table)?,
        CombinedRoutes::PerInstance(tables) => {
            let grouped: BTreeMap<&str, &RouteTable> =
                tables.iter().map(|(l, t)| (l.as_str(), t)).collect();
            serde_json::to_value(grouped)?
        }
    };
    Ok(if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    })
}
