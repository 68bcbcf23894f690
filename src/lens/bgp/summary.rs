//! BGP summary aggregation and text rendering

use super::neighbor::NeighborNameTable;
use super::types::{BgpPeer, BgpSummary, RouterInfo};
use crate::error::RouteviewError;
use crate::query::AddressFamily;
use serde_json::{Map, Value};
use tabled::settings::Style;
use tabled::Table;
use tracing::debug;

/// Folds per-instance BGP summary responses into one [`BgpSummary`]
pub struct BgpSummaryAggregator<'a> {
    family: AddressFamily,
    names: &'a NeighborNameTable,
    show_peer: Box<dyn Fn(&str) -> bool + 'a>,
    summary: BgpSummary,
}

fn field<'v>(obj: &'v Value, name: &str) -> Result<&'v Value, RouteviewError> {
    obj.get(name)
        .ok_or_else(|| RouteviewError::MissingField(name.to_string()))
}

fn malformed(instance: &str, name: &str, expected: &str) -> RouteviewError {
    RouteviewError::MalformedResponse {
        instance: instance.to_string(),
        reason: format!("'{}' is not {}", name, expected),
    }
}

fn field_u64(instance: &str, obj: &Value, name: &str) -> Result<u64, RouteviewError> {
    field(obj, name)?
        .as_u64()
        .ok_or_else(|| malformed(instance, name, "an unsigned integer"))
}

fn field_i64(instance: &str, obj: &Value, name: &str) -> Result<i64, RouteviewError> {
    field(obj, name)?
        .as_i64()
        .ok_or_else(|| malformed(instance, name, "an integer"))
}

fn field_str(instance: &str, obj: &Value, name: &str) -> Result<String, RouteviewError> {
    field(obj, name)?
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| malformed(instance, name, "a string"))
}

impl<'a> BgpSummaryAggregator<'a> {
    /// `show_peer` decides per peer address whether the session is listed
    pub fn new(
        family: AddressFamily,
        names: &'a NeighborNameTable,
        show_peer: impl Fn(&str) -> bool + 'a,
    ) -> Self {
        Self {
            family,
            names,
            show_peer: Box::new(show_peer),
            summary: BgpSummary::default(),
        }
    }

    /// Add one instance's response; a response without the family's unicast
    /// section contributes nothing
    pub fn add_instance(&mut self, instance: &str, response: &Value) -> Result<(), RouteviewError> {
        let Some(section) = response.get(self.family.unicast_key()) else {
            debug!(
                "instance '{}' has no {} section",
                instance,
                self.family.unicast_key()
            );
            return Ok(());
        };

        let rib_count = field_u64(instance, section, "ribCount")?;
        let rib_memory = field_u64(instance, section, "ribMemory")?;
        let peer_count = field_u64(instance, section, "peerCount")?;
        let peer_memory = field_u64(instance, section, "peerMemory")?;
        let peer_group_count = field_u64(instance, section, "peerGroupCount")?;
        let peer_group_memory = field_u64(instance, section, "peerGroupMemory")?;

        let router_info = RouterInfo {
            instance: instance.to_string(),
            router_id: field_str(instance, section, "routerId")?,
            vrf_id: field_i64(instance, section, "vrfId")?,
            local_as: field_u64(instance, section, "as")?,
            table_version: field_u64(instance, section, "tableVersion")?,
        };

        let empty = Map::new();
        let peers = match field(section, "peers")? {
            Value::Object(peers) => peers,
            Value::Null => &empty,
            _ => return Err(malformed(instance, "peers", "an object")),
        };

        let mut rows = Vec::with_capacity(peers.len());
        for (ip, peer) in peers {
            if !(self.show_peer)(ip) {
                debug!("hiding internal peer {} of instance '{}'", ip, instance);
                continue;
            }
            rows.push(self.peer_row(instance, ip, peer)?);
        }

        let summary = &mut self.summary;
        summary.family_configured = true;
        summary.rib_count += rib_count;
        summary.rib_memory += rib_memory;
        summary.peer_count += peer_count;
        summary.peer_memory += peer_memory;
        summary.peer_group_count += peer_group_count;
        summary.peer_group_memory += peer_group_memory;
        summary.router_info.push(router_info);
        summary.peers.extend(rows);
        Ok(())
    }

    fn peer_row(&self, instance: &str, ip: &str, peer: &Value) -> Result<BgpPeer, RouteviewError> {
        let state = field_str(instance, peer, "state")?;
        let state_or_pfx_rcd = if state == "Established" {
            field_u64(instance, peer, "pfxRcd")?.to_string()
        } else {
            state
        };

        Ok(BgpPeer {
            ip: ip.to_string(),
            version: field_u64(instance, peer, "version")?,
            remote_as: field_u64(instance, peer, "remoteAs")?,
            msg_rcvd: field_u64(instance, peer, "msgRcvd")?,
            msg_sent: field_u64(instance, peer, "msgSent")?,
            table_version: field_u64(instance, peer, "tableVersion")?,
            inq: field_u64(instance, peer, "inq")?,
            outq: field_u64(instance, peer, "outq")?,
            up_time: field_str(instance, peer, "peerUptime")?,
            state_or_pfx_rcd,
            neighbor_name: self.names.resolve(ip).to_string(),
        })
    }

    /// Finish aggregation with peers in numeric address order
    pub fn finish(mut self) -> BgpSummary {
        self.summary.peers.sort_by_key(BgpPeer::sort_key);
        self.summary
    }
}

/// FRR-style summary text; `markdown` switches the peer table style
pub fn render_text(summary: &BgpSummary, family: AddressFamily, markdown: bool) -> String {
    if !summary.family_configured {
        return format!("No {} neighbor is configured\n", family.label());
    }

    let mut lines = vec![format!("{} Unicast Summary:", family.label())];
    for info in &summary.router_info {
        let label = if info.instance.is_empty() {
            String::new()
        } else {
            format!("{}: ", info.instance)
        };
        lines.push(format!(
            "{}BGP router identifier {}, local AS number {} vrf-id {}",
            label, info.router_id, info.local_as, info.vrf_id
        ));
        lines.push(format!("{}BGP table version {}", label, info.table_version));
    }
    lines.push(format!(
        "RIB entries {}, using {} bytes of memory",
        summary.rib_count, summary.rib_memory
    ));
    lines.push(format!(
        "Peers {}, using {} KiB of memory",
        summary.peer_count,
        summary.peer_memory / 1024
    ));
    lines.push(format!(
        "Peer groups {}, using {} bytes of memory",
        summary.peer_group_count, summary.peer_group_memory
    ));
    lines.push(String::new());

    let table = if markdown {
        Table::new(&summary.peers).with(Style::markdown()).to_string()
    } else {
        Table::new(&summary.peers).with(Style::rounded()).to_string()
    };
    lines.push(table);
    lines.push(String::new());
    lines.push(format!("Total number of neighbors {}", summary.peers.len()));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
