//! BGP summary types

use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use tabled::Tabled;

/// One row of the peer table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub struct BgpPeer {
    #[tabled(rename = "Neighbhor")]
    pub ip: String,
    #[tabled(rename = "V")]
    pub version: u64,
    #[tabled(rename = "AS")]
    pub remote_as: u64,
    #[tabled(rename = "MsgRcvd")]
    pub msg_rcvd: u64,
    #[tabled(rename = "MsgSent")]
    pub msg_sent: u64,
    #[tabled(rename = "TblVer")]
    pub table_version: u64,
    #[tabled(rename = "InQ")]
    pub inq: u64,
    #[tabled(rename = "OutQ")]
    pub outq: u64,
    #[tabled(rename = "Up/Down")]
    pub up_time: String,
    /// Received prefix count once established, the session state otherwise
    #[tabled(rename = "State/PfxRcd")]
    pub state_or_pfx_rcd: String,
    #[tabled(rename = "NeighborName")]
    pub neighbor_name: String,
}

impl BgpPeer {
    /// Peers sort by numeric address; unnumbered peers follow, by name
    pub fn sort_key(&self) -> (bool, Option<IpAddr>, String) {
        let addr = self.ip.parse::<IpAddr>().ok();
        (addr.is_none(), addr, self.ip.clone())
    }
}

/// Router-level identity reported by one instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterInfo {
    pub instance: String,
    pub router_id: String,
    pub vrf_id: i64,
    #[serde(rename = "as")]
    pub local_as: u64,
    pub table_version: u64,
}

/// BGP summary aggregated across instances
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BgpSummary {
    pub rib_count: u64,
    pub rib_memory: u64,
    pub peer_count: u64,
    pub peer_memory: u64,
    pub peer_group_count: u64,
    pub peer_group_memory: u64,
    pub router_info: Vec<RouterInfo>,
    pub peers: Vec<BgpPeer>,
    /// Whether any instance reported the address family at all
    #[serde(skip)]
    pub family_configured: bool,
}
