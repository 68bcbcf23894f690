//! BGP summary arguments

use crate::query::{AddressFamily, RouteCommand};
use serde::{Deserialize, Serialize};

/// Arguments for a BGP summary view
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct BgpSummaryArgs {
    /// Summarize IPv6 sessions instead of IPv4
    #[cfg_attr(feature = "cli", clap(long))]
    #[serde(default)]
    pub ipv6: bool,

    /// Display option: frontend or all
    #[cfg_attr(feature = "cli", clap(short, long))]
    pub display: Option<String>,

    /// Namespace to query, or "all"
    #[cfg_attr(feature = "cli", clap(short, long))]
    pub namespace: Option<String>,
}

impl BgpSummaryArgs {
    pub fn new(family: AddressFamily) -> Self {
        Self {
            ipv6: family == AddressFamily::Ipv6,
            ..Default::default()
        }
    }

    pub fn family(&self) -> AddressFamily {
        if self.ipv6 {
            AddressFamily::Ipv6
        } else {
            AddressFamily::Ipv4
        }
    }

    pub fn command(&self) -> RouteCommand {
        RouteCommand::ShowBgpSummary {
            family: self.family(),
        }
    }
}
