//! Route view arguments

use crate::error::RouteviewError;
use crate::query::{AddressFamily, RouteCommand};
use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Arguments for a route view
///
/// Used as clap arguments by the CLI (when the `cli` feature is enabled)
/// and constructible directly by library users.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct RouteViewArgs {
    /// Prefix or address to look up; all routes when omitted
    #[cfg_attr(feature = "cli", clap(value_name = "PREFIX|ADDRESS"))]
    pub target: Option<String>,

    /// Show IPv6 routes instead of IPv4
    #[cfg_attr(feature = "cli", clap(long))]
    #[serde(default)]
    pub ipv6: bool,

    /// VRF to show routes for
    #[cfg_attr(feature = "cli", clap(long))]
    pub vrf: Option<String>,

    /// Display option: frontend or all
    #[cfg_attr(feature = "cli", clap(short, long))]
    pub display: Option<String>,

    /// Namespace to query, or "all"
    #[cfg_attr(feature = "cli", clap(short, long))]
    pub namespace: Option<String>,

    /// Show interface aliases instead of interface names
    #[cfg_attr(feature = "cli", clap(long))]
    #[serde(default)]
    pub alias: bool,
}

impl RouteViewArgs {
    /// Create args for a full-table view
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a single prefix or address
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn ipv6(mut self) -> Self {
        self.ipv6 = true;
        self
    }

    pub fn with_vrf(mut self, vrf: impl Into<String>) -> Self {
        self.vrf = Some(vrf.into());
        self
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn family(&self) -> AddressFamily {
        if self.ipv6 {
            AddressFamily::Ipv6
        } else {
            AddressFamily::Ipv4
        }
    }

    /// Reject targets that are neither a prefix nor an address of the
    /// selected family
    pub fn validate(&self) -> Result<(), RouteviewError> {
        let Some(target) = &self.target else {
            return Ok(());
        };
        let is_v6 = if target.contains('/') {
            target
                .parse::<IpNet>()
                .ok()
                .map(|n| matches!(n, IpNet::V6(_)))
        } else {
            target.parse::<IpAddr>().ok().map(|a| a.is_ipv6())
        }
        .ok_or_else(|| {
            RouteviewError::InvalidArgument(format!(
                "'{}' is not a valid prefix or address",
                target
            ))
        })?;

        if is_v6 != self.ipv6 {
            return Err(RouteviewError::InvalidArgument(format!(
                "'{}' does not match the {} address family",
                target,
                self.family().label()
            )));
        }
        Ok(())
    }

    /// A bare address (not a prefix) selects the single-route detail view
    pub fn is_single_route(&self) -> bool {
        self.target
            .as_deref()
            .map(|t| !t.contains('/') && t.parse::<IpAddr>().is_ok())
            .unwrap_or(false)
    }

    pub fn command(&self) -> RouteCommand {
        RouteCommand::ShowRoute {
            family: self.family(),
            vrf: self.vrf.clone(),
            target: self.target.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_route_detection() {
        assert!(!RouteViewArgs::new().is_single_route());
        assert!(!RouteViewArgs::new()
            .with_target("10.0.0.0/8")
            .is_single_route());
        assert!(RouteViewArgs::new()
            .with_target("10.0.0.1")
            .is_single_route());
        assert!(RouteViewArgs::new()
            .ipv6()
            .with_target("fc00::1")
            .is_single_route());
    }

    #[test]
    fn test_validate_target() {
        assert!(RouteViewArgs::new().validate().is_ok());
        assert!(RouteViewArgs::new()
            .with_target("10.0.0.0/8")
            .validate()
            .is_ok());
        assert!(RouteViewArgs::new()
            .with_target("10.0.0.0/33")
            .validate()
            .is_err());
        assert!(RouteViewArgs::new()
            .with_target("fc00::1")
            .validate()
            .is_err());
        assert!(RouteViewArgs::new()
            .ipv6()
            .with_target("fc00::/64")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_rejects_garbage_in_both_forms() {
        for target in ["10.0.0.0/abc", "not-an-address", "fc00::zz/64"] {
            let err = RouteViewArgs::new()
                .with_target(target)
                .validate()
                .unwrap_err();
            assert_eq!(
                err,
                RouteviewError::InvalidArgument(format!(
                    "'{}' is not a valid prefix or address",
                    target
                ))
            );
        }
        assert!(RouteViewArgs::new()
            .with_target("10.1.0.32")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_command() {
        let args = RouteViewArgs::new().with_vrf("Vrf-red").with_target("10.0.0.1");
        assert_eq!(
            args.command(),
            RouteCommand::ShowRoute {
                family: AddressFamily::Ipv4,
                vrf: Some("Vrf-red".to_string()),
                target: Some("10.0.0.1".to_string()),
            }
        );
    }
}
