//! Platform and namespace enumeration
//!
//! Decides which routing-daemon instances a command talks to, and whether
//! back-end filtering and per-instance labeling apply.

pub mod topology;

pub use topology::{PeerRange, Topology};

use crate::error::RouteviewError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name of the single routing instance on single-ASIC platforms
pub const DEFAULT_NAMESPACE: &str = "";

/// Namespace argument value selecting every instance
pub const NAMESPACE_ALL: &str = "all";

/// Which interfaces and sessions a view includes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Only front-panel facing state (default on multi-instance platforms)
    #[default]
    Frontend,
    /// Everything, including ASIC-to-ASIC fabric state
    All,
}

impl DisplayMode {
    pub fn all_names() -> &'static [&'static str] {
        &["all", "frontend"]
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayMode::Frontend => write!(f, "frontend"),
            DisplayMode::All => write!(f, "all"),
        }
    }
}

impl FromStr for DisplayMode {
    type Err = RouteviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "frontend" => Ok(DisplayMode::Frontend),
            "all" => Ok(DisplayMode::All),
            _ => Err(RouteviewError::InvalidArgument(format!(
                "display option '{}' is not a valid option. Valid choices: {}",
                s,
                Self::all_names().join(", ")
            ))),
        }
    }
}

/// Routing-daemon instances available on this device
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Platform {
    frontend: Vec<String>,
    backend: Vec<String>,
}

impl Platform {
    pub fn new(frontend: Vec<String>, backend: Vec<String>) -> Self {
        Self { frontend, backend }
    }

    /// A platform with only the default instance
    pub fn single_instance() -> Self {
        Self::default()
    }

    pub fn is_multi_instance(&self) -> bool {
        !self.frontend.is_empty() || !self.backend.is_empty()
    }

    /// All namespaces, front-end first
    pub fn namespaces(&self) -> Vec<String> {
        self.frontend
            .iter()
            .chain(self.backend.iter())
            .cloned()
            .collect()
    }

    pub fn contains(&self, namespace: &str) -> bool {
        self.frontend.iter().any(|n| n == namespace) || self.backend.iter().any(|n| n == namespace)
    }
}

/// Result of namespace enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceSelection {
    /// Instances to query, in query order
    pub instances: Vec<String>,
    pub display: DisplayMode,
    /// Strip back-end nexthops and sessions
    pub filter_backend: bool,
    /// Keep instances apart and label each one in the output
    pub print_namespace_label: bool,
}

/// Resolve the display and namespace arguments against the platform
pub fn enumerate(
    platform: &Platform,
    display: Option<&str>,
    namespace: Option<&str>,
) -> Result<NamespaceSelection, RouteviewError> {
    let mode = match display {
        Some(d) => d.parse::<DisplayMode>()?,
        None => DisplayMode::default(),
    };

    if !platform.is_multi_instance() {
        if let Some(ns) = namespace {
            return Err(RouteviewError::InvalidArgument(format!(
                "namespace option '{}' is not applicable for single-instance platform",
                ns
            )));
        }
        return Ok(NamespaceSelection {
            instances: vec![DEFAULT_NAMESPACE.to_string()],
            display: mode,
            filter_backend: false,
            print_namespace_label: false,
        });
    }

    let instances = match namespace {
        None | Some(NAMESPACE_ALL) => platform.namespaces(),
        Some(ns) if platform.contains(ns) => vec![ns.to_string()],
        Some(ns) => {
            return Err(RouteviewError::UnknownNamespace {
                namespace: ns.to_string(),
                valid: platform.namespaces(),
            })
        }
    };

    let all_requested = mode == DisplayMode::All || namespace == Some(NAMESPACE_ALL);

    Ok(NamespaceSelection {
        print_namespace_label: all_requested && instances.len() > 1,
        filter_backend: mode == DisplayMode::Frontend,
        display: mode,
        instances,
    })
}
