use crate::query::{RoutingStack, VtyshRunner};
use anyhow::{anyhow, Result};
use config::Config;
use std::collections::HashMap;
use std::path::Path;

pub struct RouteviewConfig {
    /// Path to the topology document; single-instance platform when unset
    pub topology_file: Option<String>,

    /// Routing-daemon shell used to run queries
    pub vtysh_path: String,

    /// Routing stack flavor; detected from the running containers when unset
    pub routing_stack: Option<RoutingStack>,

    /// Run the routing-daemon shell through sudo
    pub use_sudo: bool,
}

const EMPTY_CONFIG: &str = r#"### routeview configuration file

### topology document listing namespaces, back-end interfaces and neighbor names
# topology_file = "/etc/routeview/topology.json"

### routing-daemon shell
# vtysh_path = "vtysh"

### routing stack flavor: frr or quagga (detected when unset)
# routing_stack = "frr"

### run queries through sudo
# use_sudo = false
"#;

impl Default for RouteviewConfig {
    fn default() -> Self {
        Self {
            topology_file: None,
            vtysh_path: "vtysh".to_string(),
            routing_stack: None,
            use_sudo: false,
        }
    }
}

impl RouteviewConfig {
    /// Function to create and initialize a new configuration
    pub fn new(path: &Option<String>) -> Result<RouteviewConfig> {
        let mut builder = Config::builder();

        match path {
            Some(p) => {
                let path = Path::new(p.as_str());
                if path.exists() {
                    let path_str = path
                        .to_str()
                        .ok_or_else(|| anyhow!("Could not convert path to string"))?;
                    builder = builder.add_source(config::File::with_name(path_str));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG)
                        .map_err(|e| anyhow!("Unable to create config file: {}", e))?;
                }
            }
            None => {
                let routeview_dir = Self::config_dir()?;
                std::fs::create_dir_all(routeview_dir.as_str())
                    .map_err(|e| anyhow!("Unable to create routeview directory: {}", e))?;
                let p = format!("{}/routeview.toml", routeview_dir.as_str());
                if Path::new(p.as_str()).exists() {
                    builder = builder.add_source(config::File::with_name(p.as_str()));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG).map_err(|e| {
                        anyhow!("Unable to create config file {}: {}", p.as_str(), e)
                    })?;
                }
            }
        }

        // E.g., `ROUTEVIEW_USE_SUDO=true routeview route` runs vtysh through sudo
        builder = builder.add_source(config::Environment::with_prefix("ROUTEVIEW"));

        let settings = builder
            .build()
            .map_err(|e| anyhow!("Failed to build configuration: {}", e))?;

        let config = settings
            .try_deserialize::<HashMap<String, String>>()
            .map_err(|e| anyhow!("Failed to deserialize configuration: {}", e))?;

        Self::from_map(&config)
    }

    fn from_map(config: &HashMap<String, String>) -> Result<RouteviewConfig> {
        let defaults = RouteviewConfig::default();

        let routing_stack = match config.get("routing_stack") {
            Some(s) => Some(
                s.parse::<RoutingStack>()
                    .map_err(|e| anyhow!("Invalid routing_stack: {}", e))?,
            ),
            None => None,
        };

        let use_sudo = match config.get("use_sudo") {
            Some(s) => s
                .parse::<bool>()
                .map_err(|_| anyhow!("Invalid use_sudo value '{}'", s))?,
            None => defaults.use_sudo,
        };

        Ok(RouteviewConfig {
            topology_file: config.get("topology_file").cloned(),
            vtysh_path: config
                .get("vtysh_path")
                .cloned()
                .unwrap_or(defaults.vtysh_path),
            routing_stack,
            use_sudo,
        })
    }

    fn config_dir() -> Result<String> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| anyhow!("Could not find home directory"))?
            .to_str()
            .ok_or_else(|| anyhow!("Could not convert home directory path to string"))?
            .to_owned();
        Ok(format!("{}/.routeview", home_dir))
    }

    /// Get the default config file path
    pub fn config_file_path() -> String {
        let home_dir = dirs::home_dir()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|| "~".to_string());
        format!("{}/.routeview/routeview.toml", home_dir)
    }

    /// Query runner for the configured shell
    pub fn runner(&self) -> VtyshRunner {
        VtyshRunner {
            vtysh_path: self.vtysh_path.clone(),
            use_sudo: self.use_sudo,
        }
    }

    /// Display configuration summary
    pub fn summary(&self) -> String {
        let stack = match &self.routing_stack {
            Some(stack) => stack.to_string(),
            None => "auto-detect".to_string(),
        };
        [
            format!(
                "Topology File:      {}",
                self.topology_file.as_deref().unwrap_or("(none)")
            ),
            format!("Vtysh Path:         {}", self.vtysh_path),
            format!("Routing Stack:      {}", stack),
            format!("Use Sudo:           {}", self.use_sudo),
        ]
        .join("\n")
    }
}
