//! Routing stack detection
//!
//! The routing daemon flavor is detected at most once per process; every later
//! call returns the first answer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::process::Command;
use std::str::FromStr;
use std::sync::OnceLock;

/// Process-wide routing stack
static ROUTING_STACK: OnceLock<RoutingStack> = OnceLock::new();

/// Routing daemon flavor running on the device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingStack {
    #[default]
    Frr,
    Quagga,
}

impl fmt::Display for RoutingStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutingStack::Frr => write!(f, "frr"),
            RoutingStack::Quagga => write!(f, "quagga"),
        }
    }
}

impl FromStr for RoutingStack {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "frr" => Ok(RoutingStack::Frr),
            "quagga" => Ok(RoutingStack::Quagga),
            _ => Err(format!(
                "Unknown routing stack '{}'. Valid values: frr, quagga",
                s
            )),
        }
    }
}

/// Return the process-wide routing stack, resolving it on first use
///
/// A configured value short-circuits detection. Once resolved, later calls
/// ignore `configured` and return the cached stack.
pub fn routing_stack(configured: Option<RoutingStack>) -> RoutingStack {
    *ROUTING_STACK.get_or_init(|| match configured {
        Some(stack) => stack,
        None => detect_routing_stack(),
    })
}

fn detect_routing_stack() -> RoutingStack {
    let output = Command::new("docker")
        .args(["ps", "--format", "{{.Image}}"])
        .output();

    match output {
        Ok(out) if out.status.success() => {
            let images = String::from_utf8_lossy(&out.stdout);
            match stack_from_images(&images) {
                Some(stack) => {
                    tracing::debug!("Detected routing stack: {}", stack);
                    stack
                }
                None => {
                    tracing::warn!("No routing container found, assuming frr");
                    RoutingStack::Frr
                }
            }
        }
        Ok(out) => {
            tracing::warn!(
                "docker ps exited with {}, assuming frr routing stack",
                out.status
            );
            RoutingStack::Frr
        }
        Err(e) => {
            tracing::warn!("Unable to run docker ps ({}), assuming frr routing stack", e);
            RoutingStack::Frr
        }
    }
}

/// Infer the stack from `docker ps` image names, one per line
pub fn stack_from_images(images: &str) -> Option<RoutingStack> {
    images
        .lines()
        .map(|l| l.trim().to_lowercase())
        .filter(|l| l.contains("bgp") || l.contains("fpm"))
        .find_map(|image| {
            if image.contains("quagga") {
                Some(RoutingStack::Quagga)
            } else if image.contains("frr") {
                Some(RoutingStack::Frr)
            } else {
                None
            }
        })
}
