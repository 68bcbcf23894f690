//! Routing-daemon query dispatch
//!
//! Commands are described by [`RouteCommand`] and turned into daemon command
//! strings by a [`QueryExecutor`] chosen once per process from the detected
//! [`RoutingStack`]. Merge and render code never sees the flavor.

pub mod stack;

pub use stack::{routing_stack, stack_from_images, RoutingStack};

use crate::error::RouteviewError;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::process::Command;
use tracing::debug;

/// First character of an error-marked daemon response
pub const ERROR_MARKER: char = '%';

/// Token appended to every query to request JSON output
const JSON_SUFFIX: &str = "json";

/// Address family of a query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressFamily {
    #[default]
    Ipv4,
    Ipv6,
}

impl AddressFamily {
    /// Human label used in summary banners, e.g. `IPv4`
    pub fn label(&self) -> &'static str {
        match self {
            AddressFamily::Ipv4 => "IPv4",
            AddressFamily::Ipv6 => "IPv6",
        }
    }

    /// Key of the unicast section in a BGP summary response
    pub fn unicast_key(&self) -> &'static str {
        match self {
            AddressFamily::Ipv4 => "ipv4Unicast",
            AddressFamily::Ipv6 => "ipv6Unicast",
        }
    }

    fn route_keyword(&self) -> &'static str {
        match self {
            AddressFamily::Ipv4 => "ip",
            AddressFamily::Ipv6 => "ipv6",
        }
    }
}

/// A query independent of the daemon flavor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteCommand {
    ShowRoute {
        family: AddressFamily,
        vrf: Option<String>,
        target: Option<String>,
    },
    ShowBgpSummary {
        family: AddressFamily,
    },
}

/// Capability to run one query against one routing-daemon instance
pub trait QueryExecutor {
    /// Render the flavor-specific command string
    fn command_string(&self, command: &RouteCommand) -> Result<String, RouteviewError>;

    /// Run the command against `instance` and return the raw response text
    fn query(&self, command: &RouteCommand, instance: &str) -> Result<String>;
}

/// Runs `vtysh` for a namespace, optionally through `sudo`
#[derive(Debug, Clone)]
pub struct VtyshRunner {
    pub vtysh_path: String,
    pub use_sudo: bool,
}

impl Default for VtyshRunner {
    fn default() -> Self {
        Self {
            vtysh_path: "vtysh".to_string(),
            use_sudo: false,
        }
    }
}

impl VtyshRunner {
    /// Argument vector for one invocation; the default instance gets no `-n`
    pub fn args(&self, command: &str, instance: &str) -> Vec<String> {
        let mut args = Vec::new();
        if self.use_sudo {
            args.push(self.vtysh_path.clone());
        }
        if !instance.is_empty() {
            args.push("-n".to_string());
            args.push(instance.to_string());
        }
        args.push("-c".to_string());
        args.push(command.to_string());
        args
    }

    pub fn run(&self, command: &str, instance: &str) -> Result<String> {
        let program = if self.use_sudo {
            "sudo"
        } else {
            self.vtysh_path.as_str()
        };
        let output = Command::new(program)
            .args(self.args(command, instance))
            .output()
            .map_err(|e| anyhow!("Failed to run {}: {}", program, e))?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        if !output.status.success() && stdout.trim().is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "{} exited with {}: {}",
                program,
                output.status,
                stderr.trim()
            ));
        }
        Ok(stdout)
    }
}

/// FRR `vtysh` command dialect
#[derive(Debug, Clone, Default)]
pub struct FrrVtysh {
    runner: VtyshRunner,
}

impl FrrVtysh {
    pub fn new(runner: VtyshRunner) -> Self {
        Self { runner }
    }
}

impl QueryExecutor for FrrVtysh {
    fn command_string(&self, command: &RouteCommand) -> Result<String, RouteviewError> {
        Ok(match command {
            RouteCommand::ShowRoute {
                family,
                vrf,
                target,
            } => route_command(family.route_keyword(), vrf.as_deref(), target.as_deref()),
            RouteCommand::ShowBgpSummary { family } => match family {
                AddressFamily::Ipv4 => format!("show ip bgp summary {}", JSON_SUFFIX),
                AddressFamily::Ipv6 => format!("show bgp ipv6 summary {}", JSON_SUFFIX),
            },
        })
    }

    fn query(&self, command: &RouteCommand, instance: &str) -> Result<String> {
        let cmd = self.command_string(command)?;
        self.runner.run(&cmd, instance)
    }
}

/// Quagga `vtysh` command dialect
#[derive(Debug, Clone, Default)]
pub struct QuaggaVtysh {
    runner: VtyshRunner,
}

impl QuaggaVtysh {
    pub fn new(runner: VtyshRunner) -> Self {
        Self { runner }
    }
}

impl QueryExecutor for QuaggaVtysh {
    fn command_string(&self, command: &RouteCommand) -> Result<String, RouteviewError> {
        match command {
            RouteCommand::ShowRoute {
                vrf: Some(vrf), ..
            } => Err(RouteviewError::InvalidArgument(format!(
                "vrf '{}' is not supported by the quagga routing stack",
                vrf
            ))),
            RouteCommand::ShowRoute { family, target, .. } => Ok(route_command(
                family.route_keyword(),
                None,
                target.as_deref(),
            )),
            RouteCommand::ShowBgpSummary { family } => Ok(format!(
                "show {} bgp summary {}",
                family.route_keyword(),
                JSON_SUFFIX
            )),
        }
    }

    fn query(&self, command: &RouteCommand, instance: &str) -> Result<String> {
        let cmd = self.command_string(command)?;
        self.runner.run(&cmd, instance)
    }
}

fn route_command(keyword: &str, vrf: Option<&str>, target: Option<&str>) -> String {
    let mut cmd = format!("show {} route", keyword);
    if let Some(vrf) = vrf {
        cmd.push_str(&format!(" vrf {}", vrf));
    }
    if let Some(target) = target {
        cmd.push_str(&format!(" {}", target));
    }
    cmd.push_str(&format!(" {}", JSON_SUFFIX));
    cmd
}

/// Pick the executor implementation for a routing stack
pub fn executor_for(stack: RoutingStack, runner: VtyshRunner) -> Box<dyn QueryExecutor> {
    match stack {
        RoutingStack::Frr => Box::new(FrrVtysh::new(runner)),
        RoutingStack::Quagga => Box::new(QuaggaVtysh::new(runner)),
    }
}

/// A validated, non-empty response from one instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceResponse {
    pub instance: String,
    pub text: String,
}

/// Classify a raw response: error-marked, empty, or usable
pub fn check_response(instance: &str, text: &str) -> Result<(), RouteviewError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(RouteviewError::EmptyResponse {
            instance: instance.to_string(),
        });
    }
    if trimmed.starts_with(ERROR_MARKER) {
        return Err(RouteviewError::QueryFailed {
            instance: instance.to_string(),
            message: strip_query_suffix(trimmed),
        });
    }
    Ok(())
}

/// Remove the `json` token the query layer appended to the echoed command
fn strip_query_suffix(message: &str) -> String {
    message
        .lines()
        .map(|line| {
            let line = line.trim_end();
            line.strip_suffix(JSON_SUFFIX)
                .filter(|l| l.ends_with(' '))
                .map(|l| l.trim_end())
                .unwrap_or(line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Query every instance in order, stopping at the first failed or empty one
pub fn query_instances(
    executor: &dyn QueryExecutor,
    command: &RouteCommand,
    instances: &[String],
) -> Result<Vec<InstanceResponse>> {
    let mut responses = Vec::with_capacity(instances.len());
    for instance in instances {
        debug!("querying instance '{}' with {:?}", instance, command);
        let text = executor.query(command, instance)?;
        check_response(instance, &text)?;
        responses.push(InstanceResponse {
            instance: instance.clone(),
            text,
        });
    }
    Ok(responses)
}
