//! Route lens
//!
//! Queries every selected routing-daemon instance, parses the route tables,
//! strips back-end nexthops, folds the instances into one table (or keeps
//! them apart when labeling), and renders the result.
//!
//! # Example
//!
//! ```rust,ignore
//! use routeview::lens::route::{RouteLens, RouteViewArgs};
//! use routeview::platform::{enumerate, Topology};
//! use routeview::query::{executor_for, routing_stack, VtyshRunner};
//!
//! let topology = Topology::load(Some("/etc/routeview/topology.json"))?;
//! let executor = executor_for(routing_stack(None), VtyshRunner::default());
//! let lens = RouteLens::new(executor.as_ref(), &topology);
//!
//! let args = RouteViewArgs::new().with_target("10.0.0.0/8");
//! let selection = enumerate(&topology.platform(), None, None)?;
//! let routes = lens.collect(&args, &selection)?;
//! println!("{}", lens.format(&routes, &args, OutputFormat::Table)?);
//! ```

pub mod args;
pub mod filter;
pub mod merge;
pub mod render;
pub mod types;

pub use args::RouteViewArgs;
pub use filter::{apply_aliases, filter_backend, FilterStats};
pub use merge::{merge, MergeStats, SINGLE_NEXTHOP_PROTOCOLS};
pub use types::{NextHop, NexthopKey, RouteEntry, RouteTable};

use crate::error::RouteviewError;
use crate::lens::utils::OutputFormat;
use crate::platform::{NamespaceSelection, Topology};
use crate::query::{query_instances, QueryExecutor};
use anyhow::Result;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Route tables ready for rendering
#[derive(Debug, Clone, PartialEq)]
pub enum CombinedRoutes {
    /// All instances folded into one table
    Merged(RouteTable),
    /// One table per instance label, in query order
    PerInstance(Vec<(String, RouteTable)>),
}

impl CombinedRoutes {
    pub fn tables_mut(&mut self) -> Vec<&mut RouteTable> {
        match self {
            CombinedRoutes::Merged(table) => vec![table],
            CombinedRoutes::PerInstance(tables) => tables.iter_mut().map(|(_, t)| t).collect(),
        }
    }

    pub fn apply_aliases(&mut self, aliases: &HashMap<String, String>) {
        for table in self.tables_mut() {
            apply_aliases(table, aliases);
        }
    }
}

/// Route lens over a query executor and the device topology
pub struct RouteLens<'a> {
    executor: &'a dyn QueryExecutor,
    backend_interfaces: HashSet<String>,
    aliases: &'a HashMap<String, String>,
}

impl<'a> RouteLens<'a> {
    pub fn new(executor: &'a dyn QueryExecutor, topology: &'a Topology) -> Self {
        Self {
            executor,
            backend_interfaces: topology.backend_interfaces(),
            aliases: &topology.interface_aliases,
        }
    }

    /// Query, parse, filter and combine the selected instances
    pub fn collect(
        &self,
        args: &RouteViewArgs,
        selection: &NamespaceSelection,
    ) -> Result<CombinedRoutes> {
        args.validate()?;

        let responses = query_instances(self.executor, &args.command(), &selection.instances)?;

        let mut tables = Vec::with_capacity(responses.len());
        for response in responses {
            let mut table = RouteTable::from_json(&response.instance, &response.text)?;
            if selection.filter_backend {
                let stats = filter_backend(&mut table, &self.backend_interfaces);
                debug!(
                    "instance '{}': removed {} back-end nexthops, {} entries, {} prefixes",
                    response.instance,
                    stats.nexthops_removed,
                    stats.entries_removed,
                    stats.prefixes_removed
                );
            }
            tables.push((response.instance, table));
        }

        let mut routes = if selection.print_namespace_label {
            CombinedRoutes::PerInstance(tables)
        } else {
            let mut combined = RouteTable::new();
            for (instance, table) in tables {
                let stats = merge(&mut combined, &instance, table);
                debug!("instance '{}': {:?}", instance, stats);
            }
            CombinedRoutes::Merged(combined)
        };

        if args.alias {
            routes.apply_aliases(self.aliases);
        }

        if let CombinedRoutes::Merged(table) = &routes {
            info!("combined route table holds {} prefixes", table.len());
        }
        Ok(routes)
    }

    /// Render combined routes in the requested format
    pub fn format(
        &self,
        routes: &CombinedRoutes,
        args: &RouteViewArgs,
        format: OutputFormat,
    ) -> Result<String> {
        match format {
            OutputFormat::Table if args.is_single_route() => Ok(render::render_detail(routes)),
            OutputFormat::Table => Ok(render::render_table(routes)),
            OutputFormat::Json => render::render_json(routes, false),
            OutputFormat::JsonPretty => render::render_json(routes, true),
            other => Err(RouteviewError::InvalidArgument(format!(
                "output format '{}' is not supported for routes",
                other
            ))
            .into()),
        }
    }

    /// Collect and render in one step
    pub fn show(
        &self,
        args: &RouteViewArgs,
        selection: &NamespaceSelection,
        format: OutputFormat,
    ) -> Result<String> {
        let routes = self.collect(args, selection)?;
        self.format(&routes, args, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{enumerate, Platform};
    use crate::query::testing::StaticExecutor;
    use serde_json::json;

    fn topology() -> Topology {
        Topology {
            frontend_namespaces: vec!["asic0".to_string(), "asic1".to_string()],
            backend_namespaces: vec!["asic2".to_string()],
            backend_interfaces: vec!["PortChannel4001".to_string(), "PortChannel4002".to_string()],
            interface_aliases: [("PortChannel0001".to_string(), "pc1".to_string())].into(),
            ..Default::default()
        }
    }

    fn asic0() -> String {
        json!({
            "0.0.0.0/0": [{
                "protocol": "bgp", "selected": true, "installed": true,
                "distance": 20, "metric": 0, "uptime": "00:05:00",
                "internalNextHopNum": 2, "internalNextHopActiveNum": 2,
                "nexthops": [
                    {"ip": "10.0.0.1", "interfaceName": "PortChannel0001", "active": true},
                    {"ip": "10.1.0.1", "interfaceName": "PortChannel4001", "active": true}
                ]
            }],
            "10.1.0.32/32": [{
                "protocol": "connected", "selected": true, "installed": true, "uptime": "1d",
                "nexthops": [{"directlyConnected": true, "interfaceName": "Loopback0", "active": true}]
            }]
        })
        .to_string()
    }

    fn asic1() -> String {
        json!({
            "0.0.0.0/0": [{
                "protocol": "bgp", "selected": true, "installed": true,
                "distance": 20, "metric": 0, "uptime": "00:05:00",
                "internalNextHopNum": 2, "internalNextHopActiveNum": 2,
                "nexthops": [
                    {"ip": "10.0.0.5", "interfaceName": "PortChannel0002", "active": true},
                    {"ip": "10.1.0.5", "interfaceName": "PortChannel4002", "active": true}
                ]
            }],
            "10.1.0.32/32": [{
                "protocol": "connected", "selected": true, "installed": true, "uptime": "1d",
                "nexthops": [{"directlyConnected": true, "interfaceName": "Loopback0", "active": true}]
            }]
        })
        .to_string()
    }

    fn asic2() -> String {
        json!({
            "10.1.0.0/31": [{
                "protocol": "connected", "selected": true, "installed": true, "uptime": "1d",
                "nexthops": [{"directlyConnected": true, "interfaceName": "PortChannel4001", "active": true}]
            }]
        })
        .to_string()
    }

    fn executor() -> StaticExecutor {
        StaticExecutor::new(&[("asic0", &asic0()), ("asic1", &asic1()), ("asic2", &asic2())])
    }

    #[test]
    fn test_frontend_view_filters_and_merges() {
        let topo = topology();
        let exec = executor();
        let lens = RouteLens::new(&exec, &topo);
        let selection = enumerate(&topo.platform(), None, None).unwrap();

        let routes = lens.collect(&RouteViewArgs::new(), &selection).unwrap();
        let CombinedRoutes::Merged(table) = routes else {
            panic!("expected merged routes");
        };

        assert!(table.get("10.1.0.0/31").is_none());
        let default = &table.get("0.0.0.0/0").unwrap()[0];
        let names: Vec<_> = default
            .nexthops
            .iter()
            .filter_map(|nh| nh.interface_name.as_deref())
            .collect();
        assert_eq!(names, vec!["PortChannel0001", "PortChannel0002"]);
        assert_eq!(default.internal_next_hop_num, 2);
        assert_eq!(table.get("10.1.0.32/32").unwrap().len(), 1);
    }

    #[test]
    fn test_display_all_keeps_instances_apart() {
        let topo = topology();
        let exec = executor();
        let lens = RouteLens::new(&exec, &topo);
        let selection = enumerate(&topo.platform(), Some("all"), None).unwrap();

        let routes = lens.collect(&RouteViewArgs::new(), &selection).unwrap();
        let CombinedRoutes::PerInstance(tables) = &routes else {
            panic!("expected per-instance routes");
        };
        assert_eq!(tables.len(), 3);
        assert!(tables[2].1.get("10.1.0.0/31").is_some());
        assert_eq!(tables[0].1.get("0.0.0.0/0").unwrap()[0].nexthops.len(), 2);

        let out = lens
            .format(&routes, &RouteViewArgs::new(), OutputFormat::Table)
            .unwrap();
        assert!(out.contains("asic2:"));
    }

    #[test]
    fn test_alias_substitution() {
        let topo = topology();
        let exec = executor();
        let lens = RouteLens::new(&exec, &topo);
        let selection = enumerate(&topo.platform(), None, Some("asic0")).unwrap();

        let mut args = RouteViewArgs::new();
        args.alias = true;
        let out = lens.show(&args, &selection, OutputFormat::Table).unwrap();
        assert!(out.contains("via 10.0.0.1, pc1,"));
        assert!(!out.contains("PortChannel4001"));
    }

    #[test]
    fn test_query_failure_aborts_without_output() {
        let topo = topology();
        let exec = StaticExecutor::new(&[
            ("asic0", &asic0()),
            ("asic1", "% Unknown command: show ip route bogus json"),
            ("asic2", &asic2()),
        ]);
        let lens = RouteLens::new(&exec, &topo);
        let selection = enumerate(&topo.platform(), None, None).unwrap();

        let err = lens
            .show(&RouteViewArgs::new(), &selection, OutputFormat::Table)
            .unwrap_err();
        assert_eq!(err.to_string(), "% Unknown command: show ip route bogus");
        assert_eq!(exec.queried.borrow().len(), 2);
    }

    #[test]
    fn test_empty_response_is_benign() {
        let topo = Topology::default();
        let exec = StaticExecutor::new(&[("", "")]);
        let lens = RouteLens::new(&exec, &topo);
        let selection = enumerate(&Platform::single_instance(), None, None).unwrap();

        let err = lens
            .show(&RouteViewArgs::new(), &selection, OutputFormat::Table)
            .unwrap_err();
        assert!(RouteviewError::is_empty_response_err(&err));
    }

    #[test]
    fn test_single_route_uses_detail_view() {
        let topo = Topology::default();
        let exec = StaticExecutor::new(&[("", &asic0())]);
        let lens = RouteLens::new(&exec, &topo);
        let selection = enumerate(&Platform::single_instance(), None, None).unwrap();

        let args = RouteViewArgs::new().with_target("10.1.0.32");
        let out = lens.show(&args, &selection, OutputFormat::Table).unwrap();
        assert!(out.contains("Routing entry for 10.1.0.32/32"));
        assert!(out.contains("  * directly connected, Loopback0"));
        assert!(!out.starts_with("Codes:"));
    }

    #[test]
    fn test_markdown_is_rejected() {
        let topo = Topology::default();
        let exec = StaticExecutor::new(&[("", &asic0())]);
        let lens = RouteLens::new(&exec, &topo);
        let routes = CombinedRoutes::Merged(RouteTable::new());
        assert!(lens
            .format(&routes, &RouteViewArgs::new(), OutputFormat::Markdown)
            .is_err());
    }

    #[test]
    fn test_malformed_response_is_fatal() {
        let topo = Topology::default();
        let exec = StaticExecutor::new(&[("", "{\"10.0.0.0/8\": \"oops\"}")]);
        let lens = RouteLens::new(&exec, &topo);
        let selection = enumerate(&Platform::single_instance(), None, None).unwrap();

        let err = lens.collect(&RouteViewArgs::new(), &selection).unwrap_err();
        let err = err.downcast::<RouteviewError>().unwrap();
        assert!(matches!(err, RouteviewError::MalformedResponse { .. }));
    }
}
