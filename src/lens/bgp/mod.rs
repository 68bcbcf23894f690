//! BGP summary lens
//!
//! Queries the BGP summary of every selected instance and folds the
//! responses into one summary: router-level counters are summed, router
//! identities are kept per instance, and peers are listed with their
//! configured neighbor names.

pub mod args;
pub mod neighbor;
pub mod summary;
pub mod types;

pub use args::BgpSummaryArgs;
pub use neighbor::{NeighborNameTable, NEIGHBOR_NAME_UNKNOWN};
pub use summary::{render_text, BgpSummaryAggregator};
pub use types::{BgpPeer, BgpSummary, RouterInfo};

use crate::error::RouteviewError;
use crate::lens::utils::OutputFormat;
use crate::platform::{NamespaceSelection, Topology};
use crate::query::{query_instances, AddressFamily, QueryExecutor};
use anyhow::Result;
use serde_json::Value;
use tracing::debug;

/// BGP summary lens over a query executor and the device topology
pub struct BgpSummaryLens<'a> {
    executor: &'a dyn QueryExecutor,
    topology: &'a Topology,
}

impl<'a> BgpSummaryLens<'a> {
    pub fn new(executor: &'a dyn QueryExecutor, topology: &'a Topology) -> Self {
        Self { executor, topology }
    }

    /// Query every selected instance and aggregate the responses
    ///
    /// Sessions to other ASICs of the same device are hidden when back-end
    /// filtering is on.
    pub fn collect(
        &self,
        args: &BgpSummaryArgs,
        selection: &NamespaceSelection,
    ) -> Result<BgpSummary> {
        let responses = query_instances(self.executor, &args.command(), &selection.instances)?;

        let names = self.topology.neighbor_names();
        if names.is_empty() {
            debug!("no neighbor names configured, peers report {}", NEIGHBOR_NAME_UNKNOWN);
        }
        let internal = self.topology.internal_neighbors();
        let hide_internal = selection.filter_backend;
        let mut aggregator = BgpSummaryAggregator::new(args.family(), &names, |ip| {
            !(hide_internal && internal.contains(ip))
        });

        for response in &responses {
            let value: Value = serde_json::from_str(&response.text).map_err(|e| {
                RouteviewError::MalformedResponse {
                    instance: response.instance.clone(),
                    reason: e.to_string(),
                }
            })?;
            aggregator.add_instance(&response.instance, &value)?;
        }

        Ok(aggregator.finish())
    }

    pub fn format(
        &self,
        summary: &BgpSummary,
        family: AddressFamily,
        format: OutputFormat,
    ) -> Result<String> {
        match format {
            OutputFormat::Table => Ok(render_text(summary, family, false)),
            OutputFormat::Markdown => Ok(render_text(summary, family, true)),
            OutputFormat::Json => Ok(serde_json::to_string(summary)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(summary)?),
        }
    }

    pub fn show(
        &self,
        args: &BgpSummaryArgs,
        selection: &NamespaceSelection,
        format: OutputFormat,
    ) -> Result<String> {
        let summary = self.collect(args, selection)?;
        self.format(&summary, args.family(), format)
    }
}
