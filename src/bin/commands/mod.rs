pub mod bgp_summary;
pub mod config;
pub mod route;

use anyhow::Result;
use routeview::platform::Topology;
use routeview::query::{executor_for, routing_stack, QueryExecutor};
use routeview::{RouteviewConfig, RouteviewError};

/// Topology and query executor for the local device
pub(crate) struct Device {
    pub topology: Topology,
    pub executor: Box<dyn QueryExecutor>,
}

pub(crate) fn load_device(config: &RouteviewConfig) -> Result<Device> {
    let topology = Topology::load(config.topology_file.as_deref())?;
    let stack = routing_stack(config.routing_stack);
    Ok(Device {
        topology,
        executor: executor_for(stack, config.runner()),
    })
}

/// Print a lens failure and exit; an empty response ends quietly
pub(crate) fn exit_with(err: anyhow::Error) -> ! {
    if RouteviewError::is_empty_response_err(&err) {
        tracing::debug!("{}", err);
        std::process::exit(0);
    }
    eprintln!("ERROR: {}", err);
    std::process::exit(1);
}
