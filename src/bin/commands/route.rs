use clap::Args;
use routeview::lens::route::{RouteLens, RouteViewArgs};
use routeview::lens::utils::OutputFormat;
use routeview::platform::enumerate;
use routeview::RouteviewConfig;

use super::{exit_with, load_device};

/// Arguments for the Route command
#[derive(Args)]
pub struct RouteArgs {
    #[clap(flatten)]
    pub view: RouteViewArgs,
}

pub fn run(config: &RouteviewConfig, args: RouteArgs, output_format: OutputFormat) {
    let RouteArgs { view } = args;

    let device = match load_device(config) {
        Ok(d) => d,
        Err(e) => exit_with(e),
    };

    let selection = match enumerate(
        &device.topology.platform(),
        view.display.as_deref(),
        view.namespace.as_deref(),
    ) {
        Ok(s) => s,
        Err(e) => exit_with(e.into()),
    };

    let lens = RouteLens::new(device.executor.as_ref(), &device.topology);
    match lens.show(&view, &selection, output_format) {
        Ok(out) if output_format.is_json() => println!("{}", out),
        Ok(out) => print!("{}", out),
        Err(e) => exit_with(e),
    }
}
