use clap::Args;
use routeview::lens::bgp::{BgpSummaryArgs, BgpSummaryLens};
use routeview::lens::utils::OutputFormat;
use routeview::platform::enumerate;
use routeview::RouteviewConfig;

use super::{exit_with, load_device};

/// Arguments for the BgpSummary command
#[derive(Args)]
pub struct BgpSummaryCommandArgs {
    #[clap(flatten)]
    pub summary: BgpSummaryArgs,
}

pub fn run(config: &RouteviewConfig, args: BgpSummaryCommandArgs, output_format: OutputFormat) {
    let BgpSummaryCommandArgs { summary } = args;

    let device = match load_device(config) {
        Ok(d) => d,
        Err(e) => exit_with(e),
    };

    let selection = match enumerate(
        &device.topology.platform(),
        summary.display.as_deref(),
        summary.namespace.as_deref(),
    ) {
        Ok(s) => s,
        Err(e) => exit_with(e.into()),
    };

    let lens = BgpSummaryLens::new(device.executor.as_ref(), &device.topology);
    match lens.show(&summary, &selection, output_format) {
        Ok(out) if output_format.is_json() => println!("{}", out),
        Ok(out) => print!("{}", out),
        Err(e) => exit_with(e),
    }
}
