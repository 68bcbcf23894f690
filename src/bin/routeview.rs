use clap::{Parser, Subcommand};
use routeview::*;
use tracing::Level;

mod commands;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// configuration file path, by default $HOME/.routeview/routeview.toml is used
    #[clap(short, long)]
    config: Option<String>,

    /// Print debug information
    #[clap(long)]
    debug: bool,

    /// Output format: table (default), markdown, json, json-pretty
    #[clap(short, long, global = true, default_value = "table")]
    format: OutputFormat,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the route table, combined across routing-daemon instances
    Route(commands::route::RouteArgs),

    /// Show the BGP session summary, combined across routing-daemon instances
    BgpSummary(commands::bgp_summary::BgpSummaryCommandArgs),

    /// Show the effective configuration
    Config,
}

fn main() {
    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    }

    let config = match RouteviewConfig::new(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Route(args) => commands::route::run(&config, args, cli.format),
        Commands::BgpSummary(args) => commands::bgp_summary::run(&config, args, cli.format),
        Commands::Config => commands::config::run(&config, cli.format),
    }
}
