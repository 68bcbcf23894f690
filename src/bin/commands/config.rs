use routeview::lens::utils::OutputFormat;
use routeview::RouteviewConfig;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ConfigInfo<'a> {
    config_file: String,
    topology_file: Option<&'a str>,
    vtysh_path: &'a str,
    routing_stack: Option<String>,
    use_sudo: bool,
}

pub fn run(config: &RouteviewConfig, output_format: OutputFormat) {
    let info = ConfigInfo {
        config_file: RouteviewConfig::config_file_path(),
        topology_file: config.topology_file.as_deref(),
        vtysh_path: &config.vtysh_path,
        routing_stack: config.routing_stack.map(|s| s.to_string()),
        use_sudo: config.use_sudo,
    };

    match output_format {
        OutputFormat::Json => match serde_json::to_string(&info) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("ERROR: Failed to serialize configuration: {}", e),
        },
        OutputFormat::JsonPretty => match serde_json::to_string_pretty(&info) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("ERROR: Failed to serialize configuration: {}", e),
        },
        OutputFormat::Table | OutputFormat::Markdown => {
            println!("Config File:        {}", info.config_file);
            println!("{}", config.summary());
        }
    }
}
