use serde::Serialize;

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_json, OutputFormat};

#[derive(Debug, Serialize)]
struct VersionOutput {
    schema_id: &'static str,
    name: &'static str,
    version: &'static str,
    target: String,
    profile: &'static str,
    features: Vec<&'static str>,
}

pub fn run(args: VersionArgs, format: OutputFormat) -> CliResult<i32> {
    if !args.extended {
        println!("avwire {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    let output = VersionOutput {
        schema_id: "avwire.cli.v1.version",
        name: "avwire",
        version: env!("CARGO_PKG_VERSION"),
        target: target_triple(),
        profile: option_env!("AVWIRE_BUILD_PROFILE").unwrap_or("unknown"),
        features: active_features(),
    };

    match format {
        OutputFormat::Json => print_json(&output),
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("name: {}", output.name);
            println!("version: {}", output.version);
            println!("target: {}", output.target);
            println!("profile: {}", output.profile);
            println!("features: {}", output.features.join(", "));
        }
        OutputFormat::Raw => println!("{}", output.version),
    }

    Ok(SUCCESS)
}

fn target_triple() -> String {
    match option_env!("AVWIRE_BUILD_TARGET") {
        Some(target) => target.to_string(),
        None => format!(
            "{}-unknown-{}",
            std::env::consts::ARCH,
            std::env::consts::OS
        ),
    }
}

fn active_features() -> Vec<&'static str> {
    let mut features = Vec::new();
    if cfg!(feature = "payload") {
        features.push("payload");
    }
    if cfg!(feature = "async") {
        features.push("async");
    }
    features.push("cli");
    features
}
