use avwire_prims::is_file_exist;
use serde::Serialize;

use crate::cmd::ProbeArgs;
use crate::exit::{access_error, CliResult, FAILURE, SUCCESS};
use crate::output::{new_table, print_json, OutputFormat};

#[derive(Debug, Serialize)]
struct ProbeOutput {
    schema_id: &'static str,
    path: String,
    exists: bool,
}

/// Exit 0 when the path exists, 1 when it is absent, 50 when it cannot be probed.
pub fn run(args: ProbeArgs, format: OutputFormat) -> CliResult<i32> {
    let exists = is_file_exist(&args.path).map_err(|err| access_error("probe failed", err))?;

    let output = ProbeOutput {
        schema_id: "avwire.cli.v1.probe",
        path: args.path.display().to_string(),
        exists,
    };
    print_probe(&output, format);

    Ok(if exists { SUCCESS } else { FAILURE })
}

fn print_probe(output: &ProbeOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(output),
        OutputFormat::Table => {
            let mut table = new_table(vec!["PATH", "EXISTS"]);
            table.add_row(vec![output.path.clone(), output.exists.to_string()]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            let state = if output.exists { "exists" } else { "absent" };
            println!("{}: {state}", output.path);
        }
        OutputFormat::Raw => println!("{}", output.exists),
    }
}
