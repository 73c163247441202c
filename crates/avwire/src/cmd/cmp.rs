use std::path::Path;

use avwire_prims::{cmp_bytes, to_uint32};
use serde::Serialize;

use crate::cmd::CmpArgs;
use crate::exit::{io_error, usage_error, CliResult, FAILURE, SUCCESS};
use crate::output::{print_json, OutputFormat};

#[derive(Debug, Serialize)]
struct CmpOutput {
    schema_id: &'static str,
    length: u32,
    equal: bool,
}

/// Exit 0 when the first `length` bytes match, 1 otherwise.
pub fn run(args: CmpArgs, format: OutputFormat) -> CliResult<i32> {
    let length = to_uint32(&args.length).map_err(|err| usage_error("invalid --length", err))?;
    let target = read(&args.target)?;
    let current = read(&args.current)?;

    let equal = cmp_bytes(&target, &current, length as usize);
    tracing::debug!(length, equal, "compared leading bytes");

    let output = CmpOutput {
        schema_id: "avwire.cli.v1.cmp",
        length,
        equal,
    };
    match format {
        OutputFormat::Json => print_json(&output),
        OutputFormat::Table | OutputFormat::Pretty => {
            let verdict = if equal { "match" } else { "differ" };
            println!("first {length} bytes {verdict}");
        }
        OutputFormat::Raw => println!("{equal}"),
    }

    Ok(if equal { SUCCESS } else { FAILURE })
}

fn read(path: &Path) -> CliResult<Vec<u8>> {
    std::fs::read(path).map_err(|err| io_error(&format!("cannot read {}", path.display()), err))
}
