use avwire_prims::{hex_dump, to_uint32};

use crate::cmd::DumpArgs;
use crate::exit::{io_error, usage_error, CliResult, SUCCESS};

pub fn run(args: DumpArgs) -> CliResult<i32> {
    let limit = args
        .length
        .as_deref()
        .map(to_uint32)
        .transpose()
        .map_err(|err| usage_error("invalid --length", err))?;

    let bytes = std::fs::read(&args.path)
        .map_err(|err| io_error(&format!("cannot read {}", args.path.display()), err))?;
    let end = limit.map_or(bytes.len(), |limit| bytes.len().min(limit as usize));

    print!("{}", hex_dump(&bytes[..end]));
    Ok(SUCCESS)
}
