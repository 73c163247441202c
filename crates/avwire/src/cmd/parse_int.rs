use avwire_prims::{to_int8, to_uint32, to_uint8};
use serde::Serialize;

use crate::cmd::{IntWidth, ParseIntArgs};
use crate::exit::{usage_error, CliResult, SUCCESS};
use crate::output::{new_table, print_json, OutputFormat};

#[derive(Debug, Serialize)]
struct ParseIntOutput<'a> {
    schema_id: &'static str,
    input: &'a str,
    width: &'static str,
    value: i64,
}

pub fn run(args: ParseIntArgs, format: OutputFormat) -> CliResult<i32> {
    let value = parse(&args.value, args.width)
        .map_err(|err| usage_error(&format!("cannot parse {:?}", args.value), err))?;

    let output = ParseIntOutput {
        schema_id: "avwire.cli.v1.parse-int",
        input: &args.value,
        width: width_name(args.width),
        value,
    };

    match format {
        OutputFormat::Json => print_json(&output),
        OutputFormat::Table => {
            let mut table = new_table(vec!["INPUT", "WIDTH", "VALUE"]);
            table.add_row(vec![
                output.input.to_string(),
                output.width.to_string(),
                output.value.to_string(),
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!("{} as {} = {}", output.input, output.width, output.value),
        OutputFormat::Raw => println!("{}", output.value),
    }

    Ok(SUCCESS)
}

fn parse(text: &str, width: IntWidth) -> avwire_prims::Result<i64> {
    Ok(match width {
        IntWidth::I8 => i64::from(to_int8(text)?),
        IntWidth::U8 => i64::from(to_uint8(text)?),
        IntWidth::U32 => i64::from(to_uint32(text)?),
    })
}

fn width_name(width: IntWidth) -> &'static str {
    match width {
        IntWidth::I8 => "i8",
        IntWidth::U8 => "u8",
        IntWidth::U32 => "u32",
    }
}
