use avwire_frame::{decode_message, encode_message, generate_message, Body, Message, RawBody};
use avwire_payload::{
    antivirus_table, method, AntivirusBody, ErrorDetail, ProtectionStatus, ScanRequest,
};
use avwire_prims::{hex_dump, to_int8};
use bytes::BytesMut;

use crate::cmd::{EncodeArgs, Toggle};
use crate::exit::{frame_error, io_error, payload_error, usage_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::print_raw;

pub fn run(args: EncodeArgs) -> CliResult<i32> {
    let status = to_int8(&args.status).map_err(|err| usage_error("invalid --status", err))?;
    let uuid = args.uuid.as_deref();

    let frame = match args.data.as_deref() {
        Some(hex) => {
            let body = RawBody::from(parse_hex(hex)?);
            encode(&args.method, uuid, status, Some(body))?
        }
        None => {
            if !method::is_known(&args.method) {
                tracing::warn!(method = %args.method, "method is not part of the antivirus protocol");
            }
            let frame = encode(&args.method, uuid, status, typed_body(&args)?)?;
            if let Err(err) = decode_message(&frame, &antivirus_table()) {
                tracing::warn!(error = %err, "frame will be rejected by an antivirus peer");
            }
            frame
        }
    };

    if let Some(path) = &args.out {
        std::fs::write(path, &frame)
            .map_err(|err| io_error(&format!("cannot write {}", path.display()), err))?;
    } else if args.hex {
        print!("{}", hex_dump(&frame));
    } else {
        print_raw(&frame);
    }

    Ok(SUCCESS)
}

fn typed_body(args: &EncodeArgs) -> CliResult<Option<AntivirusBody>> {
    if let Some(state) = args.protection {
        return Ok(Some(ProtectionStatus::new(state == Toggle::On).into()));
    }

    if let Some(path) = &args.scan {
        let request = if args.check_exists {
            ScanRequest::for_existing(path)
        } else {
            ScanRequest::new(path.as_str())
        };
        return request
            .map(|request| Some(request.into()))
            .map_err(|err| payload_error("invalid scan body", err));
    }

    if let (Some(code), Some(text)) = (args.error_code, &args.error_text) {
        return ErrorDetail::new(code, text.as_str())
            .map(|detail| Some(detail.into()))
            .map_err(|err| payload_error("invalid error body", err));
    }

    Ok(None)
}

fn encode<B: Body>(
    method: &str,
    uuid: Option<&str>,
    status: i8,
    body: Option<B>,
) -> CliResult<BytesMut> {
    let message = match uuid {
        Some(uuid) => generate_message(method, uuid, status, body),
        None => Message::request(method, status, body),
    }
    .map_err(|err| frame_error("invalid message", err))?;

    let mut frame = BytesMut::new();
    encode_message(&message, &mut frame).map_err(|err| frame_error("encode failed", err))?;

    tracing::info!(
        method,
        uuid = %message.uuid(),
        status,
        frame_len = frame.len(),
        "encoded message"
    );
    Ok(frame)
}

/// Parse hex text, ignoring whitespace between digits.
fn parse_hex(text: &str) -> CliResult<Vec<u8>> {
    let digits: Vec<u8> = text
        .bytes()
        .filter(|byte| !byte.is_ascii_whitespace())
        .collect();
    if digits.len() % 2 != 0 {
        return Err(CliError::new(USAGE, "invalid --data: odd number of hex digits"));
    }

    digits
        .chunks(2)
        .map(|pair| {
            let high = hex_value(pair[0]);
            let low = hex_value(pair[1]);
            match (high, low) {
                (Some(high), Some(low)) => Ok((high << 4) | low),
                _ => Err(CliError::new(
                    USAGE,
                    format!(
                        "invalid --data: {:?} is not a hex byte",
                        String::from_utf8_lossy(pair)
                    ),
                )),
            }
        })
        .collect()
}

fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}
