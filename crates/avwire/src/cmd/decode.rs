use std::io::Read;
use std::path::Path;

use avwire_frame::{decode_frame, BodyTable, FrameError, RawTable, DEFAULT_MAX_BODY, MAX_METHOD_LEN};
use avwire_payload::{antivirus_table, reject_frame};
use avwire_prims::to_uint32;
use bytes::BytesMut;

use crate::cmd::DecodeArgs;
use crate::exit::{io_error, payload_error, usage_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_messages, MessageView, OutputFormat, RenderBody};

// Method length byte, longest method, uuid.
const UUID_PREFIX_LEN: usize = 1 + MAX_METHOD_LEN + 16;

#[derive(Debug, Default)]
struct Decoded {
    views: Vec<MessageView>,
    frames: usize,
    rejected: Vec<String>,
    trailing: usize,
}

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let max_body = match args.max_body.as_deref() {
        Some(text) => {
            let limit = to_uint32(text).map_err(|err| usage_error("invalid --max-body", err))?;
            limit as usize
        }
        None => DEFAULT_MAX_BODY,
    };

    let input = read_input(args.input.as_deref())?;
    let decoded = if args.raw_bodies {
        decode_all(&input, &RawTable, max_body, args.reply)?
    } else {
        decode_all(&input, &antivirus_table(), max_body, args.reply)?
    };

    if decoded.views.is_empty() {
        tracing::info!(bytes = input.len(), "no messages decoded");
    } else {
        print_messages(&decoded.views, format);
    }

    if decoded.trailing > 0 {
        return Err(CliError::new(
            DATA_INVALID,
            format!("input ends with a partial frame ({} bytes)", decoded.trailing),
        ));
    }

    match decoded.rejected.first() {
        None => Ok(SUCCESS),
        Some(first) => Err(CliError::new(
            DATA_INVALID,
            format!(
                "{} of {} frames rejected; first: {first}",
                decoded.rejected.len(),
                decoded.frames
            ),
        )),
    }
}

fn read_input(path: Option<&Path>) -> CliResult<Vec<u8>> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read(path)
            .map_err(|err| io_error(&format!("cannot read {}", path.display()), err)),
        _ => {
            let mut input = Vec::new();
            std::io::stdin()
                .read_to_end(&mut input)
                .map_err(|err| io_error("cannot read stdin", err))?;
            Ok(input)
        }
    }
}

fn decode_all<D>(input: &[u8], table: &D, max_body: usize, reply: bool) -> CliResult<Decoded>
where
    D: BodyTable,
    D::Body: RenderBody,
{
    let mut buf = BytesMut::from(input);
    let mut decoded = Decoded::default();

    while !buf.is_empty() {
        let pending = buf.len();
        let head = buf[..pending.min(UUID_PREFIX_LEN)].to_vec();

        match decode_frame(&mut buf, table, max_body) {
            Ok(Some(message)) => {
                decoded.frames += 1;
                decoded.views.push(MessageView::new(&message));
            }
            Ok(None) => {
                decoded.trailing = buf.len();
                break;
            }
            Err(err) => {
                decoded.frames += 1;
                decoded.rejected.push(err.to_string());
                if reply {
                    push_reply(&mut decoded, &head, &err)?;
                }
                if buf.len() == pending {
                    // Header unreadable: the next frame boundary is unknown.
                    tracing::warn!(skipped = pending, "abandoning rest of input");
                    break;
                }
            }
        }
    }

    Ok(decoded)
}

fn push_reply(decoded: &mut Decoded, head: &[u8], err: &FrameError) -> CliResult<()> {
    let reply = reject_frame(head, err).map_err(|err| payload_error("cannot build reply", err))?;
    match reply {
        Some(reply) => {
            let view = MessageView::new(&reply);
            tracing::info!(uuid = view.uuid(), error = %err, "built error reply");
            decoded.views.push(view);
        }
        None => tracing::warn!(error = %err, "no uuid to address a reply to"),
    }
    Ok(())
}
