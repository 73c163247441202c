use std::fmt::Write as _;
use std::io::{IsTerminal, Write};

use avwire_frame::{Body, Message, RawBody};
use avwire_payload::AntivirusBody;
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use serde_json::Value;

pub const MESSAGE_SCHEMA_ID: &str = "avwire.cli.v1.message";

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// Body kinds the CLI knows how to render.
pub trait RenderBody: Body {
    fn to_json(&self) -> Value;
}

impl RenderBody for AntivirusBody {
    fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl RenderBody for RawBody {
    fn to_json(&self) -> Value {
        Value::String(hex(&self.0))
    }
}

#[derive(Debug, Serialize)]
pub struct MessageView {
    schema_id: &'static str,
    method: String,
    uuid: String,
    status: i8,
    status_class: &'static str,
    timestamp: i64,
    body_size: usize,
    body: Option<Value>,
    #[serde(skip)]
    body_bytes: Vec<u8>,
}

impl MessageView {
    pub fn new<B: RenderBody>(message: &Message<B>) -> Self {
        let body_bytes = message
            .body()
            .map(|body| body.to_bytes().to_vec())
            .unwrap_or_default();
        Self {
            schema_id: MESSAGE_SCHEMA_ID,
            method: message.method().to_string(),
            uuid: message.uuid().to_string(),
            status: message.status(),
            status_class: message.status_class().as_str(),
            timestamp: message.timestamp(),
            body_size: body_bytes.len(),
            body: message.body().map(RenderBody::to_json),
            body_bytes,
        }
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    fn body_summary(&self) -> String {
        match &self.body {
            None => "-".to_string(),
            Some(value) => value.to_string(),
        }
    }
}

pub fn print_messages(views: &[MessageView], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            for view in views {
                print_json(view);
            }
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["METHOD", "UUID", "STATUS", "TIMESTAMP", "BODY"]);
            for view in views {
                table.add_row(vec![
                    view.method.clone(),
                    view.uuid.clone(),
                    format!("{} ({})", view.status, view.status_class),
                    view.timestamp.to_string(),
                    view.body_summary(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for view in views {
                println!(
                    "method={} uuid={} status={} ({}) timestamp={} size={} body={}",
                    view.method,
                    view.uuid,
                    view.status,
                    view.status_class,
                    view.timestamp,
                    view.body_size,
                    view.body_summary()
                );
            }
        }
        OutputFormat::Raw => {
            for view in views {
                print_raw(&view.body_bytes);
            }
        }
    }
}

pub fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

pub fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn hex(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, byte| {
        let _ = write!(out, "{byte:02x}");
        out
    })
}
