use std::io::{IsTerminal, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

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

/// One reply read from an instrument.
#[derive(Debug, Serialize)]
pub struct ReplyOutput<'a> {
    pub kind: &'static str,
    pub port: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<&'a str>,
    pub reply: &'a str,
    pub timestamp: String,
}

impl<'a> ReplyOutput<'a> {
    pub fn new(port: &'a str, command: Option<&'a str>, reply: &'a str) -> Self {
        Self {
            kind: "reply",
            port,
            command,
            reply,
            timestamp: now_unix_seconds(),
        }
    }
}

/// A parsed field reading.
#[derive(Debug, Serialize)]
pub struct FieldOutput<'a> {
    pub kind: &'static str,
    pub port: &'a str,
    pub field: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<&'a str>,
    pub timestamp: String,
}

impl<'a> FieldOutput<'a> {
    pub fn new(port: &'a str, field: f64, units: Option<&'a str>) -> Self {
        Self {
            kind: "field",
            port,
            field,
            units,
            timestamp: now_unix_seconds(),
        }
    }
}

pub fn print_reply(out: &ReplyOutput<'_>, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(out),
        OutputFormat::Table => {
            let command = out.command.unwrap_or("-");
            print_table(
                vec!["PORT", "COMMAND", "REPLY"],
                vec![vec![out.port.to_string(), command.to_string(), out.reply.to_string()]],
            );
        }
        OutputFormat::Pretty => match out.command {
            Some(command) => println!("port={} command={} reply={}", out.port, command, out.reply),
            None => println!("port={} reply={}", out.port, out.reply),
        },
        OutputFormat::Raw => print_raw_line(out.reply),
    }
}

pub fn print_field(out: &FieldOutput<'_>, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(out),
        OutputFormat::Table => {
            print_table(
                vec!["PORT", "FIELD", "UNITS"],
                vec![vec![
                    out.port.to_string(),
                    out.field.to_string(),
                    out.units.unwrap_or("-").to_string(),
                ]],
            );
        }
        OutputFormat::Pretty => match out.units {
            Some(units) => println!("port={} field={} {}", out.port, out.field, units),
            None => println!("port={} field={}", out.port, out.field),
        },
        OutputFormat::Raw => print_raw_line(&out.field.to_string()),
    }
}

pub fn print_ports(ports: &[String], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(ports),
        OutputFormat::Table => {
            let rows = ports.iter().map(|port| vec![port.clone()]).collect();
            print_table(vec!["PORT"], rows);
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for port in ports {
                println!("{port}");
            }
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn print_table(header: Vec<&str>, rows: Vec<Vec<String>>) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    for row in rows {
        table.add_row(row);
    }
    println!("{table}");
}

fn print_raw_line(text: &str) {
    let mut out = std::io::stdout().lock();
    let _ = writeln!(out, "{text}");
    let _ = out.flush();
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
