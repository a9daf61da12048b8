mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "linecomm",
    version,
    about = "Talk to terminator-framed serial instruments"
)]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "warn",
        env = "LINECOMM_LOG_LEVEL",
        global = true
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linecomm_transport::{DataBits, Parity};

    #[test]
    fn parses_query_subcommand() {
        let cli = Cli::try_parse_from(["linecomm", "query", "/dev/ttyUSB0", "RDGFIELD?"])
            .expect("query args should parse");

        match cli.command {
            Command::Query(args) => {
                assert_eq!(args.endpoint.port, "/dev/ttyUSB0");
                assert_eq!(args.message, "RDGFIELD?");
                assert_eq!(args.endpoint.baud, 9600);
                assert_eq!(args.endpoint.data_bits, DataBits::Seven);
                assert_eq!(args.endpoint.parity, Parity::Odd);
                assert_eq!(args.endpoint.terminator, "\\r\\n");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_serial_overrides() {
        let cli = Cli::try_parse_from([
            "linecomm",
            "query",
            "COM3",
            "*IDN?",
            "--baud",
            "115200",
            "--data-bits",
            "8",
            "--parity",
            "none",
            "--timeout",
            "500ms",
        ])
        .expect("serial overrides should parse");

        let Command::Query(args) = cli.command else {
            panic!("expected query");
        };
        assert_eq!(args.endpoint.baud, 115200);
        assert_eq!(args.endpoint.data_bits, DataBits::Eight);
        assert_eq!(args.endpoint.parity, Parity::None);
        assert_eq!(args.endpoint.timeout, "500ms");
    }

    #[test]
    fn rejects_unknown_parity() {
        let err = Cli::try_parse_from(["linecomm", "field", "COM3", "--parity", "mark"])
            .expect_err("unknown parity should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn query_requires_message() {
        let err = Cli::try_parse_from(["linecomm", "query", "COM3"])
            .expect_err("missing message should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn parses_units_with_optional_unit() {
        let cli = Cli::try_parse_from(["linecomm", "units", "--socket", "/tmp/g.sock", "T"])
            .expect("units args should parse");
        let Command::Units(args) = cli.command else {
            panic!("expected units");
        };
        assert!(args.endpoint.socket);
        assert_eq!(args.unit.as_deref(), Some("T"));
    }

    #[test]
    fn parses_listen_count_and_global_format() {
        let cli = Cli::try_parse_from([
            "linecomm",
            "listen",
            "/dev/ttyS0",
            "--count",
            "3",
            "--format",
            "raw",
        ])
        .expect("listen args should parse");
        assert_eq!(cli.format, Some(OutputFormat::Raw));
        let Command::Listen(args) = cli.command else {
            panic!("expected listen");
        };
        assert_eq!(args.count, Some(3));
    }
}
