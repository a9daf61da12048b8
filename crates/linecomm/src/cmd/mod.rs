use std::time::Duration;

use clap::{Args, Subcommand};
use linecomm_frame::Terminator;
use linecomm_session::{CommConfig, Communicator};
use linecomm_transport::{DataBits, Parity, SerialConfig, SerialTransport, StopBits, Transport};

use crate::exit::{CliError, CliResult};
use crate::output::OutputFormat;

pub mod field;
pub mod listen;
pub mod ports;
pub mod query;
pub mod units;
pub mod version;
pub mod write;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send a message and print the reply.
    Query(QueryArgs),
    /// Send a message without waiting for a reply.
    Write(WriteArgs),
    /// Keep the port open and print every message received.
    Listen(ListenArgs),
    /// Read the field from a LakeShore 475 gaussmeter.
    Field(FieldArgs),
    /// Read or set the field units of a LakeShore 475 gaussmeter.
    Units(UnitsArgs),
    /// List serial ports visible to the system.
    Ports,
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Query(args) => query::run(args, format),
        Command::Write(args) => write::run(args),
        Command::Listen(args) => listen::run(args, format),
        Command::Field(args) => field::run(args, format),
        Command::Units(args) => units::run(args, format),
        Command::Ports => ports::run(format),
        Command::Version(args) => version::run(args),
    }
}

/// Where the instrument lives and how to talk to it.
#[derive(Args, Debug, Clone)]
pub struct EndpointArgs {
    /// Serial device (e.g. /dev/ttyUSB0, COM3), or a socket path with --socket.
    pub port: String,
    /// Treat PORT as a Unix socket path instead of a serial device.
    #[arg(long)]
    pub socket: bool,
    /// Message terminator; accepts \r, \n, \t, \\, \0 and \xNN escapes.
    #[arg(long, default_value = "\\r\\n")]
    pub terminator: String,
    /// Serial baud rate.
    #[arg(long, default_value_t = 9600)]
    pub baud: u32,
    /// Serial data bits (5-8).
    #[arg(long, default_value = "7")]
    pub data_bits: DataBits,
    /// Serial stop bits (1, 1.5 or 2).
    #[arg(long, default_value = "1")]
    pub stop_bits: StopBits,
    /// Serial parity (none, odd, even).
    #[arg(long, default_value = "odd")]
    pub parity: Parity,
    /// Read/write timeout (e.g. 3s, 500ms).
    #[arg(long, default_value = "3s")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    #[command(flatten)]
    pub endpoint: EndpointArgs,
    /// Message to send, without terminator.
    pub message: String,
}

#[derive(Args, Debug)]
pub struct WriteArgs {
    #[command(flatten)]
    pub endpoint: EndpointArgs,
    /// Message to send, without terminator.
    pub message: String,
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    #[command(flatten)]
    pub endpoint: EndpointArgs,
    /// Exit after receiving N messages.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct FieldArgs {
    #[command(flatten)]
    pub endpoint: EndpointArgs,
}

#[derive(Args, Debug)]
pub struct UnitsArgs {
    #[command(flatten)]
    pub endpoint: EndpointArgs,
    /// New units to select; omit to read the current units.
    pub unit: Option<String>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Build a communicator for the endpoint. The port is not opened here.
pub fn communicator(args: &EndpointArgs) -> CliResult<Communicator<Box<dyn Transport>>> {
    let terminator = Terminator::parse_escaped(&args.terminator)
        .map_err(|err| CliError::usage(format!("invalid --terminator: {err}")))?;
    let timeout = parse_duration(&args.timeout)?;

    let transport = if args.socket {
        socket_transport(&args.port, timeout)?
    } else {
        let config = SerialConfig {
            baud_rate: args.baud,
            data_bits: args.data_bits,
            stop_bits: args.stop_bits,
            parity: args.parity,
            timeout,
        };
        Box::new(SerialTransport::new(&args.port, config)) as Box<dyn Transport>
    };

    Ok(Communicator::with_config(transport, CommConfig { terminator }))
}

#[cfg(unix)]
fn socket_transport(path: &str, timeout: Duration) -> CliResult<Box<dyn Transport>> {
    use linecomm_transport::{SocketConfig, UnixSocketTransport};

    let config = SocketConfig {
        read_timeout: Some(timeout),
        write_timeout: Some(timeout),
    };
    let transport = UnixSocketTransport::with_config(path, config)
        .map_err(|err| crate::exit::transport_error("invalid socket path", err))?;
    Ok(Box::new(transport))
}

#[cfg(not(unix))]
fn socket_transport(_path: &str, _timeout: Duration) -> CliResult<Box<dyn Transport>> {
    Err(CliError::usage("--socket is only supported on Unix platforms"))
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::usage("duration must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .trim()
        .parse()
        .map_err(|_| CliError::usage(format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::usage("duration must be greater than zero"));
    }

    if millis {
        Ok(Duration::from_millis(value))
    } else {
        Ok(Duration::from_secs(value))
    }
}
