//! Read a LakeShore 475 through a Unix socket bridge.
//!
//! Bridge a serial gaussmeter to a socket first, for example:
//!
//! ```text
//! socat UNIX-LISTEN:/tmp/gaussmeter.sock,fork /dev/ttyUSB0,b9600,cs7,parenb,parodd,raw
//! cargo run -p linecomm --example gaussmeter -- /tmp/gaussmeter.sock
//! ```

#[cfg(unix)]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use linecomm::device::{LakeShore475, Magnetometer};
    use linecomm::session::Communicator;
    use linecomm::transport::UnixSocketTransport;

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/tmp/gaussmeter.sock".to_string());

    let transport = UnixSocketTransport::new(&path)?;
    let mut meter = LakeShore475::new(Communicator::new(transport));

    let units = meter.units()?;
    let field = meter.field()?;
    println!("{path}: {field} {units}");
    Ok(())
}

#[cfg(not(unix))]
fn main() {
    eprintln!("this example needs Unix sockets");
}
