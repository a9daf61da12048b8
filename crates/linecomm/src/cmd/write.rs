use crate::cmd::{communicator, WriteArgs};
use crate::exit::{transport_error, CliResult, SUCCESS};

pub fn run(args: WriteArgs) -> CliResult<i32> {
    let mut comm = communicator(&args.endpoint)?;
    let mut session = comm
        .session()
        .map_err(|err| transport_error("open failed", err))?;
    session
        .write(&args.message)
        .map_err(|err| transport_error("write failed", err))?;
    session
        .finish()
        .map_err(|err| transport_error("close failed", err))?;
    Ok(SUCCESS)
}
