use crate::cmd::{communicator, QueryArgs};
use crate::exit::{comm_error, CliResult, SUCCESS};
use crate::output::{print_reply, OutputFormat, ReplyOutput};

pub fn run(args: QueryArgs, format: OutputFormat) -> CliResult<i32> {
    let mut comm = communicator(&args.endpoint)?;
    let reply = comm
        .query(&args.message)
        .map_err(|err| comm_error("query failed", err))?;

    print_reply(
        &ReplyOutput::new(comm.port(), Some(&args.message), &reply),
        format,
    );
    Ok(SUCCESS)
}
