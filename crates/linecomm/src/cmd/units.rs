use linecomm_device::{LakeShore475, Magnetometer};

use crate::cmd::{communicator, UnitsArgs};
use crate::exit::{device_error, CliResult, SUCCESS};
use crate::output::{print_reply, OutputFormat, ReplyOutput};

pub fn run(args: UnitsArgs, format: OutputFormat) -> CliResult<i32> {
    let comm = communicator(&args.endpoint)?;
    let mut meter = LakeShore475::new(comm);

    if let Some(unit) = &args.unit {
        meter
            .set_units(unit)
            .map_err(|err| device_error("setting units failed", err))?;
    }

    // Read back so a set reports what the instrument actually selected.
    let units = meter
        .units()
        .map_err(|err| device_error("reading units failed", err))?;

    print_reply(
        &ReplyOutput::new(meter.get_ref().port(), Some("UNITS?"), &units),
        format,
    );
    Ok(SUCCESS)
}
