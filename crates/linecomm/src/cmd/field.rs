use linecomm_device::{LakeShore475, Magnetometer};

use crate::cmd::{communicator, FieldArgs};
use crate::exit::{device_error, CliResult, SUCCESS};
use crate::output::{print_field, FieldOutput, OutputFormat};

pub fn run(args: FieldArgs, format: OutputFormat) -> CliResult<i32> {
    let comm = communicator(&args.endpoint)?;
    let mut meter = LakeShore475::new(comm);

    let field = meter
        .field()
        .map_err(|err| device_error("field reading failed", err))?;

    print_field(
        &FieldOutput::new(meter.get_ref().port(), field, None),
        format,
    );
    Ok(SUCCESS)
}
