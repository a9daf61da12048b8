use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use linecomm_frame::FrameError;
use linecomm_session::Communicator;
use linecomm_transport::Transport;
use tracing::{debug, info};

use crate::cmd::{communicator, ListenArgs};
use crate::exit::{frame_error, transport_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_reply, OutputFormat, ReplyOutput};

pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    let mut comm = communicator(&args.endpoint)?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut session = comm
        .session()
        .map_err(|err| transport_error("open failed", err))?;
    let mut printed = 0usize;

    loop {
        let message = match next_message(&mut *session, &running) {
            Ok(Some(message)) => message,
            Ok(None) => break,
            Err(err) => return Err(frame_error("receive failed", err)),
        };

        print_reply(&ReplyOutput::new(session.port(), None, &message), format);
        printed = printed.saturating_add(1);

        if let Some(count) = args.count {
            if printed >= count {
                break;
            }
        }
    }

    debug!(printed, "listen finished");
    session
        .finish()
        .map_err(|err| transport_error("close failed", err))?;
    Ok(SUCCESS)
}

/// Wait for the next complete message.
///
/// Read timeouts only poll the stop flag: a message interrupted by a quiet
/// gap keeps its characters and is finished once the rest arrives. Returns
/// `None` when stopped or when the stream ends between messages.
fn next_message<T: Transport>(
    comm: &mut Communicator<T>,
    running: &AtomicBool,
) -> Result<Option<String>, FrameError> {
    let port = comm.port().to_string();
    let mut chars = comm.message();
    let mut body = String::new();

    while running.load(Ordering::SeqCst) {
        match chars.next() {
            Some(Ok(c)) => body.push(c),
            Some(Err(err)) if err.is_timeout() => {
                if chars.has_started() {
                    debug!(port = %port, partial = %body, "quiet gap inside message");
                }
            }
            Some(Err(FrameError::Incomplete { ref received })) if received.is_empty() => {
                info!(port = %port, "instrument closed the connection");
                return Ok(None);
            }
            Some(Err(err)) => return Err(err),
            None => return Ok(Some(body)),
        }
    }
    Ok(None)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
