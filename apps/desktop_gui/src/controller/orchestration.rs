//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued ui->backend command"),
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
            tracing::debug!(command = cmd_name, "ui->backend queue full");
        }
        Err(TrySendError::Disconnected(_)) => {
            *status =
                "Backend worker disconnected (possible startup failure); relaunch the app"
                    .to_string();
            tracing::debug!(command = cmd_name, "ui->backend queue disconnected");
        }
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::bounded;

    use super::*;

    #[test]
    fn queued_command_leaves_status_untouched() {
        let (tx, rx) = bounded(1);
        let mut status = String::new();
        dispatch_backend_command(&tx, BackendCommand::Submit, &mut status);
        assert!(status.is_empty());
        assert_eq!(rx.try_recv().ok(), Some(BackendCommand::Submit));
    }

    #[test]
    fn full_and_closed_queues_report_status() {
        let (tx, rx) = bounded(1);
        let mut status = String::new();
        dispatch_backend_command(&tx, BackendCommand::Reload, &mut status);
        dispatch_backend_command(&tx, BackendCommand::Reload, &mut status);
        assert!(status.contains("full"));

        drop(rx);
        dispatch_backend_command(&tx, BackendCommand::Cancel, &mut status);
        assert!(status.contains("disconnected"));
    }
}
