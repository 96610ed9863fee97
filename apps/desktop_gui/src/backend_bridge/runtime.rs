//! Runtime bridge between UI command queue and the worker owning the form controller.

use std::{sync::Arc, thread};

use anyhow::Context;
use client_core::{config::Settings, CustomerFormController, HttpListRepository};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: Settings) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let mut controller = match build_controller(&settings) {
                Ok(controller) => controller,
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("backend worker startup failure: {err:#}"),
                    )));
                    tracing::error!("failed to build customer form controller: {err:#}");
                    return;
                }
            };

            let _ = ui_tx.try_send(UiEvent::Attached(controller.subscribe()));
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                run_command(&mut controller, cmd).await;
            }
            tracing::info!("ui command queue closed; backend worker exiting");
        });
    });
}

fn build_controller(settings: &Settings) -> anyhow::Result<CustomerFormController> {
    let repository = HttpListRepository::with_timeout(
        &settings.site_url,
        &settings.list_name,
        &settings.host_context(),
        settings.request_timeout(),
    )
    .with_context(|| format!("could not bind customer list '{}'", settings.list_name))?;
    Ok(CustomerFormController::new(Arc::new(repository)))
}

/// Failures surface through the controller's published notice, so they are
/// only logged here.
async fn run_command(controller: &mut CustomerFormController, cmd: BackendCommand) {
    match cmd {
        BackendCommand::Reload => {
            if let Err(err) = controller.load().await {
                tracing::debug!("reload failed: {err}");
            }
        }
        BackendCommand::SelectCustomer { id } => {
            if !controller.select_existing(id) {
                tracing::debug!(customer_id = id.0, "selected customer is no longer listed");
            }
        }
        BackendCommand::Edit(edit) => controller.apply_edit(edit),
        BackendCommand::Submit => match controller.submit().await {
            Ok(outcome) => tracing::info!(?outcome, "customer saved"),
            Err(err) => tracing::debug!("submit rejected: {err}"),
        },
        BackendCommand::ResetDraft => controller.reset_draft(),
        BackendCommand::ToggleMode => controller.toggle_mode(),
        BackendCommand::Cancel => controller.cancel(),
        BackendCommand::DismissNotice { raised_at } => {
            controller.dismiss_notice_if(raised_at);
        }
    }
}
