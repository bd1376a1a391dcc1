//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{ClientSettings, HttpRosterApi, RosterController};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{ChannelView, UiError, UiErrorContext, UiEvent};

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: ClientSettings) {
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
            let api = match HttpRosterApi::from_settings(&settings) {
                Ok(api) => Arc::new(api),
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!(
                            "backend worker startup failure: invalid server url '{}': {err}",
                            settings.server_url
                        ),
                    )));
                    tracing::error!(server_url = %settings.server_url, "invalid server url: {err}");
                    return;
                }
            };
            let view = Arc::new(ChannelView::new(ui_tx.clone()));
            let controller = Arc::new(RosterController::new(api, view, &settings));
            let _ = ui_tx.try_send(UiEvent::Info(format!(
                "Connected to {}",
                settings.server_url
            )));

            let initial = Arc::clone(&controller);
            tokio::spawn(async move {
                initial.load_activities().await;
            });

            // block_on owns this thread; commands run on the runtime workers.
            while let Ok(cmd) = cmd_rx.recv() {
                let controller = Arc::clone(&controller);
                tokio::spawn(async move {
                    run_command(&controller, cmd).await;
                });
            }
            tracing::info!("ui command queue closed; backend worker exiting");
        });
    });
}

async fn run_command(controller: &RosterController, cmd: BackendCommand) {
    match cmd {
        BackendCommand::LoadActivities => {
            controller.load_activities().await;
        }
        BackendCommand::Signup { email, activity } => {
            controller.submit_signup(&email, &activity).await;
        }
        BackendCommand::Unregister { email, activity } => {
            controller.unregister(&email, &activity).await;
        }
    }
}
