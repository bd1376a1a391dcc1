//! UI/backend events and the view that turns controller calls into them.

use client_core::{RosterView, StatusMessage};
use crossbeam_channel::{Sender, TrySendError};
use shared::domain::ActivityCatalog;

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Info(String),
    Error(UiError),
    CatalogLoaded(ActivityCatalog),
    LoadFailed(String),
    ParticipantRemoved { activity: String, email: String },
    NoParticipants { activity: String },
    Status(StatusMessage),
    StatusHidden,
    FormReset,
    Alert(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        Self {
            context,
            message: message.into(),
        }
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// [`RosterView`] that forwards every surface update to the egui thread.
pub struct ChannelView {
    ui_tx: Sender<UiEvent>,
}

impl ChannelView {
    pub fn new(ui_tx: Sender<UiEvent>) -> Self {
        Self { ui_tx }
    }

    fn send(&self, event: UiEvent) {
        match self.ui_tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => tracing::warn!("ui event queue is full; dropping update"),
            Err(TrySendError::Disconnected(_)) => {
                tracing::debug!("ui event queue closed; dropping update")
            }
        }
    }
}

impl RosterView for ChannelView {
    fn show_catalog(&self, catalog: &ActivityCatalog) {
        self.send(UiEvent::CatalogLoaded(catalog.clone()));
    }

    fn show_load_failure(&self, message: &str) {
        self.send(UiEvent::LoadFailed(message.to_string()));
    }

    fn remove_participant(&self, activity: &str, email: &str) {
        self.send(UiEvent::ParticipantRemoved {
            activity: activity.to_string(),
            email: email.to_string(),
        });
    }

    fn show_no_participants(&self, activity: &str) {
        self.send(UiEvent::NoParticipants {
            activity: activity.to_string(),
        });
    }

    fn show_status(&self, status: &StatusMessage) {
        self.send(UiEvent::Status(status.clone()));
    }

    fn hide_status(&self) {
        self.send(UiEvent::StatusHidden);
    }

    fn reset_form(&self) {
        self.send(UiEvent::FormReset);
    }

    fn alert(&self, message: &str) {
        self.send(UiEvent::Alert(message.to_string()));
    }
}

#[cfg(test)]
#[path = "../tests/events_tests.rs"]
mod tests;
