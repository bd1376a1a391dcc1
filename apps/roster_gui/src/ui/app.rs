use std::time::Duration;

use client_core::{StatusKind, StatusMessage};
use crossbeam_channel::{Receiver, Sender};
use shared::domain::ActivityCatalog;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiErrorContext, UiEvent};
use crate::controller::orchestration::{dispatch_backend_command, signup_form_is_submittable};

const LOADING_TEXT: &str = "Loading activities...";
const NO_PARTICIPANTS_TEXT: &str = "No participants yet";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityCard {
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub spots_left: i64,
    pub participants: Vec<String>,
    pub show_placeholder: bool,
}

/// Everything the window draws, kept apart from egui so event handling can
/// be exercised without a rendering context.
#[derive(Debug, Default)]
pub struct RosterScreen {
    pub cards: Vec<ActivityCard>,
    pub load_failure: Option<String>,
    pub loaded_once: bool,
    pub option_names: Vec<String>,
    pub email: String,
    pub selected_activity: String,
    pub status_message: Option<StatusMessage>,
    pub status_hidden: bool,
    pub alert: Option<String>,
    pub status: String,
    pub startup_error: Option<String>,
}

impl RosterScreen {
    pub fn new() -> Self {
        Self {
            status_hidden: true,
            status: LOADING_TEXT.to_string(),
            ..Default::default()
        }
    }

    pub fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::Info(message) => self.status = message,
            UiEvent::Error(err) => {
                tracing::error!("{}", err.message());
                if err.context() == UiErrorContext::BackendStartup {
                    self.startup_error = Some(err.message().to_string());
                }
                self.status = err.message().to_string();
            }
            UiEvent::CatalogLoaded(catalog) => self.show_catalog(&catalog),
            UiEvent::LoadFailed(message) => {
                self.loaded_once = true;
                self.cards.clear();
                self.load_failure = Some(message);
            }
            UiEvent::ParticipantRemoved { activity, email } => {
                if let Some(card) = self.card_mut(&activity) {
                    if let Some(pos) = card.participants.iter().position(|p| *p == email) {
                        card.participants.remove(pos);
                    }
                }
            }
            UiEvent::NoParticipants { activity } => {
                if let Some(card) = self.card_mut(&activity) {
                    card.show_placeholder = true;
                }
            }
            UiEvent::Status(message) => {
                self.status_message = Some(message);
                self.status_hidden = false;
            }
            UiEvent::StatusHidden => self.status_hidden = true,
            UiEvent::FormReset => {
                self.email.clear();
                self.selected_activity.clear();
            }
            UiEvent::Alert(message) => self.alert = Some(message),
        }
    }

    fn show_catalog(&mut self, catalog: &ActivityCatalog) {
        self.loaded_once = true;
        self.load_failure = None;
        self.cards = catalog
            .iter()
            .map(|(name, activity)| ActivityCard {
                name: name.to_string(),
                description: activity.description.clone(),
                schedule: activity.schedule.clone(),
                spots_left: activity.spots_left(),
                participants: activity.participants.clone(),
                show_placeholder: activity.participants.is_empty(),
            })
            .collect();
        self.option_names = catalog.names().map(str::to_string).collect();
        if !self.option_names.contains(&self.selected_activity) {
            self.selected_activity.clear();
        }
        self.status = format!("{} activities", self.cards.len());
    }

    fn card_mut(&mut self, activity: &str) -> Option<&mut ActivityCard> {
        self.cards.iter_mut().find(|card| card.name == activity)
    }

    pub fn visible_status(&self) -> Option<&StatusMessage> {
        if self.status_hidden {
            None
        } else {
            self.status_message.as_ref()
        }
    }

    pub fn can_submit(&self) -> bool {
        signup_form_is_submittable(&self.email, &self.selected_activity)
    }

    pub fn signup_command(&self) -> Option<BackendCommand> {
        self.can_submit().then(|| BackendCommand::Signup {
            email: self.email.trim().to_string(),
            activity: self.selected_activity.clone(),
        })
    }
}

pub struct RosterApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    screen: RosterScreen,
}

impl RosterApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            screen: RosterScreen::new(),
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.screen.apply(event);
        }
    }

    fn queue(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.screen.status);
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        let Some(message) = self.screen.visible_status().cloned() else {
            return;
        };
        let (fill, stroke) = match message.kind {
            StatusKind::Success => (
                egui::Color32::from_rgb(46, 94, 62),
                egui::Stroke::new(1.0, egui::Color32::from_rgb(92, 160, 112)),
            ),
            StatusKind::Error => (
                egui::Color32::from_rgb(111, 53, 53),
                egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)),
            ),
        };

        egui::Frame::NONE
            .fill(fill)
            .stroke(stroke)
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(egui::RichText::new(&message.text).color(egui::Color32::WHITE));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Dismiss").clicked() {
                            self.screen.status_hidden = true;
                        }
                    });
                });
            });
    }

    fn show_signup_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("signup_panel")
            .resizable(false)
            .default_width(300.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                ui.heading("Sign Up for an Activity");
                ui.add_space(8.0);

                ui.label(egui::RichText::new("Student Email:").strong());
                ui.add(
                    egui::TextEdit::singleline(&mut self.screen.email)
                        .id_salt("signup_email")
                        .hint_text("your-email@mergington.edu")
                        .desired_width(f32::INFINITY),
                );
                ui.add_space(6.0);

                ui.label(egui::RichText::new("Select Activity:").strong());
                let selected_text = if self.screen.selected_activity.is_empty() {
                    "-- Select an activity --".to_string()
                } else {
                    self.screen.selected_activity.clone()
                };
                egui::ComboBox::from_id_salt("signup_activity")
                    .selected_text(selected_text)
                    .width(ui.available_width())
                    .show_ui(ui, |ui| {
                        for name in &self.screen.option_names {
                            ui.selectable_value(
                                &mut self.screen.selected_activity,
                                name.clone(),
                                name.as_str(),
                            );
                        }
                    });
                ui.add_space(10.0);

                let submit = ui.add_enabled(self.screen.can_submit(), egui::Button::new("Sign Up"));
                if submit.clicked() {
                    if let Some(cmd) = self.screen.signup_command() {
                        self.queue(cmd);
                    }
                }

                ui.add_space(10.0);
                self.show_status_banner(ui);
            });
    }

    fn show_activity_cards(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Available Activities");
            ui.add_space(8.0);

            if let Some(message) = &self.screen.load_failure {
                ui.label(message);
                return;
            }
            if !self.screen.loaded_once {
                ui.label(LOADING_TEXT);
                return;
            }

            let mut pending = Vec::new();
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for card in &self.screen.cards {
                        egui::Frame::group(ui.style()).show(ui, |ui| {
                            ui.set_width(ui.available_width());
                            ui.label(egui::RichText::new(&card.name).strong().size(16.0));
                            ui.label(&card.description);
                            ui.label(format!("Schedule: {}", card.schedule));
                            ui.label(format!("Availability: {} spots left", card.spots_left));
                            ui.add_space(4.0);
                            ui.label(egui::RichText::new("Participants:").strong());
                            for email in &card.participants {
                                ui.horizontal(|ui| {
                                    ui.label(email);
                                    if ui
                                        .small_button("✕")
                                        .on_hover_text(format!("Remove {email}"))
                                        .clicked()
                                    {
                                        pending.push(BackendCommand::Unregister {
                                            email: email.clone(),
                                            activity: card.name.clone(),
                                        });
                                    }
                                });
                            }
                            if card.show_placeholder {
                                ui.label(egui::RichText::new(NO_PARTICIPANTS_TEXT).italics().weak());
                            }
                        });
                        ui.add_space(6.0);
                    }
                });
            for cmd in pending {
                self.queue(cmd);
            }
        });
    }

    fn show_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = self.screen.alert.clone() else {
            return;
        };
        egui::Window::new("Notice")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(&message);
                if ui.button("OK").clicked() {
                    self.screen.alert = None;
                }
            });
    }
}

impl eframe::App for RosterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Mergington High School");
                ui.label("Extracurricular Activities");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Refresh").clicked() {
                        self.queue(BackendCommand::LoadActivities);
                    }
                });
            });
        });
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            let text = self.screen.startup_error.as_deref().unwrap_or(&self.screen.status);
            ui.small(text);
        });
        self.show_signup_panel(ctx);
        self.show_activity_cards(ctx);
        self.show_alert(ctx);

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

#[cfg(test)]
#[path = "../tests/app_tests.rs"]
mod tests;
