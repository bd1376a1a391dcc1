use std::sync::{Mutex, MutexGuard, PoisonError};

use askama::Template;
use shared::domain::ActivityCatalog;
use tracing::error;

use crate::markup::{self, ActivityCardTemplate, RosterDocumentTemplate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

impl StatusKind {
    pub fn css_class(self) -> &'static str {
        match self {
            StatusKind::Success => "success",
            StatusKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    pub fn new(kind: StatusKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(StatusKind::Success, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(StatusKind::Error, text)
    }
}

/// The UI surfaces driven by [`crate::RosterController`].
///
/// Implementations are handed to the controller at construction time; the
/// controller never looks anything up globally.
pub trait RosterView: Send + Sync {
    /// Replace the activity list and the activity selector with `catalog`.
    fn show_catalog(&self, catalog: &ActivityCatalog);
    /// Replace the activity list with a static failure notice.
    fn show_load_failure(&self, message: &str);
    /// Drop one participant entry from an activity's rendered roster.
    fn remove_participant(&self, activity: &str, email: &str);
    /// Add the "no participants" placeholder to an activity's roster.
    fn show_no_participants(&self, activity: &str);
    fn show_status(&self, status: &StatusMessage);
    fn hide_status(&self);
    /// Clear the signup form fields.
    fn reset_form(&self);
    /// Blocking notification used for unregister failures.
    fn alert(&self, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CardState {
    name: String,
    description: String,
    schedule: String,
    spots_left: i64,
    participants: Vec<String>,
    placeholder: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ListArea {
    Loading,
    Cards(Vec<CardState>),
    Failure(String),
}

#[derive(Debug)]
struct HtmlDocument {
    list: ListArea,
    options: Vec<String>,
    status: Option<StatusMessage>,
    status_hidden: bool,
    email: String,
    selected_activity: String,
    alerts: Vec<String>,
}

impl Default for HtmlDocument {
    fn default() -> Self {
        Self {
            list: ListArea::Loading,
            options: Vec::new(),
            status: None,
            status_hidden: true,
            email: String::new(),
            selected_activity: String::new(),
            alerts: Vec::new(),
        }
    }
}

impl HtmlDocument {
    fn card_mut(&mut self, activity: &str) -> Option<&mut CardState> {
        match &mut self.list {
            ListArea::Cards(cards) => cards.iter_mut().find(|card| card.name == activity),
            _ => None,
        }
    }

    fn render_list(&self) -> askama::Result<String> {
        match &self.list {
            ListArea::Loading => Ok("<p>Loading activities...</p>".to_string()),
            ListArea::Failure(message) => markup::load_failure(message),
            ListArea::Cards(cards) => {
                let mut out = String::new();
                for card in cards {
                    let rendered = ActivityCardTemplate {
                        name: &card.name,
                        description: &card.description,
                        schedule: &card.schedule,
                        spots_left: card.spots_left,
                        participants: &card.participants,
                        show_placeholder: card.placeholder,
                    }
                    .render()?;
                    out.push_str(&rendered);
                    out.push('\n');
                }
                Ok(out)
            }
        }
    }
}

/// In-memory mirror of the roster page.
///
/// Mutations behave like the DOM patches a browser page applies: removing a
/// participant only drops that list item, and the placeholder only appears
/// once [`RosterView::show_no_participants`] is called.
#[derive(Debug, Default)]
pub struct HtmlRosterView {
    doc: Mutex<HtmlDocument>,
}

impl HtmlRosterView {
    pub fn new() -> Self {
        Self::default()
    }

    fn doc(&self) -> MutexGuard<'_, HtmlDocument> {
        self.doc.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Simulates the user typing into the signup form.
    pub fn fill_form(&self, email: impl Into<String>, activity: impl Into<String>) {
        let mut doc = self.doc();
        doc.email = email.into();
        doc.selected_activity = activity.into();
    }

    /// Current `(email, activity)` form values.
    pub fn form(&self) -> (String, String) {
        let doc = self.doc();
        (doc.email.clone(), doc.selected_activity.clone())
    }

    pub fn status(&self) -> Option<StatusMessage> {
        self.doc().status.clone()
    }

    pub fn is_status_hidden(&self) -> bool {
        self.doc().status_hidden
    }

    pub fn alerts(&self) -> Vec<String> {
        self.doc().alerts.clone()
    }

    pub fn option_names(&self) -> Vec<String> {
        self.doc().options.clone()
    }

    pub fn card_count(&self) -> usize {
        match &self.doc().list {
            ListArea::Cards(cards) => cards.len(),
            _ => 0,
        }
    }

    /// Participants currently rendered for `activity`.
    pub fn participants(&self, activity: &str) -> Option<Vec<String>> {
        self.doc()
            .card_mut(activity)
            .map(|card| card.participants.clone())
    }

    pub fn has_placeholder(&self, activity: &str) -> bool {
        self.doc()
            .card_mut(activity)
            .map(|card| card.placeholder)
            .unwrap_or(false)
    }

    pub fn load_failure(&self) -> Option<String> {
        match &self.doc().list {
            ListArea::Failure(message) => Some(message.clone()),
            _ => None,
        }
    }

    /// Inner HTML of `#activities-list`.
    pub fn activities_list_html(&self) -> askama::Result<String> {
        self.doc().render_list()
    }

    /// The whole page fragment: activity list, signup form, status area.
    pub fn document(&self) -> askama::Result<String> {
        let doc = self.doc();
        let activities_list = doc.render_list()?;
        let activity_options = markup::activity_options(doc.options.iter().map(String::as_str))?;
        let status_area = markup::status_area(doc.status.as_ref(), doc.status_hidden)?;
        RosterDocumentTemplate {
            activities_list: &activities_list,
            email: &doc.email,
            activity_options: &activity_options,
            status_area: &status_area,
        }
        .render()
    }
}

impl RosterView for HtmlRosterView {
    fn show_catalog(&self, catalog: &ActivityCatalog) {
        let cards = catalog
            .iter()
            .map(|(name, activity)| CardState {
                name: name.to_string(),
                description: activity.description.clone(),
                schedule: activity.schedule.clone(),
                spots_left: activity.spots_left(),
                participants: activity.participants.clone(),
                placeholder: activity.participants.is_empty(),
            })
            .collect();
        let mut doc = self.doc();
        doc.list = ListArea::Cards(cards);
        doc.options = catalog.names().map(str::to_string).collect();
    }

    fn show_load_failure(&self, message: &str) {
        self.doc().list = ListArea::Failure(message.to_string());
    }

    fn remove_participant(&self, activity: &str, email: &str) {
        let mut doc = self.doc();
        let Some(card) = doc.card_mut(activity) else {
            error!(activity, "view: remove requested for an activity that is not rendered");
            return;
        };
        if let Some(index) = card.participants.iter().position(|p| p == email) {
            card.participants.remove(index);
        }
    }

    fn show_no_participants(&self, activity: &str) {
        if let Some(card) = self.doc().card_mut(activity) {
            card.placeholder = true;
        }
    }

    fn show_status(&self, status: &StatusMessage) {
        let mut doc = self.doc();
        doc.status = Some(status.clone());
        doc.status_hidden = false;
    }

    fn hide_status(&self) {
        self.doc().status_hidden = true;
    }

    fn reset_form(&self) {
        let mut doc = self.doc();
        doc.email.clear();
        doc.selected_activity.clear();
    }

    fn alert(&self, message: &str) {
        self.doc().alerts.push(message.to_string());
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
