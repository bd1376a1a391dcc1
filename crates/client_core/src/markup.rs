//! HTML fragments for the roster page.
//!
//! Every function here is a pure function of its inputs. Element ids
//! (`activities-list`, `activity`, `signup-form`, `message`, `email`) and
//! classes (`activity-card`, `participants-list`, `participant-item`,
//! `delete-btn`, `no-participants`, `success`, `error`, `hidden`) are the
//! contract with the page stylesheet and must not change.

use askama::Template;
use shared::domain::{Activity, ActivityCatalog};

use crate::view::StatusMessage;

pub const NO_PARTICIPANTS_TEXT: &str = "No participants yet";

#[derive(Template)]
#[template(path = "activity_card.html")]
pub(crate) struct ActivityCardTemplate<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub schedule: &'a str,
    pub spots_left: i64,
    pub participants: &'a [String],
    pub show_placeholder: bool,
}

impl<'a> ActivityCardTemplate<'a> {
    pub fn from_activity(name: &'a str, activity: &'a Activity) -> Self {
        Self {
            name,
            description: &activity.description,
            schedule: &activity.schedule,
            spots_left: activity.spots_left(),
            participants: &activity.participants,
            show_placeholder: activity.participants.is_empty(),
        }
    }
}

#[derive(Template)]
#[template(path = "activity_options.html")]
struct ActivityOptionsTemplate<'a> {
    names: Vec<&'a str>,
}

#[derive(Template)]
#[template(source = "<p>{{ message }}</p>", ext = "html")]
struct LoadFailureTemplate<'a> {
    message: &'a str,
}

#[derive(Template)]
#[template(
    source = "<div id=\"message\" class=\"{{ class_list }}\">{{ text }}</div>",
    ext = "html"
)]
struct StatusAreaTemplate<'a> {
    class_list: String,
    text: &'a str,
}

#[derive(Template)]
#[template(path = "roster_document.html")]
pub(crate) struct RosterDocumentTemplate<'a> {
    pub activities_list: &'a str,
    pub email: &'a str,
    pub activity_options: &'a str,
    pub status_area: &'a str,
}

pub fn activity_card(name: &str, activity: &Activity) -> askama::Result<String> {
    ActivityCardTemplate::from_activity(name, activity).render()
}

/// One card per activity, in catalog order.
pub fn activities_list(catalog: &ActivityCatalog) -> askama::Result<String> {
    let mut out = String::new();
    for (name, activity) in catalog.iter() {
        out.push_str(&activity_card(name, activity)?);
        out.push('\n');
    }
    Ok(out)
}

pub fn activity_options<'a>(names: impl IntoIterator<Item = &'a str>) -> askama::Result<String> {
    ActivityOptionsTemplate {
        names: names.into_iter().collect(),
    }
    .render()
}

pub fn load_failure(message: &str) -> askama::Result<String> {
    LoadFailureTemplate { message }.render()
}

/// The `#message` element. A missing status renders an empty, hidden area.
pub fn status_area(status: Option<&StatusMessage>, hidden: bool) -> askama::Result<String> {
    let mut classes = Vec::with_capacity(2);
    if let Some(status) = status {
        classes.push(status.kind.css_class());
    }
    if hidden || status.is_none() {
        classes.push("hidden");
    }
    StatusAreaTemplate {
        class_list: classes.join(" "),
        text: status.map(|s| s.text.as_str()).unwrap_or_default(),
    }
    .render()
}

#[cfg(test)]
#[path = "tests/markup_tests.rs"]
mod tests;
