pub mod controller;
pub mod error;
pub mod markup;
pub mod settings;
pub mod transport;
pub mod view;

pub use controller::{
    LoadOutcome, RosterController, RosterPhase, SignupOutcome, UnregisterOutcome,
};
pub use error::RosterError;
pub use settings::{load_settings, ClientSettings};
pub use transport::{HttpRosterApi, RosterApi};
pub use view::{HtmlRosterView, RosterView, StatusKind, StatusMessage};
