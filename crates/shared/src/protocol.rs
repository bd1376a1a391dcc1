use serde::{Deserialize, Serialize};

/// Collection path of the roster API. Mutations live below
/// `/activities/{name}/{action}`.
pub const ACTIVITIES_PATH: &str = "activities";

/// Query parameter carrying the participant address on mutations.
pub const EMAIL_QUERY_PARAM: &str = "email";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterAction {
    Signup,
    Unregister,
}

impl RosterAction {
    pub fn path_segment(self) -> &'static str {
        match self {
            RosterAction::Signup => "signup",
            RosterAction::Unregister => "unregister",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupResponse {
    pub message: String,
}

/// The client only relies on the status of an unregister call; the message is
/// informational.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnregisterResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
