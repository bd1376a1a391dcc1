use std::fmt;

use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub description: String,
    pub schedule: String,
    pub max_participants: u32,
    #[serde(default)]
    pub participants: Vec<String>,
}

impl Activity {
    /// Capacity minus current roster size. Negative when the server reports an
    /// over-full roster.
    pub fn spots_left(&self) -> i64 {
        i64::from(self.max_participants) - self.participants.len() as i64
    }
}

/// Activities keyed by name, in the order the server listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityCatalog {
    entries: Vec<(String, Activity)>,
}

impl ActivityCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an activity. A replaced activity keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, activity: Activity) -> Option<Activity> {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, activity)),
            None => {
                self.entries.push((name, activity));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Activity> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, activity)| activity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Activity)> {
        self.entries
            .iter()
            .map(|(name, activity)| (name.as_str(), activity))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Drops the first roster entry matching `email`. Returns the number of
    /// participants left in the activity, or `None` when the activity is unknown.
    pub fn remove_participant(&mut self, activity: &str, email: &str) -> Option<usize> {
        let (_, entry) = self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing == activity)?;
        if let Some(index) = entry.participants.iter().position(|p| p == email) {
            entry.participants.remove(index);
        }
        Some(entry.participants.len())
    }
}

impl FromIterator<(String, Activity)> for ActivityCatalog {
    fn from_iter<T: IntoIterator<Item = (String, Activity)>>(iter: T) -> Self {
        let mut catalog = Self::new();
        for (name, activity) in iter {
            catalog.insert(name, activity);
        }
        catalog
    }
}

impl Serialize for ActivityCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, activity) in &self.entries {
            map.serialize_entry(name, activity)?;
        }
        map.end()
    }
}

struct CatalogVisitor;

impl<'de> Visitor<'de> for CatalogVisitor {
    type Value = ActivityCatalog;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of activity name to activity details")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
        let mut catalog = ActivityCatalog::new();
        while let Some((name, activity)) = access.next_entry::<String, Activity>()? {
            catalog.insert(name, activity);
        }
        Ok(catalog)
    }
}

impl<'de> Deserialize<'de> for ActivityCatalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CatalogVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chess() -> Activity {
        Activity {
            description: "Learn strategies and compete in chess tournaments".to_string(),
            schedule: "Fridays, 3:30 PM - 5:00 PM".to_string(),
            max_participants: 12,
            participants: vec![
                "michael@mergington.edu".to_string(),
                "daniel@mergington.edu".to_string(),
            ],
        }
    }

    #[test]
    fn spots_left_subtracts_roster_size() {
        assert_eq!(chess().spots_left(), 10);

        let mut overfull = chess();
        overfull.max_participants = 1;
        assert_eq!(overfull.spots_left(), -1);
    }

    #[test]
    fn deserialize_keeps_server_order() {
        let raw = r#"{
            "Swimming Club": {"description": "d", "schedule": "s", "max_participants": 20, "participants": []},
            "Art Studio": {"description": "d", "schedule": "s", "max_participants": 15, "participants": []},
            "Chess Club": {"description": "d", "schedule": "s", "max_participants": 12, "participants": ["a@x.edu"]}
        }"#;
        let catalog: ActivityCatalog = serde_json::from_str(raw).expect("catalog");
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(names, vec!["Swimming Club", "Art Studio", "Chess Club"]);
        assert_eq!(catalog.get("Chess Club").map(|a| a.participants.len()), Some(1));
    }

    #[test]
    fn duplicate_key_keeps_first_position_and_last_value() {
        let raw = r#"{
            "A": {"description": "first", "schedule": "s", "max_participants": 1, "participants": []},
            "B": {"description": "b", "schedule": "s", "max_participants": 1, "participants": []},
            "A": {"description": "second", "schedule": "s", "max_participants": 1, "participants": []}
        }"#;
        let catalog: ActivityCatalog = serde_json::from_str(raw).expect("catalog");
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.names().next(), Some("A"));
        assert_eq!(catalog.get("A").map(|a| a.description.as_str()), Some("second"));
    }

    #[test]
    fn rejects_non_object_payload() {
        assert!(serde_json::from_str::<ActivityCatalog>("[]").is_err());
        assert!(serde_json::from_str::<ActivityCatalog>("<html>").is_err());
    }

    #[test]
    fn remove_participant_reports_remaining_count() {
        let mut catalog: ActivityCatalog = [("Chess Club".to_string(), chess())]
            .into_iter()
            .collect();

        assert_eq!(
            catalog.remove_participant("Chess Club", "michael@mergington.edu"),
            Some(1)
        );
        assert_eq!(
            catalog.remove_participant("Chess Club", "daniel@mergington.edu"),
            Some(0)
        );
        assert_eq!(catalog.remove_participant("Drama Club", "daniel@mergington.edu"), None);
        assert!(catalog
            .get("Chess Club")
            .map(|a| a.participants.is_empty())
            .unwrap_or(false));
    }

    #[test]
    fn serializes_back_to_object_in_order() {
        let catalog: ActivityCatalog = [
            ("Z".to_string(), chess()),
            ("A".to_string(), chess()),
        ]
        .into_iter()
        .collect();
        let text = serde_json::to_string(&catalog).expect("json");
        assert!(text.find("\"Z\"") < text.find("\"A\""));
    }
}
