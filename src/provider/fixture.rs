use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::Provider;
use crate::error::{Error, ErrorKind, Result};
use crate::model::{Availability, Event, Meeting, MonthSchedule};

#[derive(Debug, Default, Deserialize)]
struct FixtureFile {
    #[serde(default)]
    events: Vec<Event>,
    #[serde(default)]
    meetings: Vec<Meeting>,
    #[serde(default)]
    schedule: MonthSchedule,
    #[serde(default)]
    availabilities: Vec<Availability>,
}

/// Serves the portal's data from a local TOML file.
///
/// The file is parsed once on construction; the collections are handed
/// out as copies.
pub struct FixtureProvider {
    path: PathBuf,
    name: String,
    data: FixtureFile,
}

impl FixtureProvider {
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::new(
                ErrorKind::MissingData,
                &format!("'{}' is not a file", path.display()),
            ));
        }

        let content = fs::read_to_string(path)?;
        let provider = Self::from_toml(&content)
            .map_err(|e| {
                let msg = format!(
                    "{} (in '{}')",
                    e.message.as_deref().unwrap_or_default(),
                    path.display()
                );
                e.with_msg(&msg)
            })?
            .with_path(path);

        Ok(provider)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let data: FixtureFile = toml::from_str(content)?;

        log::debug!(
            "fixture: {} events, {} meetings, {} schedule days, {} availabilities",
            data.events.len(),
            data.meetings.len(),
            data.schedule.days.len(),
            data.availabilities.len()
        );

        Ok(FixtureProvider {
            path: PathBuf::new(),
            name: "inline".to_owned(),
            data,
        })
    }

    fn with_path(mut self, path: &Path) -> Self {
        self.name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.path = path.to_owned();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Provider for FixtureProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn events(&self) -> Result<Vec<Event>> {
        Ok(self.data.events.clone())
    }

    fn meetings(&self) -> Result<Vec<Meeting>> {
        Ok(self.data.meetings.clone())
    }

    fn schedule(&self) -> Result<MonthSchedule> {
        Ok(self.data.schedule.clone())
    }

    fn availabilities(&self) -> Result<Vec<Availability>> {
        Ok(self.data.availabilities.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ShiftType;

    const FIXTURE: &str = r#"
        [[events]]
        id = "e1"
        name = "Techno Night"
        date = "2024-05-01"
        start_time = "23:00"
        end_time = "06:00"
        location = "Main Floor"
        status = "upcoming"

        [[meetings]]
        id = "m1"
        title = "Team Meeting"
        date = "2024-05-03T18:00:00Z"
        start_time = "18:00"
        end_time = "19:30"
        status = "upcoming"

        [[meetings.attendees]]
        status = "attending"
        user = { id = "staff1", name = "Anna" }

        [schedule]
        year = 2024
        month = 4

        [[schedule.days]]
        date = "2024-05-01"
        has_event = true
        event_id = "e1"

        [[schedule.days.shifts]]
        id = "s1"
        date = "2024-05-01"
        start_time = "22:00"
        end_time = "02:00"
        type = "Bar"
        staff = { id = "staff1", name = "Anna" }

        [[availabilities]]
        id = "a1"
        user_id = "staff2"
        date = "2024-05-10"
        reason = "Urlaub"
    "#;

    #[test]
    fn parse_fixture() {
        let provider = FixtureProvider::from_toml(FIXTURE).unwrap();

        let events = provider.events().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "Techno Night");

        let meetings = provider.meetings().unwrap();
        assert_eq!(meetings[0].attending_count(), 1);

        let schedule = provider.schedule().unwrap();
        assert_eq!(schedule.days.len(), 1);
        assert_eq!(schedule.days[0].shifts[0].kind, ShiftType::Bar);
        assert!(schedule.days[0].shifts[0].is_staffed_by("staff1"));

        let availabilities = provider.availabilities().unwrap();
        assert_eq!(availabilities[0].reason.as_deref(), Some("Urlaub"));
        assert!(!availabilities[0].is_available);
    }

    #[test]
    fn empty_fixture_is_valid() {
        let provider = FixtureProvider::from_toml("").unwrap();
        assert!(provider.events().unwrap().is_empty());
        assert!(provider.schedule().unwrap().days.is_empty());
    }

    #[test]
    fn malformed_fixture_is_rejected() {
        let err = FixtureProvider::from_toml("[[events]]\nid = 1").err().unwrap();
        assert!(matches!(err.kind, ErrorKind::DataParse));
    }

    #[test]
    fn missing_file() {
        let err = FixtureProvider::from_file(Path::new("/nonexistent/rota.toml"))
            .err()
            .unwrap();
        assert!(matches!(err.kind, ErrorKind::MissingData));
    }
}
