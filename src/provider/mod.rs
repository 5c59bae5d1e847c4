pub mod fixture;

pub use fixture::FixtureProvider;

use std::path::Path;

use crate::error::Result;
use crate::model::{Availability, Event, Meeting, MonthSchedule};

/// Upstream data source of the calendar.
///
/// Every method returns the complete collection; filtering by viewer is
/// done by the aggregation.
pub trait Provider {
    fn name(&self) -> &str;
    fn events(&self) -> Result<Vec<Event>>;
    fn meetings(&self) -> Result<Vec<Meeting>>;
    fn schedule(&self) -> Result<MonthSchedule>;
    fn availabilities(&self) -> Result<Vec<Availability>>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    pub events: Vec<Event>,
    pub meetings: Vec<Meeting>,
    pub schedule: MonthSchedule,
    pub availabilities: Vec<Availability>,
}

impl Provider for MemoryProvider {
    fn name(&self) -> &str {
        "memory"
    }

    fn events(&self) -> Result<Vec<Event>> {
        Ok(self.events.clone())
    }

    fn meetings(&self) -> Result<Vec<Meeting>> {
        Ok(self.meetings.clone())
    }

    fn schedule(&self) -> Result<MonthSchedule> {
        Ok(self.schedule.clone())
    }

    fn availabilities(&self) -> Result<Vec<Availability>> {
        Ok(self.availabilities.clone())
    }
}

pub fn load_provider(path: &Path) -> Result<Box<dyn Provider>> {
    let provider = FixtureProvider::from_file(path)?;
    log::info!("Loaded data source '{}'", provider.name());
    Ok(Box::new(provider))
}
