use std::thread;
use std::time::Duration;

use crate::agenda::{Agenda, MergedDay};
use crate::config::Config;
use crate::datetime::CalendarTz;
use crate::model::Viewer;
use crate::provider::Provider;

/// Calendar data as handed to the grid: the merged days plus a loading flag.
///
/// A fetch waits for the configured delay before aggregating, mimicking a
/// remote source. Failures are logged and leave an empty calendar behind.
pub struct Feed {
    provider: Box<dyn Provider>,
    viewer: Viewer,
    tz: CalendarTz,
    delay: Duration,
    agenda: Agenda,
    loading: bool,
}

impl Feed {
    pub fn new(provider: Box<dyn Provider>, viewer: Viewer, tz: CalendarTz) -> Self {
        Feed {
            provider,
            viewer,
            tz,
            delay: Duration::from_millis(0),
            agenda: Agenda::default(),
            loading: true,
        }
    }

    pub fn from_config(config: &Config, provider: Box<dyn Provider>) -> Self {
        Feed::new(provider, config.viewer.clone(), config.timezone)
            .with_delay(config.fetch_delay())
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn load(&mut self) {
        self.loading = true;

        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }

        self.agenda = match Agenda::from_provider(self.provider.as_ref(), &self.viewer, &self.tz) {
            Ok(agenda) => agenda,
            Err(e) => {
                log::error!("Error fetching calendar data: {}", e);
                Agenda::default()
            }
        };

        self.loading = false;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn agenda(&self) -> &Agenda {
        &self.agenda
    }

    pub fn days(&self) -> Vec<&MergedDay> {
        self.agenda.days().collect()
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }
}
