use chrono::NaiveDate;

use crate::datetime::MonthIndex;
use crate::grid::MonthGrid;

/// Scroll position of the viewport over the rendered month pages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_top: f64, scroll_height: f64, client_height: f64) -> Self {
        ScrollMetrics {
            scroll_top,
            scroll_height,
            client_height,
        }
    }

    pub fn distance_to_top(&self) -> f64 {
        self.scroll_top
    }

    pub fn distance_to_bottom(&self) -> f64 {
        self.scroll_height - (self.scroll_top + self.client_height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    Idle,
    ExpandingForward,
    ExpandingBackward,
}

/// Months added by one scroll sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Expansion {
    pub forward: bool,
    pub backward: bool,
}

impl Expansion {
    pub fn any(&self) -> bool {
        self.forward || self.backward
    }
}

/// Request to bring a month page into view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollRequest {
    pub month: MonthIndex,
    pub anchor: String,
}

/// Contiguous run of month pages materialized for scrolling.
///
/// The window only ever grows. Months scrolled out of sight stay
/// materialized for the rest of the session.
#[derive(Debug, Clone)]
pub struct MonthWindow {
    months: Vec<MonthIndex>,
    grids: Vec<MonthGrid>,
    focus: MonthIndex,
    threshold: f64,
    state: WindowState,
}

impl MonthWindow {
    pub const DEFAULT_THRESHOLD: f64 = 200.0;

    /// Opens the window on the month before, of and after `today`. Dates
    /// at the very ends of chrono's range are pulled inside it.
    pub fn new(today: NaiveDate) -> Self {
        let focus =
            MonthIndex::from(today).clamp(MonthIndex::min().next(), MonthIndex::max().prev());
        let months = vec![focus.prev(), focus, focus.next()];
        let grids = months.iter().copied().map(MonthGrid::new).collect();

        MonthWindow {
            months,
            grids,
            focus,
            threshold: Self::DEFAULT_THRESHOLD,
            state: WindowState::Idle,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn months(&self) -> &[MonthIndex] {
        &self.months
    }

    pub fn grids(&self) -> &[MonthGrid] {
        &self.grids
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn first(&self) -> MonthIndex {
        self.months[0]
    }

    pub fn last(&self) -> MonthIndex {
        self.months[self.months.len() - 1]
    }

    pub fn focus(&self) -> MonthIndex {
        self.focus
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    pub fn contains(&self, month: &MonthIndex) -> bool {
        self.first() <= *month && *month <= self.last()
    }

    fn append(&mut self) -> bool {
        let month = self.last().next();
        if !month.is_supported() {
            return false;
        }
        self.months.push(month);
        self.grids.push(MonthGrid::new(month));
        true
    }

    fn prepend(&mut self) -> bool {
        let month = self.first().prev();
        if !month.is_supported() {
            return false;
        }
        self.months.insert(0, month);
        self.grids.insert(0, MonthGrid::new(month));
        true
    }

    /// Grows the window until it reaches `month`.
    fn extend_to(&mut self, month: MonthIndex) {
        while month > self.last() {
            if !self.append() {
                break;
            }
        }
        while month < self.first() {
            if !self.prepend() {
                break;
            }
        }
    }

    /// Checks one scroll sample and adds a month at each end the viewport
    /// came within the threshold of, the threshold itself included. Both
    /// ends may grow in the same sample.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) -> Expansion {
        let mut expansion = Expansion::default();

        if self.state != WindowState::Idle {
            log::debug!("Ignoring scroll sample during {:?}", self.state);
            return expansion;
        }

        if metrics.distance_to_bottom() <= self.threshold {
            self.state = WindowState::ExpandingForward;
            expansion.forward = self.append();
        }

        if metrics.distance_to_top() <= self.threshold {
            self.state = WindowState::ExpandingBackward;
            expansion.backward = self.prepend();
        }

        self.state = WindowState::Idle;

        if expansion.any() {
            log::debug!(
                "Month window now {} .. {} ({} months)",
                self.first(),
                self.last(),
                self.len()
            );
        }

        expansion
    }

    /// Focuses today's month and asks for it to be scrolled into view.
    /// Already materialized months are kept.
    pub fn jump_to_today(&mut self, today: NaiveDate) -> ScrollRequest {
        self.focus_month(MonthIndex::from(today))
    }

    pub fn previous_month(&mut self) -> ScrollRequest {
        self.focus_month(self.focus.prev())
    }

    pub fn next_month(&mut self) -> ScrollRequest {
        self.focus_month(self.focus.next())
    }

    fn focus_month(&mut self, month: MonthIndex) -> ScrollRequest {
        let month = month.clamp(MonthIndex::min(), MonthIndex::max());
        self.extend_to(month);
        self.focus = month;

        ScrollRequest {
            month,
            anchor: month.anchor(),
        }
    }
}
