use chrono::NaiveDate;
use derive_more::Display;
use std::collections::HashMap;

use crate::datetime::{calendar_date, date_string, CalendarTz, MonthIndex};
use crate::error::Result;
use crate::model::{Availability, Event, Meeting, MonthSchedule, Shift, Viewer};
use crate::provider::Provider;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub enum EntryKind {
    #[display(fmt = "event")]
    Event,
    #[display(fmt = "meeting")]
    Meeting,
    #[display(fmt = "shift-set")]
    ShiftSet,
    #[display(fmt = "own-absence")]
    OwnAbsence,
    #[display(fmt = "other-absence")]
    OtherAbsence,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DayEntry {
    Event(Event),
    Meeting(Meeting),
    ShiftSet(Vec<Shift>),
    OwnAbsence(Availability),
    /// Absence of a colleague, only produced for owners.
    OtherAbsence(Availability),
}

impl DayEntry {
    pub fn kind(&self) -> EntryKind {
        match self {
            DayEntry::Event(_) => EntryKind::Event,
            DayEntry::Meeting(_) => EntryKind::Meeting,
            DayEntry::ShiftSet(_) => EntryKind::ShiftSet,
            DayEntry::OwnAbsence(_) => EntryKind::OwnAbsence,
            DayEntry::OtherAbsence(_) => EntryKind::OtherAbsence,
        }
    }

    /// Folds a later entry of the same kind into `self`. Shift sets are
    /// concatenated, every other kind is replaced.
    fn absorb(&mut self, other: DayEntry) {
        match (self, other) {
            (DayEntry::ShiftSet(shifts), DayEntry::ShiftSet(more)) => shifts.extend(more),
            (this, other) => *this = other,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub entry: DayEntry,
}

impl DayRecord {
    pub fn new(date: NaiveDate, entry: DayEntry) -> Self {
        DayRecord { date, entry }
    }

    pub fn date_string(&self) -> String {
        date_string(&self.date)
    }

    pub fn kind(&self) -> EntryKind {
        self.entry.kind()
    }
}

/// Everything that happens on one calendar date.
///
/// Holds at most one entry per [`EntryKind`], ordered by kind.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedDay {
    date: NaiveDate,
    date_string: String,
    entries: Vec<DayEntry>,
}

impl MergedDay {
    pub fn new(date: NaiveDate) -> Self {
        MergedDay {
            date,
            date_string: date_string(&date),
            entries: Vec::new(),
        }
    }

    pub fn merge(&mut self, entry: DayEntry) {
        let kind = entry.kind();
        match self.entries.binary_search_by_key(&kind, DayEntry::kind) {
            Ok(idx) => {
                log::debug!("{}: merging repeated {} entry", self.date_string, kind);
                self.entries[idx].absorb(entry)
            }
            Err(idx) => self.entries.insert(idx, entry),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn date_string(&self) -> &str {
        &self.date_string
    }

    pub fn entries(&self) -> &[DayEntry] {
        &self.entries
    }

    pub fn entry(&self, kind: EntryKind) -> Option<&DayEntry> {
        self.entries.iter().find(|e| e.kind() == kind)
    }

    pub fn has(&self, kind: EntryKind) -> bool {
        self.entry(kind).is_some()
    }

    pub fn has_entries(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn has_event(&self) -> bool {
        self.has(EntryKind::Event)
    }

    pub fn has_meeting(&self) -> bool {
        self.has(EntryKind::Meeting)
    }

    pub fn has_shift(&self) -> bool {
        self.has(EntryKind::ShiftSet)
    }

    pub fn has_availability(&self) -> bool {
        self.has(EntryKind::OwnAbsence)
    }

    pub fn has_staff_availability(&self) -> bool {
        self.has(EntryKind::OtherAbsence)
    }

    pub fn event(&self) -> Option<&Event> {
        match self.entry(EntryKind::Event) {
            Some(DayEntry::Event(event)) => Some(event),
            _ => None,
        }
    }

    pub fn meeting(&self) -> Option<&Meeting> {
        match self.entry(EntryKind::Meeting) {
            Some(DayEntry::Meeting(meeting)) => Some(meeting),
            _ => None,
        }
    }

    pub fn shifts(&self) -> &[Shift] {
        match self.entry(EntryKind::ShiftSet) {
            Some(DayEntry::ShiftSet(shifts)) => shifts,
            _ => &[],
        }
    }

    pub fn availability(&self) -> Option<&Availability> {
        match self.entry(EntryKind::OwnAbsence) {
            Some(DayEntry::OwnAbsence(a)) => Some(a),
            _ => None,
        }
    }

    pub fn staff_availability(&self) -> Option<&Availability> {
        match self.entry(EntryKind::OtherAbsence) {
            Some(DayEntry::OtherAbsence(a)) => Some(a),
            _ => None,
        }
    }
}

fn dated<'a, T: 'a>(
    items: impl Iterator<Item = T> + 'a,
    date_of: impl Fn(&T) -> &str + 'a,
    tz: &'a CalendarTz,
) -> impl Iterator<Item = (NaiveDate, T)> + 'a {
    items
        .map(move |item| calendar_date(date_of(&item), tz).map(|date| (date, item)))
        .inspect(|res| {
            if let Err(e) = res {
                log::warn!("Skipping record: {}", e)
            }
        })
        .filter_map(Result::ok)
}

/// Turns the raw collections into day records as seen by `viewer`.
///
/// Shifts are restricted to the viewer's own, absences are split into the
/// viewer's and, for owners only, everybody else's.
pub fn day_records(
    events: Vec<Event>,
    meetings: Vec<Meeting>,
    schedule: MonthSchedule,
    availabilities: Vec<Availability>,
    viewer: &Viewer,
    tz: &CalendarTz,
) -> Vec<DayRecord> {
    let mut records = Vec::new();

    records.extend(
        dated(events.into_iter(), |e| e.date.as_str(), tz)
            .map(|(date, e)| DayRecord::new(date, DayEntry::Event(e))),
    );

    records.extend(
        dated(meetings.into_iter(), |m| m.date.as_str(), tz)
            .map(|(date, m)| DayRecord::new(date, DayEntry::Meeting(m))),
    );

    let own_shift_days = schedule.days.into_iter().filter_map(|day| {
        let shifts: Vec<Shift> = day
            .shifts
            .into_iter()
            .filter(|s| s.is_staffed_by(&viewer.user_id))
            .collect();
        if shifts.is_empty() {
            None
        } else {
            Some((day.date, shifts))
        }
    });
    records.extend(
        dated(own_shift_days, |(date, _)| date.as_str(), tz)
            .map(|(date, (_, shifts))| DayRecord::new(date, DayEntry::ShiftSet(shifts))),
    );

    let (own, others): (Vec<_>, Vec<_>) = availabilities
        .into_iter()
        .partition(|a| a.user_id == viewer.user_id);

    records.extend(
        dated(own.into_iter(), |a| a.date.as_str(), tz)
            .map(|(date, a)| DayRecord::new(date, DayEntry::OwnAbsence(a))),
    );

    if viewer.is_owner {
        records.extend(
            dated(others.into_iter(), |a| a.date.as_str(), tz)
                .map(|(date, a)| DayRecord::new(date, DayEntry::OtherAbsence(a))),
        );
    }

    records
}

/// Folds day records into one [`MergedDay`] per date string.
pub fn merge_days<I>(records: I) -> HashMap<String, MergedDay>
where
    I: IntoIterator<Item = DayRecord>,
{
    let mut merged: HashMap<String, MergedDay> = HashMap::new();

    for record in records {
        merged
            .entry(record.date_string())
            .or_insert_with(|| MergedDay::new(record.date))
            .merge(record.entry);
    }

    merged
}

/// The merged calendar of one viewer. Dates without any record are not
/// stored; a missing day means "no data".
#[derive(Debug, Clone, Default)]
pub struct Agenda {
    days: HashMap<String, MergedDay>,
}

impl Agenda {
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = DayRecord>,
    {
        Agenda {
            days: merge_days(records),
        }
    }

    pub fn from_provider(
        provider: &dyn Provider,
        viewer: &Viewer,
        tz: &CalendarTz,
    ) -> Result<Self> {
        let records = day_records(
            provider.events()?,
            provider.meetings()?,
            provider.schedule()?,
            provider.availabilities()?,
            viewer,
            tz,
        );

        let agenda = Agenda::from_records(records);
        log::info!(
            "Aggregated {} days from '{}' for '{}'",
            agenda.len(),
            provider.name(),
            viewer.user_id
        );

        Ok(agenda)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn day(&self, date: &NaiveDate) -> Option<&MergedDay> {
        self.days.get(&date_string(date))
    }

    /// All merged days in no particular order.
    pub fn days(&self) -> impl Iterator<Item = &MergedDay> {
        self.days.values()
    }

    pub fn days_of_month(&self, month: MonthIndex) -> impl Iterator<Item = &MergedDay> {
        self.days.values().filter(move |d| month.contains(&d.date()))
    }

    pub fn into_days(self) -> Vec<MergedDay> {
        self.days.into_iter().map(|(_, day)| day).collect()
    }
}
