//! Records served by the portal's data sources.
//!
//! Dates are kept as the ISO strings the sources deliver. They are only
//! folded onto calendar dates during aggregation, see
//! [`calendar_date`](crate::datetime::calendar_date).

use derive_more::Display;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Author {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub is_owner: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[display(fmt = "upcoming")]
    Upcoming,
    #[display(fmt = "ongoing")]
    Ongoing,
    #[display(fmt = "past")]
    Past,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Dj {
    pub id: String,
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub djs: Vec<Dj>,
    pub status: Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    #[display(fmt = "attending")]
    Attending,
    #[display(fmt = "declined")]
    Declined,
    #[display(fmt = "pending")]
    Pending,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MeetingAttendee {
    pub user: Author,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub decline_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Meeting {
    pub id: String,
    pub title: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub attendees: Vec<MeetingAttendee>,
    pub status: Status,
    #[serde(default)]
    pub is_protocol_finalized: bool,
}

impl Meeting {
    pub fn attending_count(&self) -> usize {
        self.attendees
            .iter()
            .filter(|a| a.status == AttendanceStatus::Attending)
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Deserialize)]
pub enum ShiftType {
    Kasse,
    Garderobe,
    Springer,
    Bar,
    Theke,
    Security,
    Reinigung,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Shift {
    pub id: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(rename = "type")]
    pub kind: ShiftType,
    #[serde(default)]
    pub staff: Option<Author>,
    #[serde(default)]
    pub event_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Shift {
    pub fn is_staffed_by(&self, user_id: &str) -> bool {
        self.staff.as_ref().map_or(false, |s| s.id == user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScheduleDay {
    pub date: String,
    #[serde(default)]
    pub shifts: Vec<Shift>,
    #[serde(default)]
    pub has_event: bool,
    #[serde(default)]
    pub event_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MonthSchedule {
    #[serde(default)]
    pub year: i32,
    /// Zero based, as delivered by the scheduling source.
    #[serde(default)]
    pub month: u32,
    #[serde(default)]
    pub days: Vec<ScheduleDay>,
}

/// A staff member's (un)availability entry. Every entry counts as absence
/// on the calendar, regardless of `is_available`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Availability {
    pub id: String,
    pub user_id: String,
    pub date: String,
    #[serde(default)]
    pub is_available: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Who is looking at the calendar.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Viewer {
    pub user_id: String,
    #[serde(default)]
    pub is_owner: bool,
}

impl Viewer {
    pub fn new(user_id: &str, is_owner: bool) -> Self {
        Viewer {
            user_id: user_id.to_owned(),
            is_owner,
        }
    }
}
