use chrono::NaiveDate;
use std::fmt::{self, Write};
use unsegen::base::Window;
use unsegen::widget::*;

use crate::agenda::{Agenda, DayEntry};

use super::month_view::{Line, Span, Tone};
use super::{draw_lines, Theme};

/// Text shown when a day is picked in the calendar.
pub fn day_detail(date: NaiveDate, agenda: &Agenda) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", date.format("%A, %-d %B %Y"));

    let day = match agenda.day(&date).filter(|d| d.has_entries()) {
        Some(day) => day,
        None => {
            let _ = writeln!(out, "  No entries for this day.");
            return out;
        }
    };

    for entry in day.entries() {
        // writing into a String cannot fail
        let _ = write_entry(&mut out, entry);
    }

    out
}

fn write_entry(out: &mut String, entry: &DayEntry) -> fmt::Result {
    match entry {
        DayEntry::Event(event) => writeln!(
            out,
            "  [event] {} ({})\n    {} - {}, {}",
            event.name, event.id, event.start_time, event.end_time, event.location
        ),
        DayEntry::Meeting(meeting) => writeln!(
            out,
            "  [meeting] {} ({})\n    {} - {}, {}, {} attending",
            meeting.title,
            meeting.id,
            meeting.start_time,
            meeting.end_time,
            meeting.location,
            meeting.attending_count()
        ),
        DayEntry::ShiftSet(shifts) => shifts.iter().try_for_each(|shift| {
            write!(
                out,
                "  [shift] {} {} - {}",
                shift.kind, shift.start_time, shift.end_time
            )?;
            match &shift.event_id {
                Some(event_id) => writeln!(out, " (event {})", event_id),
                None => writeln!(out),
            }
        }),
        DayEntry::OwnAbsence(absence) => {
            write!(out, "  [absence] You are absent on this day")?;
            match &absence.reason {
                Some(reason) => writeln!(out, ": {}", reason),
                None => writeln!(out),
            }
        }
        DayEntry::OtherAbsence(absence) => {
            write!(out, "  [staff absence] {} is absent", absence.user_id)?;
            match &absence.reason {
                Some(reason) => writeln!(out, ": {}", reason),
                None => writeln!(out),
            }
        }
    }
}

/// Side pane listing everything on the selected day.
pub struct DayPane<'a> {
    date: NaiveDate,
    agenda: &'a Agenda,
    theme: &'a Theme,
}

impl<'a> DayPane<'a> {
    pub fn new(date: NaiveDate, agenda: &'a Agenda, theme: &'a Theme) -> Self {
        DayPane {
            date,
            agenda,
            theme,
        }
    }

    fn lines(&self) -> Vec<Line> {
        day_detail(self.date, self.agenda)
            .lines()
            .enumerate()
            .map(|(idx, line)| {
                let tone = if idx == 0 { Tone::Header } else { Tone::Plain };
                vec![Span::new(line, tone)]
            })
            .collect()
    }
}

impl Widget for DayPane<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::at_least(20),
            height: RowDemand::at_least(1),
        }
    }

    fn draw(&self, window: Window, _hints: RenderingHints) {
        draw_lines(window, &self.lines(), self.theme);
    }
}
