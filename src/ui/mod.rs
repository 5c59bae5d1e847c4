pub mod calendar_pane;
pub mod day_detail;
pub mod month_view;

pub use calendar_pane::{CalendarPane, StatusLine};
pub use day_detail::{day_detail, DayPane};
pub use month_view::{legend, page_height, render_window, DayCell, Line, MonthView, Span, Tone};

use std::fmt::Write;
use unsegen::base::{Color, Cursor, StyleModifier, Window};

use crate::agenda::EntryKind;

#[derive(Clone, Debug)]
pub struct Theme {
    pub today_day_char: char,
    pub focus_month_char: char,
    pub event_char: char,
    pub meeting_char: char,
    pub shift_char: char,
    pub absence_char: char,
    pub staff_absence_char: char,
    pub month_header_style: StyleModifier,
    pub focus_month_style: StyleModifier,
    pub padding_day_style: StyleModifier,
    pub today_day_style: StyleModifier,
    pub focus_day_style: StyleModifier,
    pub status_style: StyleModifier,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            today_day_char: '*',
            focus_month_char: '>',
            event_char: 'E',
            meeting_char: 'M',
            shift_char: 'S',
            absence_char: 'A',
            staff_absence_char: 'O',
            month_header_style: StyleModifier::new().fg_color(Color::Yellow),
            focus_month_style: StyleModifier::new().fg_color(Color::LightYellow),
            padding_day_style: StyleModifier::new().fg_color(Color::LightBlack),
            today_day_style: StyleModifier::new().invert(true),
            focus_day_style: StyleModifier::new().bg_color(Color::Blue),
            status_style: StyleModifier::new().invert(true),
        }
    }
}

impl Theme {
    pub fn marker(&self, kind: EntryKind) -> char {
        match kind {
            EntryKind::Event => self.event_char,
            EntryKind::Meeting => self.meeting_char,
            EntryKind::ShiftSet => self.shift_char,
            EntryKind::OwnAbsence => self.absence_char,
            EntryKind::OtherAbsence => self.staff_absence_char,
        }
    }

    pub fn style(&self, tone: Tone) -> StyleModifier {
        match tone {
            Tone::Plain => StyleModifier::new(),
            Tone::Header => self.month_header_style,
            Tone::FocusHeader => self.focus_month_style,
            Tone::Padding => self.padding_day_style,
            Tone::Today => self.today_day_style,
            Tone::Selected => self.focus_day_style,
            Tone::Status => self.status_style,
        }
    }
}

/// Writes `lines` top to bottom into `window`, one styled span at a time.
pub(crate) fn draw_lines(mut window: Window, lines: &[Line], theme: &Theme) {
    let mut cursor = Cursor::new(&mut window);

    for line in lines {
        for span in line {
            cursor.set_style_modifier(theme.style(span.tone));
            if let Err(err) = write!(&mut cursor, "{}", span.text) {
                log::warn!("Error while drawing '{}': {}", span.text, err);
            }
        }
        cursor.set_style_modifier(StyleModifier::new());
        cursor.fill_and_wrap_line();
    }
}
