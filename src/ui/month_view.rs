use chrono::{Datelike, NaiveDate};
use itertools::Itertools;
use std::fmt::{self, Display, Write};

use crate::agenda::{Agenda, EntryKind, MergedDay};
use crate::grid::{GridCell, MonthGrid};
use crate::window::MonthWindow;

use super::Theme;

/// Highlight of one piece of a page line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Header,
    FocusHeader,
    Padding,
    Today,
    Selected,
    Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub tone: Tone,
}

impl Span {
    pub fn new<S: Into<String>>(text: S, tone: Tone) -> Self {
        Span {
            text: text.into(),
            tone,
        }
    }
}

pub type Line = Vec<Span>;

/// Plain text of `line` without trailing blanks.
pub fn line_text(line: &[Span]) -> String {
    line.iter()
        .map(|span| span.text.as_str())
        .collect::<String>()
        .trim_end()
        .to_owned()
}

pub struct DayCell<'a> {
    cell: GridCell,
    day: Option<&'a MergedDay>,
    is_today: bool,
    selected: bool,
    theme: &'a Theme,
}

impl<'a> DayCell<'a> {
    pub const CELL_WIDTH: usize = 9;
    const MARKER_WIDTH: usize = 4;

    pub fn new(cell: GridCell, day: Option<&'a MergedDay>, theme: &'a Theme) -> Self {
        DayCell {
            cell,
            day,
            is_today: false,
            selected: false,
            theme,
        }
    }

    pub fn today(mut self, is_today: bool) -> Self {
        self.is_today = is_today;
        self
    }

    pub fn select(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn tone(&self) -> Tone {
        if self.selected {
            Tone::Selected
        } else if self.is_today {
            Tone::Today
        } else if !self.cell.in_month {
            Tone::Padding
        } else {
            Tone::Plain
        }
    }

    fn markers(&self) -> String {
        // padding days show the number only
        if !self.cell.in_month {
            return String::new();
        }

        self.day
            .map(|day| {
                day.entries()
                    .iter()
                    .map(|e| self.theme.marker(e.kind()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Display for DayCell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arg_today = if self.is_today {
            self.theme.today_day_char
        } else {
            ' '
        };

        let day_num = self.cell.date.day();
        if self.cell.in_month {
            write!(f, "{} {:>2} ", arg_today, day_num)?;
        } else {
            write!(f, "{}({:>2})", arg_today, day_num)?;
        }

        write!(f, "{:<width$}", self.markers(), width = Self::MARKER_WIDTH)
    }
}

/// Rows a month page takes up in the calendar pane, the gap below included.
pub fn page_height(grid: &MonthGrid) -> usize {
    MonthView::HEADER_ROWS + grid.num_weeks() + 1
}

pub struct MonthView<'a> {
    grid: &'a MonthGrid,
    agenda: &'a Agenda,
    today: NaiveDate,
    selected: Option<NaiveDate>,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> MonthView<'a> {
    pub const HEADER_ROWS: usize = 2;
    const HEADER: &'static [&'static str] = &["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

    pub fn new(
        grid: &'a MonthGrid,
        agenda: &'a Agenda,
        today: NaiveDate,
        theme: &'a Theme,
    ) -> Self {
        MonthView {
            grid,
            agenda,
            today,
            selected: None,
            focused: false,
            theme,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn select(mut self, selected: Option<NaiveDate>) -> Self {
        self.selected = selected;
        self
    }

    /// Title, weekday header and one line per week.
    pub fn lines(&self) -> Vec<Line> {
        let mut lines = Vec::with_capacity(Self::HEADER_ROWS + self.grid.num_weeks());

        let (focus, tone) = if self.focused {
            (self.theme.focus_month_char, Tone::FocusHeader)
        } else {
            (' ', Tone::Header)
        };
        let month = self.grid.month();
        lines.push(vec![Span::new(
            format!("{} {}  [{}]", focus, month, month.anchor()),
            tone,
        )]);

        let header = Self::HEADER
            .iter()
            .map(|head| format!("{:>4}{:width$}", head, "", width = DayCell::CELL_WIDTH - 4))
            .join("");
        lines.push(vec![Span::new(header, Tone::Header)]);

        for week in self.grid.weeks() {
            lines.push(
                week.iter()
                    .map(|cell| {
                        let day_cell = DayCell::new(*cell, self.agenda.day(&cell.date), self.theme)
                            .today(cell.date == self.today)
                            .select(self.selected == Some(cell.date));
                        Span::new(day_cell.to_string(), day_cell.tone())
                    })
                    .collect(),
            );
        }

        lines
    }
}

impl Display for MonthView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{}", line_text(&line))?;
        }

        Ok(())
    }
}

/// Lines of every month page in `window`, each page followed by a blank line.
pub fn window_lines(
    window: &MonthWindow,
    agenda: &Agenda,
    today: NaiveDate,
    selected: Option<NaiveDate>,
    theme: &Theme,
) -> Vec<Line> {
    window
        .grids()
        .iter()
        .flat_map(|grid| {
            let mut lines = MonthView::new(grid, agenda, today, theme)
                .focused(grid.month() == window.focus())
                .select(selected)
                .lines();
            lines.push(Line::new());
            lines
        })
        .collect()
}

/// One-line explanation of the day markers.
pub fn legend(theme: &Theme) -> String {
    [
        EntryKind::Event,
        EntryKind::Meeting,
        EntryKind::ShiftSet,
        EntryKind::OwnAbsence,
        EntryKind::OtherAbsence,
    ]
    .iter()
    .map(|&kind| format!("{} {}", theme.marker(kind), kind))
    .join("  ")
}

/// Renders every month page of `window`, followed by the marker legend.
pub fn render_window(
    window: &MonthWindow,
    agenda: &Agenda,
    today: NaiveDate,
    theme: &Theme,
) -> String {
    let mut out = String::new();

    for line in window_lines(window, agenda, today, None, theme) {
        // writing into a String cannot fail
        let _ = writeln!(out, "{}", line_text(&line));
    }
    let _ = writeln!(out, "{}", legend(theme));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agenda::tests::{event, shift};
    use crate::agenda::{DayEntry, DayRecord};
    use crate::datetime::MonthIndex;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn agenda() -> Agenda {
        Agenda::from_records(vec![
            DayRecord::new(ymd(2024, 5, 1), DayEntry::Event(event("e1", "2024-05-01"))),
            DayRecord::new(
                ymd(2024, 5, 1),
                DayEntry::ShiftSet(vec![shift("s1", "2024-05-01", Some("staff1"))]),
            ),
            DayRecord::new(ymd(2024, 4, 30), DayEntry::Event(event("e0", "2024-04-30"))),
        ])
    }

    #[test]
    fn cell_shows_markers_in_kind_order() {
        let theme = Theme::default();
        let agenda = agenda();
        let cell = GridCell {
            date: ymd(2024, 5, 1),
            in_month: true,
        };
        let text = DayCell::new(cell, agenda.day(&cell.date), &theme)
            .today(true)
            .to_string();
        assert_eq!(text, "*  1 ES  ");
        assert_eq!(text.len(), DayCell::CELL_WIDTH);
    }

    #[test]
    fn padding_cells_hide_markers() {
        let theme = Theme::default();
        let agenda = agenda();
        let cell = GridCell {
            date: ymd(2024, 4, 30),
            in_month: false,
        };
        let text = DayCell::new(cell, agenda.day(&cell.date), &theme).to_string();
        assert_eq!(text, " (30)    ");
    }

    #[test]
    fn month_view_layout() {
        let theme = Theme::default();
        let agenda = agenda();
        let grid = MonthGrid::new(MonthIndex::from(ymd(2024, 5, 1)));
        let text = MonthView::new(&grid, &agenda, ymd(2024, 5, 2), &theme)
            .focused(true)
            .to_string();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "> May 2024  [month-2024-05]");
        assert!(lines[1].starts_with(" Mon"));
        // header plus five weeks
        assert_eq!(lines.len(), 2 + grid.num_weeks());
        assert!(lines[2].contains(" 1 ES"));
        assert!(lines[2].contains("*  2"));
    }

    #[test]
    fn cell_tones() {
        let theme = Theme::default();
        let grid = MonthGrid::new(MonthIndex::from(ymd(2024, 5, 1)));
        let agenda = Agenda::default();
        let lines = MonthView::new(&grid, &agenda, ymd(2024, 5, 2), &theme)
            .select(Some(ymd(2024, 5, 3)))
            .lines();

        let first_week = &lines[MonthView::HEADER_ROWS];
        let tones: Vec<Tone> = first_week.iter().map(|span| span.tone).collect();
        assert_eq!(
            tones,
            vec![
                Tone::Padding,
                Tone::Padding,
                Tone::Plain,
                Tone::Today,
                Tone::Selected,
                Tone::Plain,
                Tone::Plain,
            ]
        );
        assert_eq!(lines[0][0].tone, Tone::Header);
    }

    #[test]
    fn window_lines_match_page_heights() {
        let theme = Theme::default();
        let agenda = agenda();
        // February 2021 fills exactly four weeks
        let window = MonthWindow::new(ymd(2021, 3, 10));
        let lines = window_lines(&window, &agenda, ymd(2021, 3, 10), None, &theme);

        let heights: Vec<usize> = window.grids().iter().map(page_height).collect();
        assert_eq!(heights[0], MonthView::HEADER_ROWS + 4 + 1);
        assert_eq!(lines.len(), heights.iter().sum::<usize>());
        assert!(lines[heights[0] - 1].is_empty());
        assert_eq!(line_text(&lines[heights[0]]), "> March 2021  [month-2021-03]");
    }

    #[test]
    fn show_output_ends_with_legend() {
        let theme = Theme::default();
        let agenda = agenda();
        let window = MonthWindow::new(ymd(2024, 5, 2));
        let text = render_window(&window, &agenda, ymd(2024, 5, 2), &theme);

        assert!(text.starts_with("  April 2024  [month-2024-04]\n"));
        assert!(text.contains("\n\n> May 2024  [month-2024-05]\n"));
        assert_eq!(text.lines().last(), Some(legend(&theme).as_str()));
        assert!(!text.lines().any(|line| line.ends_with(' ')));
    }
}
