use chrono::NaiveDate;
use unsegen::base::*;
use unsegen::widget::*;

use crate::agenda::Agenda;
use crate::grid::MonthGrid;
use crate::window::MonthWindow;

use super::month_view::{window_lines, DayCell, Span, Tone};
use super::{draw_lines, Theme};

/// Every month page of the window stacked vertically, scrolled by `top` rows.
pub struct CalendarPane<'a> {
    months: &'a MonthWindow,
    agenda: &'a Agenda,
    today: NaiveDate,
    selected: Option<NaiveDate>,
    top: usize,
    loading: bool,
    theme: &'a Theme,
}

impl<'a> CalendarPane<'a> {
    pub fn new(
        months: &'a MonthWindow,
        agenda: &'a Agenda,
        today: NaiveDate,
        theme: &'a Theme,
    ) -> Self {
        CalendarPane {
            months,
            agenda,
            today,
            selected: None,
            top: 0,
            loading: false,
            theme,
        }
    }

    pub fn select(mut self, date: NaiveDate) -> Self {
        self.selected = Some(date);
        self
    }

    pub fn scrolled_to(mut self, top: usize) -> Self {
        self.top = top;
        self
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }
}

impl Widget for CalendarPane<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::exact(MonthGrid::COLUMNS * DayCell::CELL_WIDTH),
            height: RowDemand::at_least(1),
        }
    }

    fn draw(&self, window: Window, _hints: RenderingHints) {
        if self.loading {
            draw_lines(window, &[vec![Span::new("Loading...", Tone::Plain)]], self.theme);
            return;
        }

        let height = window.get_height().raw_value().max(0) as usize;
        let lines = window_lines(
            self.months,
            self.agenda,
            self.today,
            self.selected,
            self.theme,
        );

        let end = (self.top + height).min(lines.len());
        let start = self.top.min(end);
        draw_lines(window, &lines[start..end], self.theme);
    }
}

/// Bottom line: the prompt's last result or the key help.
pub struct StatusLine<'a> {
    text: &'a str,
    theme: &'a Theme,
}

impl<'a> StatusLine<'a> {
    pub fn new(text: &'a str, theme: &'a Theme) -> Self {
        StatusLine { text, theme }
    }
}

impl Widget for StatusLine<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::at_least(1),
            height: RowDemand::exact(1),
        }
    }

    fn draw(&self, window: Window, _hints: RenderingHints) {
        draw_lines(window, &[vec![Span::new(self.text, Tone::Status)]], self.theme);
    }
}
