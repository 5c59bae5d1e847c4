use chrono::{Datelike, Duration, NaiveDate};

use crate::datetime::MonthIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub date: NaiveDate,
    /// `false` for the padding days borrowed from the adjacent months.
    pub in_month: bool,
}

/// Day grid of one month page: whole weeks from Monday to Sunday.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthGrid {
    month: MonthIndex,
    leading: usize,
    trailing: usize,
    cells: Vec<GridCell>,
}

impl MonthGrid {
    pub const COLUMNS: usize = 7;

    pub fn new(month: MonthIndex) -> Self {
        let first = month.first_day();
        let last = month.last_day();

        let leading = first.weekday().num_days_from_monday() as usize;
        let trailing = (Self::COLUMNS - last.weekday().num_days_from_sunday() as usize)
            % Self::COLUMNS;

        let start = first - Duration::days(leading as i64);
        let len = leading + month.num_days() as usize + trailing;

        let cells = start
            .iter_days()
            .take(len)
            .map(|date| GridCell {
                date,
                in_month: month.contains(&date),
            })
            .collect();

        MonthGrid {
            month,
            leading,
            trailing,
            cells,
        }
    }

    pub fn month(&self) -> MonthIndex {
        self.month
    }

    /// Number of days borrowed from the previous month.
    pub fn leading(&self) -> usize {
        self.leading
    }

    /// Number of days borrowed from the next month.
    pub fn trailing(&self) -> usize {
        self.trailing
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn weeks(&self) -> impl Iterator<Item = &[GridCell]> {
        self.cells.chunks(Self::COLUMNS)
    }

    pub fn num_weeks(&self) -> usize {
        self.cells.len() / Self::COLUMNS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Month, Weekday};

    fn grid(year: i32, month: u32) -> MonthGrid {
        MonthGrid::new(MonthIndex::from_ym(year, month).unwrap())
    }

    #[test]
    fn wednesday_start_pads_two_days() {
        // May 2024 starts on a Wednesday and ends on a Friday
        let may = grid(2024, 5);
        assert_eq!(may.leading(), 2);
        assert_eq!(may.trailing(), 2);
        assert_eq!(may.cells()[0].date, NaiveDate::from_ymd_opt(2024, 4, 29).unwrap());
        assert!(!may.cells()[0].in_month);
        assert!(may.cells()[2].in_month);
    }

    #[test]
    fn thursday_end_pads_three_days() {
        // February 2024 starts and ends on a Thursday
        let feb = grid(2024, 2);
        assert_eq!(feb.leading(), 3);
        assert_eq!(feb.trailing(), 3);
        assert_eq!(feb.cells().len(), 35);
        let last = feb.cells().last().unwrap();
        assert_eq!(last.date, NaiveDate::from_ymd_opt(2024, 3, 3).unwrap());
        assert!(!last.in_month);
    }

    #[test]
    fn exact_weeks_need_no_padding() {
        // February 2021 runs from Monday the 1st to Sunday the 28th
        let feb = grid(2021, 2);
        assert_eq!(feb.leading(), 0);
        assert_eq!(feb.trailing(), 0);
        assert_eq!(feb.num_weeks(), 4);
        assert!(feb.cells().iter().all(|c| c.in_month));
    }

    #[test]
    fn every_month_forms_whole_weeks() {
        let mut month = MonthIndex::new(Month::January, 2023);
        for _ in 0..36 {
            let grid = MonthGrid::new(month);
            assert_eq!(grid.cells().len() % MonthGrid::COLUMNS, 0);
            assert_eq!(
                grid.cells().iter().filter(|c| c.in_month).count(),
                month.num_days() as usize
            );
            for week in grid.weeks() {
                assert_eq!(week[0].date.weekday(), Weekday::Mon);
                assert_eq!(week[6].date.weekday(), Weekday::Sun);
            }
            month = month.next();
        }
    }
}
