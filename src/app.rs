use chrono::{Duration, NaiveDate};

use unsegen::base::Terminal;
use unsegen::input::{
    Behavior, EditBehavior, Input, Key, Navigatable, NavigateBehavior, OperationResult,
    ScrollBehavior, Scrollable,
};
use unsegen::widget::builtin::PromptLine;
use unsegen::widget::*;

use crate::cmds::{Cmd, CmdError};
use crate::config::Config;
use crate::datetime::MonthIndex;
use crate::events::{Dispatcher, Event};
use crate::feed::Feed;
use crate::ui::{legend, page_height, render_window, CalendarPane, DayPane, StatusLine, Theme};
use crate::window::{Expansion, MonthWindow, ScrollMetrics};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Command,
}

/// Terminal calendar: the month window on the left, the selected day on the
/// right, a status or prompt line at the bottom.
///
/// Scroll positions are counted in terminal rows. Every change of the
/// viewport is reported to the month window, which grows near either end.
pub struct App {
    feed: Feed,
    window: MonthWindow,
    theme: Theme,
    today: NaiveDate,
    selected: NaiveDate,
    top: usize,
    rows: usize,
    mode: Mode,
    command_line: PromptLine,
    status: Option<String>,
    running: bool,
}

impl App {
    const DEFAULT_ROWS: usize = 24;

    pub fn new(config: &Config, feed: Feed, today: NaiveDate) -> App {
        let window = MonthWindow::new(today).with_threshold(config.scroll_margin as f64);

        let mut app = App {
            feed,
            window,
            theme: Theme::default(),
            today,
            selected: today,
            top: 0,
            rows: Self::DEFAULT_ROWS,
            mode: Mode::Normal,
            command_line: PromptLine::with_prompt(":".to_owned()),
            status: None,
            running: true,
        };
        app.top = app.page_offset(app.window.focus());
        app
    }

    pub fn window(&self) -> &MonthWindow {
        &self.window
    }

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    pub fn top(&self) -> usize {
        self.top
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn load(&mut self) {
        log::info!("Fetching calendar data for '{}'", self.feed.viewer().user_id);
        self.feed.load();
    }

    /// Plain text rendering of the whole window, as printed by `--show`.
    pub fn render(&self) -> String {
        if self.feed.is_loading() {
            return "Loading...\n".to_owned();
        }
        render_window(&self.window, self.feed.agenda(), self.today, &self.theme)
    }

    pub fn content_height(&self) -> usize {
        self.window.grids().iter().map(page_height).sum()
    }

    /// First row of the page showing `month`.
    pub fn page_offset(&self, month: MonthIndex) -> usize {
        self.window
            .grids()
            .iter()
            .take_while(|grid| grid.month() < month)
            .map(page_height)
            .sum()
    }

    fn max_top(&self) -> usize {
        self.content_height().saturating_sub(self.rows)
    }

    fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics::new(
            self.top as f64,
            self.content_height() as f64,
            self.rows as f64,
        )
    }

    /// Reports the current viewport to the month window. A page added above
    /// shifts the viewport down by its height so the visible rows stay put.
    fn settle(&mut self) -> Expansion {
        let expansion = self.window.on_scroll(self.metrics());
        if expansion.backward {
            self.top += page_height(&self.window.grids()[0]);
        }
        expansion
    }

    /// Keeps loading months until the viewport is clear of both ends.
    fn fill(&mut self) {
        while self.settle().any() {}
    }

    /// Sets the number of rows available to the calendar pane.
    pub fn resize(&mut self, rows: usize) {
        self.rows = rows.max(1);
        self.top = self.top.min(self.max_top());
        self.fill();
    }

    pub fn scroll_by(&mut self, rows: i64) -> Expansion {
        let top = (self.top as i64 + rows).max(0) as usize;
        self.top = top.min(self.max_top());
        self.settle()
    }

    pub fn scroll_pages(&mut self, pages: i64) -> Expansion {
        let step = self.rows.saturating_sub(1).max(1) as i64;
        self.scroll_by(step * pages)
    }

    fn scroll_to(&mut self, month: MonthIndex) {
        // load the pages below first so `month` can reach the top row
        self.top = self.page_offset(month);
        self.fill();
        self.top = self.top.min(self.max_top());
    }

    pub fn select(&mut self, date: NaiveDate) {
        self.selected = date;
    }

    pub fn move_selection(&mut self, days: i64) {
        if let Some(date) = self.selected.checked_add_signed(Duration::days(days)) {
            self.selected = date;
        }
    }

    pub fn apply(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::Noop => {}
            Cmd::Today => {
                let request = self.window.jump_to_today(self.today);
                self.selected = self.today;
                self.scroll_to(request.month);
            }
            Cmd::PrevMonth => {
                let request = self.window.previous_month();
                self.scroll_to(request.month);
            }
            Cmd::NextMonth => {
                let request = self.window.next_month();
                self.scroll_to(request.month);
            }
            Cmd::Day(date) => self.select(date),
            Cmd::Exit => self.running = false,
        }
    }

    /// Runs one line of the `:` prompt.
    pub fn execute(&mut self, line: &str) -> Result<(), CmdError> {
        let cmd = line.parse::<Cmd>()?;
        self.apply(cmd);
        Ok(())
    }

    fn key_help(&self) -> String {
        format!(
            "q quit  : command  t today  [ ] month  h/j/k/l day  Up/Down scroll    {}",
            legend(&self.theme)
        )
    }

    fn as_widget<'w>(&'w self) -> impl Widget + 'w {
        let panes = HLayout::new()
            .widget(
                CalendarPane::new(&self.window, self.feed.agenda(), self.today, &self.theme)
                    .select(self.selected)
                    .scrolled_to(self.top)
                    .loading(self.feed.is_loading()),
            )
            .widget(DayPane::new(self.selected, self.feed.agenda(), &self.theme));

        let layout = VLayout::new().widget(panes);

        match self.mode {
            Mode::Command => layout.widget(self.command_line.as_widget()),
            Mode::Normal => layout.widget(StatusLine::new(
                self.status.as_deref().unwrap_or_default(),
                &self.theme,
            )),
        }
    }

    fn draw(&mut self, term: &mut Terminal) {
        let root = term.create_root_window();
        // the status line takes the last row
        let rows = (root.get_height().raw_value() - 1).max(1) as usize;
        if rows != self.rows {
            self.resize(rows);
        }

        self.as_widget().draw(root, RenderingHints::new());
        term.present();
    }

    fn handle_input(&mut self, input: Input) {
        if input.matches(Key::Esc) {
            self.mode = Mode::Normal;
            return;
        }

        match self.mode {
            Mode::Normal => {
                input
                    .chain((Key::Char('q'), || self.running = false))
                    .chain((Key::Char(':'), || self.mode = Mode::Command))
                    .chain((Key::Char('t'), || self.apply(Cmd::Today)))
                    .chain((Key::Char('['), || self.apply(Cmd::PrevMonth)))
                    .chain((Key::Char(']'), || self.apply(Cmd::NextMonth)))
                    .chain((Key::PageDown, || {
                        self.scroll_pages(1);
                    }))
                    .chain((Key::PageUp, || {
                        self.scroll_pages(-1);
                    }))
                    .chain(
                        NavigateBehavior::new(&mut DayCursor(self))
                            .down_on(Key::Char('j'))
                            .up_on(Key::Char('k'))
                            .left_on(Key::Char('h'))
                            .right_on(Key::Char('l')),
                    )
                    .chain(
                        ScrollBehavior::new(&mut PageScroll(self))
                            .forwards_on(Key::Down)
                            .backwards_on(Key::Up),
                    )
                    .finish();
            }
            Mode::Command => {
                input
                    .chain(CommandLine(self))
                    .chain(
                        EditBehavior::new(&mut self.command_line)
                            .delete_forwards_on(Key::Delete)
                            .delete_backwards_on(Key::Backspace)
                            .left_on(Key::Left)
                            .right_on(Key::Right),
                    )
                    .chain(
                        ScrollBehavior::new(&mut self.command_line)
                            .backwards_on(Key::Up)
                            .forwards_on(Key::Down),
                    )
                    .finish();
            }
        }
    }

    pub fn run(
        &mut self,
        dispatcher: Dispatcher,
        mut term: Terminal,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.status = Some(self.key_help());

        // show the loading screen while fetching
        self.draw(&mut term);
        self.load();
        self.fill();

        while self.running {
            self.draw(&mut term);

            match dispatcher.next()? {
                Event::Update => {}
                Event::Input(input) => self.handle_input(input),
            }
        }

        Ok(())
    }
}

/// Moves the selected day; up and down go by whole weeks.
struct DayCursor<'a>(&'a mut App);

impl Navigatable for DayCursor<'_> {
    fn move_down(&mut self) -> OperationResult {
        self.0.move_selection(7);
        Ok(())
    }

    fn move_left(&mut self) -> OperationResult {
        self.0.move_selection(-1);
        Ok(())
    }

    fn move_right(&mut self) -> OperationResult {
        self.0.move_selection(1);
        Ok(())
    }

    fn move_up(&mut self) -> OperationResult {
        self.0.move_selection(-7);
        Ok(())
    }
}

/// Scrolls the calendar pane row by row.
struct PageScroll<'a>(&'a mut App);

impl Scrollable for PageScroll<'_> {
    fn scroll_backwards(&mut self) -> OperationResult {
        self.0.scroll_by(-1);
        Ok(())
    }

    fn scroll_forwards(&mut self) -> OperationResult {
        self.0.scroll_by(1);
        Ok(())
    }
}

/// Runs the prompt line on enter.
struct CommandLine<'a>(&'a mut App);

impl Behavior for CommandLine<'_> {
    fn input(self, input: Input) -> Option<Input> {
        if !input.matches(Key::Char('\n')) {
            return Some(input);
        }

        let line = self.0.command_line.finish_line().to_owned();
        self.0.status = match self.0.execute(&line) {
            Ok(()) => Some(self.0.key_help()),
            Err(e) => {
                log::warn!("{}", e);
                Some(format!("error: {}", e))
            }
        };
        self.0.mode = Mode::Normal;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agenda::tests::event;
    use crate::datetime::CalendarTz;
    use crate::model::Viewer;
    use crate::provider::MemoryProvider;
    use chrono::Month;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn app() -> App {
        let provider = MemoryProvider {
            events: vec![event("e1", "2024-05-01")],
            ..MemoryProvider::default()
        };
        let feed = Feed::new(
            Box::new(provider),
            Viewer::new("staff1", false),
            CalendarTz::Local,
        );
        App::new(&Config::default(), feed, ymd(2024, 5, 15))
    }

    #[test]
    fn loading_screen_before_fetch() {
        let mut app = app();
        assert_eq!(app.render(), "Loading...\n");
        app.load();
        assert!(app.render().contains("> May 2024"));
    }

    #[test]
    fn opens_on_the_current_month() {
        let app = app();
        // April, May and June 2024 all take five weeks
        assert_eq!(app.content_height(), 3 * 8);
        assert_eq!(app.top(), 8);
        assert_eq!(app.top(), app.page_offset(MonthIndex::new(Month::May, 2024)));
        assert_eq!(app.selected(), ymd(2024, 5, 15));
    }

    #[test]
    fn scrolling_down_loads_later_months() {
        let mut app = app();
        app.resize(10);
        assert_eq!(app.window().len(), 3);

        // 9 rows above, 24 - 19 = 5 below
        assert!(!app.scroll_by(1).any());
        // 4 rows below reaches the margin
        assert!(app.scroll_by(1).forward);
        assert_eq!(app.window().last(), MonthIndex::new(Month::July, 2024));
        assert_eq!(app.content_height(), 4 * 8);
        assert_eq!(app.top(), 10);
    }

    #[test]
    fn scrolling_up_keeps_the_view_steady() {
        let mut app = app();
        app.resize(10);

        let expansion = app.scroll_by(-5);
        assert!(expansion.backward && !expansion.forward);
        assert_eq!(app.window().first(), MonthIndex::new(Month::March, 2024));
        // still showing the same row of April, now one page further down
        assert_eq!(app.top(), 3 + 8);

        let mut len = app.window().len();
        for _ in 0..40 {
            app.scroll_pages(-1);
            assert!(app.window().len() >= len);
            len = app.window().len();
        }
        assert!(app.top() > 0);
        assert!(app.window().first() < MonthIndex::new(Month::January, 2024));
    }

    #[test]
    fn small_window_fills_the_screen() {
        let mut app = app();
        app.resize(40);
        assert!(app.content_height() >= app.top() + 40 + 4);
        assert!(app.top() >= 4);
        assert!(app.window().contains(&MonthIndex::new(Month::May, 2024)));
    }

    #[test]
    fn month_commands_scroll_to_the_page() {
        let mut app = app();
        app.load();
        app.resize(10);

        app.execute("next").unwrap();
        let june = MonthIndex::new(Month::June, 2024);
        assert_eq!(app.window().focus(), june);
        assert_eq!(app.top(), app.page_offset(june));

        app.execute("prev").unwrap();
        app.execute("prev").unwrap();
        let april = MonthIndex::new(Month::April, 2024);
        assert_eq!(app.window().focus(), april);
        assert_eq!(app.top(), app.page_offset(april));

        app.select(ymd(2024, 4, 2));
        app.execute("today").unwrap();
        assert_eq!(app.window().focus(), MonthIndex::new(Month::May, 2024));
        assert_eq!(app.selected(), ymd(2024, 5, 15));
    }

    #[test]
    fn prompt_commands() {
        let mut app = app();
        app.load();

        app.execute("day 2024-05-01").unwrap();
        assert_eq!(app.selected(), ymd(2024, 5, 1));

        let err = app.execute("bogus").unwrap_err();
        assert_eq!(err.to_string(), "unknown command 'bogus'");
        assert!(app.is_running());

        app.execute("q").unwrap();
        assert!(!app.is_running());
    }

    #[test]
    fn day_cursor_moves_by_days_and_weeks() {
        let mut app = app();

        DayCursor(&mut app).move_right().unwrap();
        assert_eq!(app.selected(), ymd(2024, 5, 16));
        DayCursor(&mut app).move_down().unwrap();
        assert_eq!(app.selected(), ymd(2024, 5, 23));
        DayCursor(&mut app).move_up().unwrap();
        DayCursor(&mut app).move_left().unwrap();
        assert_eq!(app.selected(), ymd(2024, 5, 15));

        app.select(NaiveDate::MAX);
        app.move_selection(1);
        assert_eq!(app.selected(), NaiveDate::MAX);
    }

    #[test]
    fn row_scrolling_behaviour() {
        let mut app = app();
        app.resize(10);

        PageScroll(&mut app).scroll_forwards().unwrap();
        assert_eq!(app.top(), 9);
        PageScroll(&mut app).scroll_backwards().unwrap();
        assert_eq!(app.top(), 8);
        assert_eq!(app.mode(), Mode::Normal);
    }
}
