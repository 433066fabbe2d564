//! Month grid for the calendar panel.

use chrono::{Datelike, NaiveDate};

use crate::config::MONTHS_OF_YEAR;
use crate::content::Event;

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(30)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub day: u32,
    pub date: NaiveDate,
    pub today: bool,
    pub has_event: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    /// Empty cells before the 1st, weeks starting on Sunday.
    pub leading_blanks: u32,
    pub days: Vec<DayCell>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarView {
    year: i32,
    month: u32,
    selected: Option<u32>,
}

impl CalendarView {
    pub fn starting_at(today: NaiveDate) -> Self {
        Self {
            year: today.year(),
            month: today.month(),
            selected: None,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// "Mars 2026"
    pub fn title(&self) -> String {
        let name = MONTHS_OF_YEAR
            .get(self.month as usize - 1)
            .copied()
            .unwrap_or("?");
        format!("{} {}", name, self.year)
    }

    pub fn prev_month(&mut self) {
        if self.month == 1 {
            self.month = 12;
            self.year -= 1;
        } else {
            self.month -= 1;
        }
        self.selected = None;
    }

    pub fn next_month(&mut self) {
        if self.month == 12 {
            self.month = 1;
            self.year += 1;
        } else {
            self.month += 1;
        }
        self.selected = None;
    }

    /// Selects `day` of the displayed month; out-of-range days are ignored.
    pub fn select_day(&mut self, day: u32) {
        if (1..=days_in_month(self.year, self.month)).contains(&day) {
            self.selected = Some(day);
        }
    }

    pub fn selected_day(&self) -> Option<u32> {
        self.selected
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected
            .and_then(|d| NaiveDate::from_ymd_opt(self.year, self.month, d))
    }

    pub fn grid(&self, today: NaiveDate, events: &[Event]) -> MonthGrid {
        let leading_blanks = NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|first| first.weekday().num_days_from_sunday())
            .unwrap_or(0);
        let days = (1..=days_in_month(self.year, self.month))
            .filter_map(|day| NaiveDate::from_ymd_opt(self.year, self.month, day))
            .map(|date| DayCell {
                day: date.day(),
                date,
                today: date == today,
                has_event: events.iter().any(|e| e.day() == Some(date)),
            })
            .collect();
        MonthGrid { leading_blanks, days }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::tests::{loaded_repository, sample_source};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2026, 2), 28);
        assert_eq!(days_in_month(2026, 12), 31);
        assert_eq!(days_in_month(2026, 4), 30);
    }

    #[test]
    fn navigation_wraps_years_and_clears_selection() {
        let mut view = CalendarView::starting_at(date(2026, 1, 10));
        view.select_day(5);
        view.prev_month();
        assert_eq!((view.year(), view.month()), (2025, 12));
        assert_eq!(view.selected_day(), None);
        view.next_month();
        view.next_month();
        assert_eq!((view.year(), view.month()), (2026, 2));
        assert_eq!(view.title(), "Février 2026");
    }

    #[test]
    fn grid_marks_today_and_events() {
        let repo = loaded_repository(&sample_source());
        let today = date(2026, 3, 20);
        let view = CalendarView::starting_at(today);
        let grid = view.grid(today, repo.events());
        // 1 March 2026 is a Sunday.
        assert_eq!(grid.leading_blanks, 0);
        assert_eq!(grid.days.len(), 31);
        let flagged: Vec<u32> = grid.days.iter().filter(|c| c.has_event).map(|c| c.day).collect();
        assert_eq!(flagged, vec![14, 20]);
        assert!(grid.days[19].today);
        assert_eq!(grid.days.iter().filter(|c| c.today).count(), 1);
    }

    #[test]
    fn leading_blanks_follow_first_weekday() {
        // 1 October 2026 is a Thursday.
        let view = CalendarView::starting_at(date(2026, 10, 19));
        assert_eq!(view.grid(date(2026, 10, 19), &[]).leading_blanks, 4);
    }

    #[test]
    fn selection_rejects_days_outside_month() {
        let mut view = CalendarView::starting_at(date(2026, 2, 1));
        view.select_day(30);
        assert_eq!(view.selected_day(), None);
        view.select_day(28);
        assert_eq!(view.selected_date(), Some(date(2026, 2, 28)));
    }
}
