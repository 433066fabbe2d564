use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Timelike};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::color::Theme;
use crate::config::{DAYS_OF_WEEK, MONTHS_OF_YEAR};
use crate::ui::sel_style;

// ── Clock text ────────────────────────────────────────────────────────────────

/// "Lundi 19 Octobre 2026"
pub fn long_date(date: NaiveDate) -> String {
    let day_name = DAYS_OF_WEEK[date.weekday().num_days_from_sunday() as usize];
    let month_name = MONTHS_OF_YEAR[date.month0() as usize];
    format!("{day_name} {} {month_name} {}", date.day(), date.year())
}

pub fn clock_hms<Tz: TimeZone>(now: &DateTime<Tz>) -> String {
    format!("{:02}:{:02}:{:02}", now.hour(), now.minute(), now.second())
}

/// Chat timestamps.
pub fn clock_hm() -> String {
    let now = Local::now();
    format!("{:02}:{:02}", now.hour(), now.minute())
}

// ── Status bar ────────────────────────────────────────────────────────────────

pub fn render_status_bar(f: &mut Frame, area: Rect, theme: &Theme, extra: &str) {
    if area.height == 0 {
        return;
    }

    let now = Local::now();
    let left_text = format!(" {}", long_date(now.date_naive()));
    let right_text = format!("{}{} ", extra, clock_hms(&now));

    let used = left_text.chars().count() + right_text.chars().count();
    let pad = " ".repeat((area.width as usize).saturating_sub(used));

    let line = Line::from(vec![
        Span::styled(left_text, sel_style(theme)),
        Span::styled(pad, sel_style(theme)),
        Span::styled(right_text, sel_style(theme)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn long_date_is_french() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        assert_eq!(long_date(date), "Samedi 14 Mars 2026");
    }

    #[test]
    fn clock_pads_fields() {
        let t = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(clock_hms(&t), "03:04:05");
    }
}
