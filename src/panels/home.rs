use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    Frame,
};

use crate::app::Shell;
use crate::color::Theme;
use crate::config::FLASH_FEED_LEN;
use crate::content::FlashNews;
use crate::media::format_time;
use crate::nav::PanelId;
use crate::panels::render_list;
use crate::status::long_date;
use crate::ui::{
    alert_style, centered_rect, dim_line, list_line, nothing_line, normal_style, render_modal,
    section_line, sel_style, text_line,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeEntry {
    Panel(PanelId),
    Commander,
}

impl HomeEntry {
    pub fn label(self) -> &'static str {
        match self {
            HomeEntry::Panel(panel) => panel.title(),
            HomeEntry::Commander => "Messages du Commandant",
        }
    }
}

pub const HOME_ENTRIES: [HomeEntry; 8] = [
    HomeEntry::Panel(PanelId::Membres),
    HomeEntry::Panel(PanelId::Calendrier),
    HomeEntry::Panel(PanelId::Lieux),
    HomeEntry::Panel(PanelId::EaNexus),
    HomeEntry::Panel(PanelId::Flash),
    HomeEntry::Panel(PanelId::Carte),
    HomeEntry::Panel(PanelId::Parametres),
    HomeEntry::Commander,
];

/// Up to `FLASH_FEED_LEN` headlines, urgent ones flagged.
pub(crate) fn flash_feed(news: &[FlashNews], theme: &Theme) -> Vec<Line<'static>> {
    if news.is_empty() {
        return vec![nothing_line(theme)];
    }
    news.iter().take(FLASH_FEED_LEN).map(|n| flash_line(n, theme)).collect()
}

fn flash_line(news: &FlashNews, theme: &Theme) -> Line<'static> {
    let mut spans = vec![Span::styled(format!("  {:>5}  ", news.time), normal_style(theme))];
    if news.urgent {
        spans.push(Span::styled("URGENT ", alert_style()));
    }
    spans.push(Span::styled(news.title.clone(), normal_style(theme)));
    Line::from(spans)
}

pub fn render(f: &mut Frame, area: Rect, shell: &Shell) {
    let theme = &shell.theme;
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let mut menu = vec![
        section_line("Bienvenue dans la Hourglass Society", theme),
        dim_line(long_date(shell.today), theme),
        Line::from(""),
    ];
    let selected = shell.views.home.get(HOME_ENTRIES.len());
    for (i, entry) in HOME_ENTRIES.iter().enumerate() {
        menu.push(list_line(entry.label(), selected == Some(i), theme));
    }
    render_list(f, cols[0], menu, selected.map_or(0, |i| i + 3));

    let messages = shell.content.commander_messages().len();
    let mut side = vec![section_line("Flash info", theme)];
    side.extend(flash_feed(shell.content.flash_news(), theme));
    side.push(Line::from(""));
    side.push(section_line("Commandant", theme));
    if messages > 0 {
        side.push(Line::from(Span::styled(
            format!("  ● {messages} message(s) chiffré(s) - appuyez sur c"),
            alert_style(),
        )));
    } else {
        side.push(nothing_line(theme));
    }
    render_list(f, cols[1], side, 0);

    if shell.views.commander_open {
        render_commander(f, area, shell);
    }
}

fn render_commander(f: &mut Frame, area: Rect, shell: &Shell) {
    let theme = &shell.theme;
    let messages = shell.content.commander_messages();
    let mut lines = Vec::new();
    if messages.is_empty() {
        lines.push(nothing_line(theme));
    }
    let selected = shell.views.commander.get(messages.len());
    for (i, message) in messages.iter().enumerate() {
        let marker = if shell.views.commander_acc.is_open(i) { "▼" } else { "▶" };
        lines.push(list_line(
            format!("{marker} {}", message.title),
            selected == Some(i),
            theme,
        ));
        if shell.views.commander_acc.is_open(i) {
            let state = if shell.commander.is_playing(i) { "lecture" } else { "pause" };
            let total = message.duration.map(format_time).unwrap_or_else(|| "--:--".into());
            lines.push(dim_line(format!("      {}", message.timestamp), theme));
            lines.push(text_line(
                format!(
                    "      [{state}] {} / {total}",
                    format_time(shell.commander.position(i))
                ),
                theme,
            ));
            for row in message.transcript.lines() {
                lines.push(text_line(format!("      {row}"), theme));
            }
        }
    }
    let modal = centered_rect(area.width.saturating_sub(8).max(40), area.height.saturating_sub(2), area);
    render_modal(f, modal, "Messages du Commandant", lines, theme);
}

/// Full flash feed.
pub fn render_flash(f: &mut Frame, area: Rect, shell: &Shell) {
    let theme = &shell.theme;
    let news = shell.content.flash_news();
    if news.is_empty() {
        render_list(f, area, vec![nothing_line(theme)], 0);
        return;
    }
    let selected = shell.views.flash.get(news.len()).unwrap_or(0);
    let lines: Vec<Line> = news
        .iter()
        .enumerate()
        .map(|(i, n)| {
            let mut line = flash_line(n, theme);
            if i == selected {
                line = line.patch_style(sel_style(theme));
            }
            line
        })
        .collect();
    render_list(f, area, lines, selected);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use crate::content::tests::sample_source;
    use crate::panels::tests::screen;

    #[test]
    fn feed_is_capped() {
        let app = test_app(&sample_source());
        let feed = flash_feed(app.shell.content.flash_news(), &app.shell.theme);
        assert_eq!(feed.len(), FLASH_FEED_LEN);
    }

    #[test]
    fn home_lists_entries_and_commander_badge() {
        let app = test_app(&sample_source());
        let text = screen(&app);
        assert!(text.contains("Membres"));
        assert!(text.contains("2 message(s)"));
        assert!(text.contains("URGENT"));
    }

    #[test]
    fn commander_modal_shows_transcript_when_expanded() {
        let mut app = test_app(&sample_source());
        app.shell.views.commander_open = true;
        app.shell.views.commander_acc.toggle(0);
        let text = screen(&app);
        assert!(text.contains("Briefing"));
        assert!(text.contains("Agents..."));
        assert!(text.contains("0:10"));
    }
}
