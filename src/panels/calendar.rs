use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    Frame,
};

use crate::app::Shell;
use crate::config::DAY_HEADERS;
use crate::panels::home::flash_feed;
use crate::panels::{render_list, render_page};
use crate::ui::{
    dim_line, dim_style, list_line, nothing_line, normal_style, section_line, sel_style, text_line,
    title_style,
};

const CELL: usize = 5;

pub fn render(f: &mut Frame, area: Rect, shell: &Shell) {
    let theme = &shell.theme;
    let view = &shell.views.calendar;
    let grid = view.grid(shell.today, shell.content.events());

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length((CELL * 7 + 2) as u16), Constraint::Min(10)])
        .split(area);

    let mut lines = vec![
        section_line(format!("◀  {}  ▶", view.title()), theme),
        Line::from(""),
        Line::from(
            DAY_HEADERS
                .iter()
                .map(|d| Span::styled(format!("{d:^CELL$}"), title_style(theme)))
                .collect::<Vec<_>>(),
        ),
    ];

    let mut week: Vec<Span> = (0..grid.leading_blanks)
        .map(|_| Span::raw(" ".repeat(CELL)))
        .collect();
    for cell in &grid.days {
        let mark = if cell.has_event { "•" } else { " " };
        let text = format!(" {:>2}{mark} ", cell.day);
        let mut style = if cell.has_event {
            title_style(theme)
        } else {
            normal_style(theme)
        };
        if cell.today {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        if view.selected_day() == Some(cell.day) {
            style = sel_style(theme);
        }
        week.push(Span::styled(text, style));
        if week.len() == 7 {
            lines.push(Line::from(std::mem::take(&mut week)));
        }
    }
    if !week.is_empty() {
        lines.push(Line::from(week));
    }
    lines.push(Line::from(""));
    lines.push(section_line("Flash info", theme));
    lines.extend(flash_feed(shell.content.flash_news(), theme));
    render_list(f, cols[0], lines, 0);

    let mut side = Vec::new();
    match view.selected_date() {
        None => side.push(dim_line("Choisissez un jour avec les flèches.", theme)),
        Some(date) => {
            side.push(section_line(format!("Événements du {}", date.format("%d/%m/%Y")), theme));
            let events = shell.content.events_on(date);
            if events.is_empty() {
                side.push(nothing_line(theme));
            }
            let selected = shell.views.day_events.get(events.len());
            for (i, event) in events.iter().enumerate() {
                let time = if event.time.is_empty() { "--:--" } else { event.time.as_str() };
                side.push(list_line(
                    format!("{time}  {}", event.title),
                    selected == Some(i),
                    theme,
                ));
                if !event.character_name.is_empty() {
                    side.push(dim_line(format!("           par {}", event.character_name), theme));
                }
            }
        }
    }
    render_list(f, cols[1], side, 0);
}

pub fn render_event(f: &mut Frame, area: Rect, shell: &Shell) {
    let theme = &shell.theme;
    let Some(event) = shell.views.event.and_then(|id| shell.content.event(id)) else {
        render_list(f, area, vec![nothing_line(theme)], 0);
        return;
    };
    let organiser = event.character_id.and_then(|id| shell.content.character(id));
    let organiser_name = if event.character_name.is_empty() {
        organiser.map(|c| c.name.as_str()).unwrap_or("Organisateur")
    } else {
        event.character_name.as_str()
    };
    let organiser_title = organiser.map(|c| c.title.as_str()).unwrap_or("Organisateur");

    let mut lines = vec![
        section_line(event.title.clone(), theme),
        Line::from(vec![
            Span::styled(format!("{}  ", event.date), normal_style(theme)),
            Span::styled(event.time.clone(), normal_style(theme)),
        ]),
        Line::from(""),
        text_line(format!("{organiser_name} · {organiser_title}"), theme),
    ];
    if !event.category.is_empty() {
        let name = shell
            .content
            .category(&event.category)
            .map_or(event.category.as_str(), |c| c.name.as_str());
        lines.push(Line::from(Span::styled(
            format!("Catégorie : {name}   [v] voir les projets"),
            dim_style(theme),
        )));
    }
    lines.push(Line::from(""));
    let description = if event.description.is_empty() {
        "Pas de description."
    } else {
        event.description.as_str()
    };
    lines.extend(description.lines().map(|l| text_line(l.to_string(), theme)));
    render_page(f, area, lines, shell.views.scroll);
}

#[cfg(test)]
mod tests {
    use crate::app::tests::test_app;
    use crate::content::tests::sample_source;
    use crate::nav::PanelId;
    use crate::panels::tests::screen;

    #[test]
    fn month_title_and_day_events_are_drawn() {
        let mut app = test_app(&sample_source());
        app.go(PanelId::Calendrier);
        app.shell.move_day(0);
        let text = screen(&app);
        assert!(text.contains("Mars 2026"));
        assert!(text.contains("Dim"));
        assert!(text.contains("Lancement"));
        assert!(text.contains("par Aria CodeWeaver"));
    }

    #[test]
    fn event_detail_shows_organiser() {
        let mut app = test_app(&sample_source());
        app.shell.views.event = Some(1);
        app.go(PanelId::EventDetail);
        let text = screen(&app);
        assert!(text.contains("Lancement"));
        assert!(text.contains("Architecte"));
        assert!(text.contains("Ouverture"));
    }
}
