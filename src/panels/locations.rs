use ratatui::{layout::Rect, text::Line, Frame};

use crate::app::Shell;
use crate::panels::render_list;
use crate::ui::{dim_line, list_line, nothing_line, section_line, text_line};

pub fn render(f: &mut Frame, area: Rect, shell: &Shell) {
    let theme = &shell.theme;
    let locations = shell.content.locations();
    if locations.is_empty() {
        render_list(f, area, vec![nothing_line(theme)], 0);
        return;
    }
    let selected = shell.views.lieux.get(locations.len());
    let mut lines = Vec::new();
    let mut focus = 0;
    for (i, location) in locations.iter().enumerate() {
        let open = shell.views.lieux_acc.is_open(i);
        if selected == Some(i) {
            focus = lines.len();
        }
        lines.push(list_line(
            format!("{} {}", if open { "▼" } else { "▶" }, location.name),
            selected == Some(i),
            theme,
        ));
        if open {
            if !location.summary.is_empty() {
                lines.push(text_line(format!("      {}", location.summary), theme));
            }
            let zones: Vec<&str> = location.zones.iter().map(|z| z.name.as_str()).collect();
            lines.push(dim_line(
                format!("      {} zone(s) : {}", zones.len(), zones.join(", ")),
                theme,
            ));
        }
    }
    render_list(f, area, lines, focus);
}

pub fn render_location(f: &mut Frame, area: Rect, shell: &Shell) {
    let theme = &shell.theme;
    let Some(location) = shell
        .views
        .location
        .as_deref()
        .and_then(|id| shell.content.location(id))
    else {
        render_list(f, area, vec![nothing_line(theme)], 0);
        return;
    };

    let mut lines = vec![section_line(location.name.clone(), theme)];
    if !location.summary.is_empty() {
        lines.push(text_line(location.summary.clone(), theme));
    }
    lines.push(Line::from(""));
    if location.zones.is_empty() {
        lines.push(nothing_line(theme));
    }
    let selected = shell.views.zones.get(location.zones.len());
    let mut focus = 0;
    for (i, zone) in location.zones.iter().enumerate() {
        let open = shell.views.zones_acc.is_open(i);
        if selected == Some(i) {
            focus = lines.len();
        }
        lines.push(list_line(
            format!("{} {}", if open { "▼" } else { "▶" }, zone.name),
            selected == Some(i),
            theme,
        ));
        if open {
            let text = if zone.description.is_empty() {
                "Aucune information."
            } else {
                zone.description.as_str()
            };
            lines.push(dim_line(format!("      {text}"), theme));
        }
    }
    render_list(f, area, lines, focus);
}
