use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::Shell;
use crate::chat::Sender;
use crate::color::Theme;
use crate::content::Character;
use crate::panels::{render_list, render_page};
use crate::ui::{
    alert_style, dim_line, dim_style, list_line, normal_style, nothing_line, section_line,
    text_line, title_style,
};

const STAT_BAR: usize = 20;

fn availability_span(character: &Character, theme: &Theme) -> Span<'static> {
    let label = if character.availability.is_empty() {
        "Indisponible".to_string()
    } else {
        character.availability.clone()
    };
    if character.is_online() {
        Span::styled(format!("● {label}"), title_style(theme))
    } else {
        Span::styled(format!("○ {label}"), dim_style(theme))
    }
}

pub fn render(f: &mut Frame, area: Rect, shell: &Shell) {
    let theme = &shell.theme;
    let characters = shell.content.characters();
    if characters.is_empty() {
        render_list(f, area, vec![nothing_line(theme)], 0);
        return;
    }
    let selected = shell.views.members.get(characters.len());
    let lines: Vec<Line> = characters
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let mut line = list_line(format!("{:<24} {}", c.name, c.title), selected == Some(i), theme);
            line.spans.push(Span::raw("  "));
            line.spans.push(availability_span(c, theme));
            line
        })
        .collect();
    render_list(f, area, lines, selected.unwrap_or(0));
}

fn stat_line(name: &str, value: u32, theme: &Theme) -> Line<'static> {
    let filled = (value.min(100) as usize * STAT_BAR) / 100;
    Line::from(vec![
        Span::styled(format!("  {name:<16}"), normal_style(theme)),
        Span::styled("█".repeat(filled), title_style(theme)),
        Span::styled("░".repeat(STAT_BAR - filled), dim_style(theme)),
        Span::styled(format!(" {value}%"), normal_style(theme)),
    ])
}

pub fn render_character(f: &mut Frame, area: Rect, shell: &Shell) {
    let theme = &shell.theme;
    let Some(c) = shell.views.character.and_then(|id| shell.content.character(id)) else {
        render_list(f, area, vec![nothing_line(theme)], 0);
        return;
    };

    let mut lines = vec![
        section_line(c.name.clone(), theme),
        text_line(c.title.clone(), theme),
        Line::from(vec![
            availability_span(c, theme),
            Span::styled(
                if c.location.is_empty() { String::new() } else { format!("   @ {}", c.location) },
                normal_style(theme),
            ),
        ]),
        Line::from(Span::styled("[Enter] Envoyer un message", alert_style())),
        Line::from(""),
    ];

    let mut section = |title: &str, body: Vec<Line<'static>>| {
        if body.is_empty() {
            return;
        }
        lines.push(section_line(title.to_string(), theme));
        lines.extend(body);
        lines.push(Line::from(""));
    };

    let prose = |text: &str| -> Vec<Line<'static>> {
        text.lines().map(|l| text_line(format!("  {l}"), theme)).collect()
    };
    section("Rôle", prose(&c.role));
    section("Biographie", prose(&c.bio));
    section(
        "Spécialités",
        if c.specialites.is_empty() {
            Vec::new()
        } else {
            vec![text_line(format!("  {}", c.specialites.join(" · ")), theme)]
        },
    );
    section(
        "Statistiques",
        c.stats.iter().map(|(k, v)| stat_line(k, *v, theme)).collect(),
    );
    section(
        "Compétences",
        c.skills.iter().map(|s| text_line(format!("  ✦ {s}"), theme)).collect(),
    );
    section(
        "Accomplissements",
        c.achievements.iter().map(|a| text_line(format!("  {a}"), theme)).collect(),
    );
    if !c.quote.is_empty() {
        lines.push(dim_line(format!("« {} »", c.quote), theme));
    }

    render_page(f, area, lines, shell.views.scroll);
}

pub fn render_chat(f: &mut Frame, area: Rect, shell: &Shell) {
    let theme = &shell.theme;
    let partner = shell.chat.current();
    let character = partner.and_then(|id| shell.content.character(id));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1), Constraint::Length(3)])
        .split(area);

    let who = character.map_or("Messagerie".to_string(), |c| format!("{} · {}", c.name, c.title));
    f.render_widget(Paragraph::new(section_line(who, theme)), rows[0]);

    let history = partner.map(|id| shell.chat.history(id)).unwrap_or(&[]);
    let name = character.map_or("?", |c| c.name.as_str());
    let mut lines = Vec::new();
    if history.is_empty() {
        lines.push(nothing_line(theme));
    }
    for message in history {
        let (speaker, style) = match message.from {
            Sender::User => ("Vous", title_style(theme)),
            Sender::Character => (name, normal_style(theme)),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("[{}] ", message.time), dim_style(theme)),
            Span::styled(format!("{speaker}: "), style),
            Span::styled(message.text.clone(), normal_style(theme)),
        ]));
    }
    if shell.chat.has_pending() {
        lines.push(dim_line(format!("{name} écrit…"), theme));
    }
    let last = lines.len().saturating_sub(1);
    render_list(f, rows[1], lines, last);

    let input = Paragraph::new(Line::from(vec![
        Span::styled("> ", title_style(theme)),
        Span::styled(format!("{}█", shell.views.chat_input), normal_style(theme)),
    ]))
    .block(Block::default().borders(Borders::ALL).border_style(dim_style(theme)));
    f.render_widget(input, rows[2]);
}
