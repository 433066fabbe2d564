use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::Shell;
use crate::panels::render_list;
use crate::ui::{dim_style, list_line, section_line, text_line, title_style};

/// Island zones as `(id, title, description)`.
pub const MAP_ZONES: [(&str, &str, &str); 6] = [
    (
        "nexus",
        "Nexus Central",
        "Cœur névralgique de Hourglass Society. Centre de commandement et de coordination où toutes les décisions importantes sont prises. Accès réservé aux membres autorisés.",
    ),
    (
        "creative",
        "Zone Créative",
        "Espace dédié aux arts et à la création. Studios d'animation, ateliers de design et salles d'écriture narrative. Luna et Kael y travaillent quotidiennement.",
    ),
    (
        "tech",
        "Hub Technologique",
        "Laboratoires de développement et serveurs de calcul. Aria et Iris y conçoivent les systèmes les plus avancés de la société.",
    ),
    (
        "leisure",
        "Zone Loisirs",
        "Arènes de jeux, espaces de détente et salles de projection. Le lieu préféré de Zephyr pour tester les nouveaux jeux d'affrontement.",
    ),
    (
        "archives",
        "Archives",
        "Bibliothèque numérique contenant toutes les histoires, projets et tutoriels de la société. Gardée par Titan pour assurer la sécurité des données.",
    ),
    (
        "port",
        "Port d'Accès",
        "Point d'entrée unique de l'île. C'est ici que vous avez été interrogé par NEXUS-PRIME lors de votre infiltration.",
    ),
];

pub fn render(f: &mut Frame, area: Rect, shell: &Shell) {
    let theme = &shell.theme;
    let open = shell.views.carte_acc.open_index().filter(|i| *i < MAP_ZONES.len());
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(if open.is_some() { 6 } else { 0 }),
        ])
        .split(area);

    let selected = shell.views.carte.get(MAP_ZONES.len());
    let mut lines = vec![section_line("Carte de l'île", theme), Line::from("")];
    for (i, (_, title, _)) in MAP_ZONES.iter().enumerate() {
        let marker = if open == Some(i) { "◆" } else { "◇" };
        lines.push(list_line(format!("{marker} {title}"), selected == Some(i), theme));
    }
    render_list(f, rows[0], lines, selected.map_or(0, |i| i + 2));

    if let Some(i) = open {
        let (_, title, description) = MAP_ZONES[i];
        let info = Paragraph::new(vec![text_line(description, theme)])
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(dim_style(theme))
                    .title(Span::styled(format!(" {title} "), title_style(theme))),
            );
        f.render_widget(info, rows[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use crate::content::tests::sample_source;
    use crate::nav::PanelId;
    use crate::panels::tests::screen;

    #[test]
    fn zone_ids_are_unique() {
        let mut ids: Vec<&str> = MAP_ZONES.iter().map(|z| z.0).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), MAP_ZONES.len());
    }

    #[test]
    fn open_zone_shows_its_description() {
        let mut app = test_app(&sample_source());
        app.go(PanelId::Carte);
        let text = screen(&app);
        assert!(text.contains("Hub Technologique"));
        assert!(!text.contains("Laboratoires"));
        app.shell.views.carte_acc.toggle(2);
        assert!(screen(&app).contains("Laboratoires"));
    }
}
