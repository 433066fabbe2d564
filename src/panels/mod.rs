//! One renderer per panel. Renderers only read state; they never navigate.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::media::format_time;
use crate::nav::PanelId;
use crate::status::render_status_bar;
use crate::ui::{
    pad_horizontal, render_floating_buttons, render_footer, render_header, render_hint,
    render_separator,
};

pub mod calendar;
pub mod catalog;
pub mod home;
pub mod locations;
pub mod map;
pub mod members;
pub mod settings;

pub fn render(f: &mut Frame, app: &App) {
    let shell = &app.shell;
    let theme = &shell.theme;
    let active = PanelId::ALL
        .into_iter()
        .find(|p| app.navigator.is_visible(*p))
        .unwrap_or_else(|| app.navigator.active());
    let chrome = app.navigator.chrome();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_header(f, chunks[0], active, theme);
    render_separator(f, chunks[1], theme);
    render_floating_buttons(f, chunks[2], chrome, theme);

    let body = pad_horizontal(chunks[3]);
    match active {
        PanelId::Home => home::render(f, body, shell),
        PanelId::Calendrier => calendar::render(f, body, shell),
        PanelId::EventDetail => calendar::render_event(f, body, shell),
        PanelId::Membres => members::render(f, body, shell),
        PanelId::CharacterDetail => members::render_character(f, body, shell),
        PanelId::Chat => members::render_chat(f, body, shell),
        PanelId::Parametres => settings::render(f, body, shell),
        PanelId::Lieux => locations::render(f, body, shell),
        PanelId::LocationDetail => locations::render_location(f, body, shell),
        PanelId::EaNexus => catalog::render(f, body, shell),
        PanelId::ProjectDetail => catalog::render_project(f, body, shell),
        PanelId::Flash => home::render_flash(f, body, shell),
        PanelId::Carte => map::render(f, body, shell),
    }

    let hint = if active == PanelId::Home && shell.views.commander_open {
        "↑↓ choisir   Enter déplier   Espace lecture   s stop   Esc fermer"
    } else {
        hint(active)
    };
    render_hint(f, chunks[4], hint, theme);
    render_footer(f, chunks[5], chrome, theme);

    let now_playing = shell
        .music
        .current()
        .filter(|_| shell.music.is_playing())
        .and_then(|i| shell.content.playlist().get(i))
        .map(|t| format!("♪ {} {}  ", t.title, format_time(shell.music.position())))
        .unwrap_or_default();
    render_status_bar(f, chunks[6], theme, &now_playing);
}

pub fn hint(panel: PanelId) -> &'static str {
    match panel {
        PanelId::Home => "↑↓ choisir   Enter ouvrir   c messages   q quitter",
        PanelId::Calendrier => "←→↑↓ jour   </> mois   j/k événement   Enter détail   Esc retour",
        PanelId::EventDetail => "c contacter l'organisateur   v voir la catégorie   Esc retour",
        PanelId::Membres => "↑↓ choisir   Enter profil   Esc retour",
        PanelId::CharacterDetail => "Enter envoyer un message   ↑↓ défiler   Esc retour",
        PanelId::Chat => "Enter envoyer   Esc retour au profil",
        PanelId::Parametres => "Tab section   ↑↓ choisir   Enter appliquer   x verrou   r couleur par défaut   Espace/n/b/m/+/- musique",
        PanelId::Lieux => "↑↓ choisir   Espace aperçu   Enter explorer   Esc retour",
        PanelId::LocationDetail => "↑↓ zone   Enter déplier   Esc retour",
        PanelId::EaNexus => "↑↓ choisir   Enter déplier / ouvrir   Esc retour",
        PanelId::ProjectDetail => "↑↓ défiler   Esc retour",
        PanelId::Flash => "↑↓ défiler   Esc retour",
        PanelId::Carte => "↑↓ zone   Enter description   Esc retour",
    }
}

/// Draws `lines`, scrolled so that line `focus` stays visible.
pub(crate) fn render_list(f: &mut Frame, area: Rect, lines: Vec<Line<'_>>, focus: usize) {
    let height = area.height as usize;
    let offset = if height == 0 || focus < height {
        0
    } else {
        focus + 1 - height
    };
    let offset = u16::try_from(offset).unwrap_or(u16::MAX);
    f.render_widget(Paragraph::new(lines).scroll((offset, 0)), area);
}

/// Draws wrapped prose scrolled by `scroll` lines.
pub(crate) fn render_page(f: &mut Frame, area: Rect, lines: Vec<Line<'_>>, scroll: u16) {
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0)),
        area,
    );
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use crate::content::tests::{sample_source, MapSource};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    pub(crate) fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(110, 40)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn prepare(app: &mut App) {
        app.shell.views.character = Some(1);
        app.shell.views.event = Some(1);
        app.shell.views.location = Some("nexus".into());
        app.shell.views.project = Some((0, 0));
    }

    #[test]
    fn every_panel_renders_with_content() {
        let mut app = test_app(&sample_source());
        prepare(&mut app);
        for panel in PanelId::ALL {
            app.go(panel);
            let text = screen(&app);
            assert!(text.contains("HOURGLASS SOCIETY"), "{panel} lost its header");
            assert!(text.contains("F1 Accueil"), "{panel} lost its footer");
        }
    }

    #[test]
    fn every_panel_renders_with_nothing_loaded() {
        let mut app = test_app(&MapSource::default());
        prepare(&mut app);
        for panel in PanelId::ALL {
            app.go(panel);
            let text = screen(&app);
            assert!(text.contains("HOURGLASS SOCIETY"), "{panel} lost its header");
        }
    }

    #[test]
    fn floating_buttons_drawn_only_when_visible() {
        let mut app = test_app(&sample_source());
        assert!(screen(&app).contains("[L] Lieux"));
        app.go(PanelId::EaNexus);
        assert!(!screen(&app).contains("[L] Lieux"));
    }

    #[test]
    fn list_scrolls_to_focus() {
        let mut terminal = Terminal::new(TestBackend::new(10, 2)).unwrap();
        let lines: Vec<Line> = (0..5).map(|i| Line::from(format!("row{i}"))).collect();
        terminal
            .draw(|f| render_list(f, f.area(), lines, 4))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let last: String = (0..4).map(|x| buffer[(x, 1)].symbol().to_string()).collect();
        assert_eq!(last, "row4");
    }
}
