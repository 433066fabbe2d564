use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    Frame,
};

use crate::app::{SettingsSection, Shell};
use crate::color::AccentColor;
use crate::content::WallpaperKind;
use crate::media::format_time;
use crate::panels::render_list;
use crate::ui::{
    dim_line, list_line, normal_style, nothing_line, section_line, sel_style, text_line,
};

const VOLUME_BAR: usize = 20;

pub fn render(f: &mut Frame, area: Rect, shell: &Shell) {
    let theme = &shell.theme;
    let views = &shell.views;

    let tabs: Vec<Span> = SettingsSection::ALL
        .iter()
        .flat_map(|s| {
            let style = if *s == views.settings { sel_style(theme) } else { normal_style(theme) };
            [Span::styled(format!(" {} ", s.title()), style), Span::raw(" ")]
        })
        .collect();
    let mut lines = vec![Line::from(tabs), Line::from("")];
    let mut focus = 0;

    match views.settings {
        SettingsSection::Wallpapers => {
            let wallpapers = shell.content.wallpapers();
            let locked = shell.prefs.wallpaper_locked();
            lines.push(text_line(
                format!("Verrou du fond d'écran : {}", if locked { "activé" } else { "désactivé" }),
                theme,
            ));
            lines.push(Line::from(""));
            if wallpapers.is_empty() {
                lines.push(nothing_line(theme));
            }
            let selected = views.wallpapers.get(wallpapers.len());
            for (i, w) in wallpapers.iter().enumerate() {
                let kind = match w.kind {
                    WallpaperKind::Image => "image",
                    WallpaperKind::Video => "vidéo",
                };
                let active = if views.wallpaper == Some(i) { "  [Actif]" } else { "" };
                lines.push(list_line(
                    format!("{} ({kind}){active}", w.title),
                    selected == Some(i),
                    theme,
                ));
            }
            focus = selected.map_or(0, |i| i + 4);
        }
        SettingsSection::Accent => {
            let current = shell.prefs.accent_color();
            lines.push(text_line(format!("Couleur actuelle : {current}"), theme));
            lines.push(Line::from(""));
            let selected = views.accents.get(AccentColor::PRESETS.len());
            for (i, (name, color)) in AccentColor::PRESETS.iter().enumerate() {
                let mut line = list_line(format!("{name:<10} {color}"), selected == Some(i), theme);
                line.spans.push(Span::raw("  "));
                line.spans.push(Span::styled("    ", Style::default().bg(color.to_color())));
                lines.push(line);
            }
            focus = selected.map_or(0, |i| i + 4);
        }
        SettingsSection::Music => {
            let tracks = shell.content.playlist();
            let music = &shell.music;
            let state = if music.is_playing() { "Lecture" } else { "Pause" };
            let now = music
                .current()
                .and_then(|i| tracks.get(i))
                .map(|t| format!("{} - {}", t.title, t.artist))
                .unwrap_or_else(|| "Aucune piste".to_string());
            let total = music
                .current()
                .and_then(|i| tracks.get(i))
                .and_then(|t| t.duration)
                .map(format_time)
                .unwrap_or_else(|| "--:--".to_string());
            let filled = music.volume() as usize * VOLUME_BAR / 100;
            lines.push(text_line(format!("{state} : {now}"), theme));
            lines.push(text_line(
                format!("{} / {total}   Mode : {}", format_time(music.position()), music.mode().label()),
                theme,
            ));
            lines.push(text_line(
                format!(
                    "Volume {:>3}% {}{}",
                    music.volume(),
                    "█".repeat(filled),
                    "░".repeat(VOLUME_BAR - filled)
                ),
                theme,
            ));
            lines.push(Line::from(""));
            if tracks.is_empty() {
                lines.push(nothing_line(theme));
            }
            let selected = views.tracks.get(tracks.len());
            for (i, t) in tracks.iter().enumerate() {
                let marker = if music.current() == Some(i) { "♪" } else { " " };
                lines.push(list_line(
                    format!("{marker} {} - {}", t.title, t.artist),
                    selected == Some(i),
                    theme,
                ));
            }
            focus = selected.map_or(0, |i| i + 6);
        }
        SettingsSection::Video => {
            let video = &shell.video;
            match video.source() {
                Some(source) => {
                    let state = if video.is_playing() { "Lecture" } else { "Pause" };
                    lines.push(text_line(format!("Source : {source}"), theme));
                    lines.push(text_line(
                        format!("{state} · {}", format_time(video.position())),
                        theme,
                    ));
                }
                None => lines.push(dim_line("Aucune vidéo d'arrière-plan.", theme)),
            }
        }
    }

    lines.push(Line::from(""));
    lines.push(section_line("Tab : section suivante", theme));
    render_list(f, area, lines, focus);
}

#[cfg(test)]
mod tests {
    use crate::app::SettingsSection;
    use crate::app::tests::test_app;
    use crate::content::tests::sample_source;
    use crate::nav::PanelId;
    use crate::panels::tests::screen;

    #[test]
    fn each_section_renders() {
        let mut app = test_app(&sample_source());
        app.go(PanelId::Parametres);
        assert!(screen(&app).contains("Aurore (image)  [Actif]"));

        app.shell.views.settings = SettingsSection::Accent;
        assert!(screen(&app).contains("#667eea"));

        app.shell.views.settings = SettingsSection::Music;
        let text = screen(&app);
        assert!(text.contains("Aube - Hourglass"));
        assert!(text.contains("Volume  70%"));
        assert!(text.contains("Séquentiel"));

        app.shell.apply_wallpaper(1);
        app.shell.views.settings = SettingsSection::Video;
        assert!(screen(&app).contains("video/ocean.mp4"));
    }
}
