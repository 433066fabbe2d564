use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::time::{Duration, Instant};
use tracing::info;

use crate::app::App;
use crate::color::Theme;
use crate::config::{HEADER_TITLE, LOADING_AUTO_FINISH};
use crate::content::{ContentRepository, Document, LoadStatus};
use crate::ui::{alert_style, dim_style, normal_style, title_style, Term};

const PROGRESS_WIDTH: usize = 32;

/// Shows document loading progress until skipped or timed out.
pub fn loading_screen(terminal: &mut Term, app: &mut App) -> Result<()> {
    let started = Instant::now();
    loop {
        app.drain_loader();
        let elapsed = started.elapsed();
        terminal.draw(|f| draw_loading(f, &app.shell.content, &app.shell.theme, elapsed))?;

        if check_skip()? {
            info!(after_ms = elapsed.as_millis() as u64, "loading screen skipped");
            break;
        }
        if elapsed >= LOADING_AUTO_FINISH {
            break;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    Ok(())
}

fn status_span(status: LoadStatus, theme: &Theme) -> Span<'static> {
    match status {
        LoadStatus::Pending => Span::styled("chargement…", dim_style(theme)),
        LoadStatus::Loaded(n) => Span::styled(format!("ok ({n})"), title_style(theme)),
        LoadStatus::Failed => Span::styled("échec", alert_style()),
    }
}

pub(crate) fn draw_loading(f: &mut Frame, content: &ContentRepository, theme: &Theme, elapsed: Duration) {
    let size = f.area();
    let settled = Document::ALL
        .iter()
        .filter(|d| content.status(**d).is_settled())
        .count();
    let filled = settled * PROGRESS_WIDTH / Document::ALL.len();

    let mut lines = vec![
        Line::from(Span::styled(HEADER_TITLE, title_style(theme))),
        Line::from(""),
        Line::from(vec![
            Span::styled("█".repeat(filled), title_style(theme)),
            Span::styled("░".repeat(PROGRESS_WIDTH - filled), dim_style(theme)),
        ]),
        Line::from(""),
    ];
    for document in Document::ALL {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<24}", document.label()), normal_style(theme)),
            status_span(content.status(document), theme),
        ]));
    }

    let top = size.height.saturating_sub(lines.len() as u16) / 2;
    let area = Rect {
        x: 0,
        y: top,
        width: size.width,
        height: size.height.saturating_sub(top),
    };
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);

    let remaining = LOADING_AUTO_FINISH.saturating_sub(elapsed).as_secs();
    let hint = if content.all_settled() {
        format!("Contenu prêt - ESPACE pour continuer ({remaining}s)")
    } else {
        format!("ESPACE pour passer ({remaining}s)")
    };
    let hint = Paragraph::new(Span::styled(hint, dim_style(theme)))
    .alignment(Alignment::Center);
    let hint_area = Rect {
        x: 0,
        y: size.height.saturating_sub(1),
        width: size.width,
        height: 1,
    };
    f.render_widget(hint, hint_area);
}

/// Returns true if the user pressed Space, Enter or Esc.
fn check_skip() -> Result<bool> {
    if event::poll(Duration::from_millis(0))? {
        if let Event::Key(k) = event::read()? {
            if k.kind == KeyEventKind::Press
                && matches!(k.code, KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Esc)
            {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::load_document;
    use crate::content::tests::{sample_source, MapSource};
    use ratatui::{backend::TestBackend, Terminal};

    fn render(content: &ContentRepository) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|f| draw_loading(f, content, &Theme::default(), Duration::from_secs(2)))
            .unwrap();
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

    #[test]
    fn shows_each_document_status() {
        let mut content = ContentRepository::default();
        content.apply(load_document(&sample_source(), Document::Events));
        content.apply(load_document(&MapSource::default(), Document::Flash));
        let text = render(&content);
        assert!(text.contains("HOURGLASS SOCIETY"));
        assert!(text.contains("ok (2)"));
        assert!(text.contains("échec"));
        assert!(text.contains("chargement…"));
        assert!(text.contains("ESPACE pour passer (3s)"));
    }

    #[test]
    fn hint_changes_once_every_document_settled() {
        let mut content = ContentRepository::default();
        for document in Document::ALL {
            content.apply(load_document(&sample_source(), document));
        }
        assert!(render(&content).contains("Contenu prêt"));
    }
}
