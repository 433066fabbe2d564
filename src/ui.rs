use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};

use crate::color::Theme;
use crate::config::HEADER_TITLE;
use crate::nav::{Chrome, ChromeIcon, PanelId};

pub type Term = Terminal<ratatui::backend::CrosstermBackend<std::io::Stdout>>;

// ── Padding ───────────────────────────────────────────────────────────────────
// Horizontal padding applied to every screen so text never touches the edges.
const H_PAD: u16 = 3;

/// Shrink a rect by H_PAD columns on each side.
pub fn pad_horizontal(area: Rect) -> Rect {
    let pad = H_PAD.min(area.width / 2);
    Rect {
        x: area.x + pad,
        y: area.y,
        width: area.width.saturating_sub(pad * 2),
        height: area.height,
    }
}

/// A `width` x `height` rect centred in `area`, clipped to it.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + area.width.saturating_sub(w) / 2,
        area.y + area.height.saturating_sub(h) / 2,
        w,
        h,
    )
}

// ── Color helpers ─────────────────────────────────────────────────────────────

pub fn normal_style(theme: &Theme) -> Style { Style::default().fg(theme.accent) }
pub fn sel_style(theme: &Theme)    -> Style { Style::default().fg(Color::Black).bg(theme.accent).add_modifier(Modifier::BOLD) }
pub fn title_style(theme: &Theme)  -> Style { Style::default().fg(theme.light).add_modifier(Modifier::BOLD) }
pub fn dim_style(theme: &Theme)    -> Style { Style::default().fg(theme.dark).add_modifier(Modifier::DIM) }
pub fn alert_style()               -> Style { Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD) }

/// `> item` when selected, `  item` otherwise.
pub fn list_line(text: impl Into<String>, selected: bool, theme: &Theme) -> Line<'static> {
    let text = text.into();
    if selected {
        Line::from(Span::styled(format!("  > {text}"), sel_style(theme)))
    } else {
        Line::from(Span::styled(format!("    {text}"), normal_style(theme)))
    }
}

pub fn section_line(text: impl Into<String>, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(text.into(), title_style(theme)))
}

pub fn text_line(text: impl Into<String>, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(text.into(), normal_style(theme)))
}

pub fn dim_line(text: impl Into<String>, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(text.into(), dim_style(theme)))
}

/// Placeholder for an empty or not-yet-loaded collection.
pub fn nothing_line(theme: &Theme) -> Line<'static> {
    dim_line("  Rien à afficher pour le moment.", theme)
}

// ── Header ────────────────────────────────────────────────────────────────────

pub fn render_header(f: &mut Frame, area: Rect, panel: PanelId, theme: &Theme) {
    let inner = pad_horizontal(area);
    let lines = vec![
        Line::from(Span::styled(HEADER_TITLE, title_style(theme))),
        Line::from(Span::styled(panel.title().to_uppercase(), normal_style(theme))),
    ];
    let p = Paragraph::new(lines).alignment(Alignment::Center);
    f.render_widget(p, inner);
}

pub fn render_separator(f: &mut Frame, area: Rect, theme: &Theme) {
    let inner = pad_horizontal(area);
    let sep = "=".repeat(inner.width as usize);
    let p = Paragraph::new(sep).alignment(Alignment::Center).style(dim_style(theme));
    f.render_widget(p, inner);
}

pub fn render_hint(f: &mut Frame, area: Rect, hint: &str, theme: &Theme) {
    let p = Paragraph::new(Span::styled(hint.to_string(), dim_style(theme)));
    f.render_widget(p, pad_horizontal(area));
}

// ── Footer and floating buttons ───────────────────────────────────────────────

pub fn icon_label(icon: ChromeIcon) -> (&'static str, &'static str) {
    match icon {
        ChromeIcon::Home => ("F1", "Accueil"),
        ChromeIcon::Calendar => ("F2", "Calendrier"),
        ChromeIcon::Members => ("F3", "Membres"),
        ChromeIcon::Settings => ("F4", "Paramètres"),
    }
}

pub fn render_footer(f: &mut Frame, area: Rect, chrome: &Chrome, theme: &Theme) {
    let mut spans = Vec::new();
    for icon in ChromeIcon::ALL {
        let (key, label) = icon_label(icon);
        let style = if chrome.is_highlighted(icon) {
            sel_style(theme)
        } else {
            normal_style(theme)
        };
        spans.push(Span::styled(format!(" {key} {label} "), style));
        spans.push(Span::raw("  "));
    }
    let p = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    f.render_widget(p, pad_horizontal(area));
}

pub fn render_floating_buttons(f: &mut Frame, area: Rect, chrome: &Chrome, theme: &Theme) {
    if !chrome.floating_visible() {
        return;
    }
    let line = Line::from(vec![
        Span::styled(" [L] Lieux ", sel_style(theme)),
        Span::raw(" "),
        Span::styled(" [P] Projets ", sel_style(theme)),
    ]);
    let p = Paragraph::new(line).alignment(Alignment::Right);
    f.render_widget(p, pad_horizontal(area));
}

// ── Modal ─────────────────────────────────────────────────────────────────────

pub fn render_modal(f: &mut Frame, area: Rect, title: &str, lines: Vec<Line<'_>>, theme: &Theme) {
    let block = Block::default()
        .title(Span::styled(format!(" {title} "), title_style(theme)))
        .borders(Borders::ALL)
        .border_style(normal_style(theme));
    let inner = block.inner(area);
    f.render_widget(Clear, area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

// ── Selection cursor ──────────────────────────────────────────────────────────

/// Cursor into a list whose length may change under it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListCursor {
    index: usize,
}

impl ListCursor {
    pub fn up(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    pub fn down(&mut self, len: usize) {
        if len > 0 {
            self.index = (self.index + 1).min(len - 1);
        }
    }

    /// Current index, clamped to `len`; `None` for an empty list.
    pub fn get(&self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.index.min(len - 1))
    }

    pub fn set(&mut self, index: usize) {
        self.index = index;
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}
