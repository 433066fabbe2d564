//! EA Nexus: project categories as an accordion, and project pages.

use ratatui::{layout::Rect, text::Line, Frame};

use crate::accordion::Accordion;
use crate::app::Shell;
use crate::content::{value_text, ProjectCategory};
use crate::panels::{render_list, render_page};
use crate::ui::{dim_line, list_line, nothing_line, section_line, text_line};

/// A selectable line of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogRow {
    Category(usize),
    Project { category: usize, project: usize },
}

/// Categories in order, with the open one's projects listed under it.
pub fn catalog_rows(categories: &[ProjectCategory], open: &Accordion) -> Vec<CatalogRow> {
    let mut rows = Vec::new();
    for (c, category) in categories.iter().enumerate() {
        rows.push(CatalogRow::Category(c));
        if open.is_open(c) {
            rows.extend((0..category.project_count()).map(|p| CatalogRow::Project {
                category: c,
                project: p,
            }));
        }
    }
    rows
}

pub fn render(f: &mut Frame, area: Rect, shell: &Shell) {
    let theme = &shell.theme;
    let categories = shell.content.projects();
    if categories.is_empty() {
        render_list(f, area, vec![nothing_line(theme)], 0);
        return;
    }
    let rows = catalog_rows(categories, &shell.views.catalog_acc);
    let selected = shell.views.catalog.get(rows.len());
    let lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let is_selected = selected == Some(i);
            match *row {
                CatalogRow::Category(c) => {
                    let category = &categories[c];
                    let marker = if shell.views.catalog_acc.is_open(c) { "▼" } else { "▶" };
                    list_line(
                        format!("{marker} {}  ({} projets)", category.name, category.project_count()),
                        is_selected,
                        theme,
                    )
                }
                CatalogRow::Project { category, project } => {
                    let projects = categories[category].projects();
                    let text = match projects.get(project) {
                        Some((Some(sub), p)) => format!("    {sub} › {}", p.title),
                        Some((None, p)) => format!("    {}", p.title),
                        None => String::new(),
                    };
                    list_line(text, is_selected, theme)
                }
            }
        })
        .collect();
    render_list(f, area, lines, selected.unwrap_or(0));
}

pub fn render_project(f: &mut Frame, area: Rect, shell: &Shell) {
    let theme = &shell.theme;
    let found = shell.views.project.and_then(|(c, p)| {
        let category = shell.content.projects().get(c)?;
        let (sub, project) = category.projects().get(p).copied()?;
        Some((category, sub, project))
    });
    let Some((category, sub, project)) = found else {
        render_list(f, area, vec![nothing_line(theme)], 0);
        return;
    };

    let mut lines = vec![section_line(project.title.clone(), theme)];
    let path = match sub {
        Some(sub) => format!("{} › {sub}", category.name),
        None => category.name.clone(),
    };
    lines.push(dim_line(path, theme));
    lines.push(Line::from(""));
    let body = if project.full_description.is_empty() {
        &project.summary
    } else {
        &project.full_description
    };
    lines.extend(body.lines().map(|l| text_line(l.to_string(), theme)));
    if !project.details.is_empty() {
        lines.push(Line::from(""));
        lines.push(section_line("Détails", theme));
        for (key, value) in &project.details {
            lines.push(text_line(format!("  {key} : {}", value_text(value)), theme));
        }
    }
    render_page(f, area, lines, shell.views.scroll);
}
