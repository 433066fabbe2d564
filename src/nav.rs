//! Panel navigation.
//!
//! Exactly one panel is active at a time. A transition deactivates the current
//! panel, activates the target, recomputes the chrome (footer highlight and
//! floating buttons) from scratch, then runs the target's init hook.
//!
//! Chrome is never diffed against the previous panel: every transition clears
//! all highlight slots and re-applies the static mapping.

use std::collections::BTreeSet;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::str::FromStr;
use tracing::{debug, error, warn};

pub use crate::error::{HookError, NavError};

// ── Panels ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PanelId {
    Home,
    Membres,
    Calendrier,
    Parametres,
    Chat,
    CharacterDetail,
    EventDetail,
    ProjectDetail,
    EaNexus,
    Lieux,
    LocationDetail,
    Flash,
    Carte,
}

impl PanelId {
    pub const ALL: [PanelId; 13] = [
        PanelId::Home,
        PanelId::Membres,
        PanelId::Calendrier,
        PanelId::Parametres,
        PanelId::Chat,
        PanelId::CharacterDetail,
        PanelId::EventDetail,
        PanelId::ProjectDetail,
        PanelId::EaNexus,
        PanelId::Lieux,
        PanelId::LocationDetail,
        PanelId::Flash,
        PanelId::Carte,
    ];

    pub fn id(self) -> &'static str {
        match self {
            PanelId::Home => "home",
            PanelId::Membres => "membres",
            PanelId::Calendrier => "calendrier",
            PanelId::Parametres => "parametres",
            PanelId::Chat => "chat",
            PanelId::CharacterDetail => "characterDetail",
            PanelId::EventDetail => "eventDetail",
            PanelId::ProjectDetail => "projectDetail",
            PanelId::EaNexus => "eaNexus",
            PanelId::Lieux => "lieux",
            PanelId::LocationDetail => "locationDetail",
            PanelId::Flash => "flash",
            PanelId::Carte => "carte",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            PanelId::Home => "Accueil",
            PanelId::Membres => "Membres",
            PanelId::Calendrier => "Calendrier",
            PanelId::Parametres => "Paramètres",
            PanelId::Chat => "Messagerie",
            PanelId::CharacterDetail => "Profil",
            PanelId::EventDetail => "Événement",
            PanelId::ProjectDetail => "Projet",
            PanelId::EaNexus => "EA Nexus",
            PanelId::Lieux => "Lieux",
            PanelId::LocationDetail => "Exploration",
            PanelId::Flash => "Flash Info",
            PanelId::Carte => "Carte",
        }
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for PanelId {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PanelId::ALL
            .iter()
            .copied()
            .find(|p| p.id() == s)
            .ok_or_else(|| NavError::UnknownPanel(s.to_string()))
    }
}

// ── Chrome ────────────────────────────────────────────────────────────────────

/// Footer icon slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromeIcon {
    Home,
    Calendar,
    Members,
    Settings,
}

impl ChromeIcon {
    pub const ALL: [ChromeIcon; 4] = [
        ChromeIcon::Home,
        ChromeIcon::Calendar,
        ChromeIcon::Members,
        ChromeIcon::Settings,
    ];

    fn slot(self) -> usize {
        self as usize
    }

    pub fn target(self) -> PanelId {
        match self {
            ChromeIcon::Home => PanelId::Home,
            ChromeIcon::Calendar => PanelId::Calendrier,
            ChromeIcon::Members => PanelId::Membres,
            ChromeIcon::Settings => PanelId::Parametres,
        }
    }
}

/// Footer icon highlighted while `panel` is active, if any.
pub fn chrome_icon(panel: PanelId) -> Option<ChromeIcon> {
    match panel {
        PanelId::Home => Some(ChromeIcon::Home),
        PanelId::Calendrier => Some(ChromeIcon::Calendar),
        PanelId::Parametres => Some(ChromeIcon::Settings),
        PanelId::Membres | PanelId::CharacterDetail => Some(ChromeIcon::Members),
        PanelId::Chat
        | PanelId::EventDetail
        | PanelId::ProjectDetail
        | PanelId::EaNexus
        | PanelId::Lieux
        | PanelId::LocationDetail
        | PanelId::Flash
        | PanelId::Carte => None,
    }
}

/// Panels on which the floating Lieux/Projets buttons are hidden.
pub fn hides_floating_buttons(panel: PanelId) -> bool {
    matches!(
        panel,
        PanelId::Lieux | PanelId::LocationDetail | PanelId::EaNexus
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chrome {
    highlighted: [bool; ChromeIcon::ALL.len()],
    floating_visible: bool,
}

impl Default for Chrome {
    fn default() -> Self {
        Self {
            highlighted: [false; ChromeIcon::ALL.len()],
            floating_visible: true,
        }
    }
}

impl Chrome {
    fn apply(&mut self, panel: PanelId) {
        self.highlighted = [false; ChromeIcon::ALL.len()];
        if let Some(icon) = chrome_icon(panel) {
            self.highlighted[icon.slot()] = true;
        }
        self.floating_visible = !hides_floating_buttons(panel);
    }

    pub fn is_highlighted(&self, icon: ChromeIcon) -> bool {
        self.highlighted[icon.slot()]
    }

    pub fn highlighted(&self) -> Option<ChromeIcon> {
        ChromeIcon::ALL.into_iter().find(|i| self.is_highlighted(*i))
    }

    pub fn floating_visible(&self) -> bool {
        self.floating_visible
    }
}

// ── Init hooks ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitHook {
    RebuildCalendar,
    RenderMembers,
    RenderCatalog,
    RenderLocations,
}

pub fn init_hook(panel: PanelId) -> Option<InitHook> {
    match panel {
        PanelId::Calendrier => Some(InitHook::RebuildCalendar),
        PanelId::Membres => Some(InitHook::RenderMembers),
        PanelId::EaNexus => Some(InitHook::RenderCatalog),
        PanelId::Lieux => Some(InitHook::RenderLocations),
        PanelId::Home
        | PanelId::Parametres
        | PanelId::Chat
        | PanelId::CharacterDetail
        | PanelId::EventDetail
        | PanelId::ProjectDetail
        | PanelId::LocationDetail
        | PanelId::Flash
        | PanelId::Carte => None,
    }
}

/// Executes init hooks on behalf of the navigator.
pub trait HookRunner {
    fn run_hook(&mut self, hook: InitHook) -> Result<(), HookError>;
}

// ── Registry ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRegistry {
    panels: BTreeSet<PanelId>,
}

impl ViewRegistry {
    pub fn standard() -> Self {
        Self::with_panels(PanelId::ALL)
    }

    /// Registers `panels`; `home` is always present.
    pub fn with_panels(panels: impl IntoIterator<Item = PanelId>) -> Self {
        let mut panels: BTreeSet<PanelId> = panels.into_iter().collect();
        panels.insert(PanelId::Home);
        Self { panels }
    }

    pub fn contains(&self, panel: PanelId) -> bool {
        self.panels.contains(&panel)
    }

    pub fn resolve(&self, id: &str) -> Result<PanelId, NavError> {
        let panel: PanelId = id.parse()?;
        if self.contains(panel) {
            Ok(panel)
        } else {
            Err(NavError::Unregistered(panel))
        }
    }
}

// ── Navigator ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Navigator {
    registry: ViewRegistry,
    active: PanelId,
    visible: BTreeSet<PanelId>,
    chrome: Chrome,
}

impl Navigator {
    pub fn new(registry: ViewRegistry) -> Self {
        let mut chrome = Chrome::default();
        chrome.apply(PanelId::Home);
        Self {
            registry,
            active: PanelId::Home,
            visible: BTreeSet::from([PanelId::Home]),
            chrome,
        }
    }

    pub fn active(&self) -> PanelId {
        self.active
    }

    pub fn is_visible(&self, panel: PanelId) -> bool {
        self.visible.contains(&panel)
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    pub fn chrome(&self) -> &Chrome {
        &self.chrome
    }

    /// Makes `target` the active panel.
    ///
    /// An unregistered target leaves the current panel, chrome and hooks
    /// untouched. Re-entering the active panel is allowed and re-runs chrome
    /// and the init hook.
    pub fn transition(
        &mut self,
        target: PanelId,
        hooks: &mut dyn HookRunner,
    ) -> Result<(), NavError> {
        if !self.registry.contains(target) {
            warn!(panel = %target, active = %self.active, "navigation target is not registered");
            return Err(NavError::Unregistered(target));
        }

        self.visible.remove(&self.active);
        self.visible.insert(target);
        self.active = target;

        self.chrome.apply(target);
        debug!(
            panel = %target,
            highlighted = ?self.chrome.highlighted(),
            visible = self.visible_count(),
            "panel activated"
        );

        self.dispatch_hook(target, hooks);
        Ok(())
    }

    /// Resolves a panel id string, then transitions.
    pub fn open(&mut self, id: &str, hooks: &mut dyn HookRunner) -> Result<PanelId, NavError> {
        let panel = self.registry.resolve(id).map_err(|err| {
            warn!(id, active = %self.active, error = %err, "cannot navigate");
            err
        })?;
        self.transition(panel, hooks)?;
        Ok(panel)
    }

    pub fn close(&mut self, hooks: &mut dyn HookRunner) -> Result<(), NavError> {
        self.transition(PanelId::Home, hooks)
    }

    fn dispatch_hook(&self, panel: PanelId, hooks: &mut dyn HookRunner) {
        let Some(hook) = init_hook(panel) else {
            return;
        };
        match catch_unwind(AssertUnwindSafe(|| hooks.run_hook(hook))) {
            Ok(Ok(())) => debug!(%panel, ?hook, "init hook ran"),
            Ok(Err(err)) => error!(%panel, error = %err, "init hook failed"),
            Err(_) => error!(%panel, ?hook, "init hook panicked"),
        }
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(ViewRegistry::standard())
    }
}
