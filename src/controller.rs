use std::cell::Cell;
use std::rc::{Rc, Weak};

use tracing::{debug, info, warn};

use crate::config::ControllerConfig;
use crate::store::PreferenceStore;
use crate::surface::AppearanceSurface;
use crate::system::SystemPreferenceSource;
use crate::theme::{SidebarState, Theme};
use crate::triggers::{bind_triggers, TriggerAction, TriggerSource};

/// Applies, persists and synchronizes the theme and sidebar preferences.
///
/// Clones share state. Storage failures never reach the caller: the visual
/// state is applied regardless and the failure is logged.
#[derive(Clone)]
pub struct PreferenceController {
    inner: Rc<Inner>,
}

struct Inner {
    config: ControllerConfig,
    store: Rc<dyn PreferenceStore>,
    system: Rc<dyn SystemPreferenceSource>,
    surface: Rc<dyn AppearanceSurface>,
    /// Last theme chosen on this page, kept even when it could not be saved.
    explicit: Cell<Option<Theme>>,
    subscribed: Cell<bool>,
    started: Cell<bool>,
}

impl PreferenceController {
    pub fn new(
        config: ControllerConfig,
        store: Rc<dyn PreferenceStore>,
        system: Rc<dyn SystemPreferenceSource>,
        surface: Rc<dyn AppearanceSurface>,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                config,
                store,
                system,
                surface,
                explicit: Cell::new(None),
                subscribed: Cell::new(false),
                started: Cell::new(false),
            }),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.inner.config
    }

    /// Persisted theme, if present and valid. Unreadable storage and
    /// malformed values both count as absent.
    pub fn persisted_theme(&self) -> Option<Theme> {
        let key = &self.inner.config.theme_key;
        match self.inner.store.get(key) {
            Ok(Some(value)) => match value.parse::<Theme>() {
                Ok(theme) => Some(theme),
                Err(e) => {
                    debug!("Ignoring '{}': {}", key, e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                debug!("Theme preference unreadable: {}", e);
                None
            }
        }
    }

    /// Persisted theme, falling back to the current system preference.
    pub fn effective_theme(&self) -> Theme {
        self.persisted_theme()
            .unwrap_or_else(|| Theme::from_dark(self.inner.system.is_dark()))
    }

    /// Theme currently shown on the surface.
    pub fn applied_theme(&self) -> Theme {
        Theme::from_dark(self.inner.surface.is_dark())
    }

    /// Apply the effective theme. Never writes to storage.
    pub fn initialize_theme(&self) -> Theme {
        let theme = self.effective_theme();
        self.inner.surface.set_dark(theme.is_dark());
        debug!("Initial theme: {}", theme);
        theme
    }

    /// Flip the applied theme and persist the result.
    pub fn toggle_theme(&self) -> Theme {
        let next = self.applied_theme().toggled();
        self.inner.surface.set_dark(next.is_dark());
        self.inner.explicit.set(Some(next));
        self.persist(&self.inner.config.theme_key, next.as_str());
        info!("Theme toggled to {}", next);
        next
    }

    /// Follow a system preference change unless the user has chosen a theme,
    /// either persisted or picked on this page while storage was failing.
    /// Returns whether the surface changed.
    pub fn on_system_preference_change(&self, is_dark: bool) -> bool {
        if let Some(theme) = self.persisted_theme() {
            debug!("System preference changed, keeping persisted {}", theme);
            return false;
        }
        if let Some(theme) = self.inner.explicit.get() {
            debug!("System preference changed, keeping unsaved {}", theme);
            return false;
        }
        self.inner.surface.set_dark(is_dark);
        debug!("Following system preference: {}", Theme::from_dark(is_dark));
        true
    }

    /// Subscribe to system preference changes. Subsequent calls are no-ops.
    pub fn watch_system_preference(&self) {
        if self.inner.subscribed.replace(true) {
            return;
        }
        let weak: Weak<Inner> = Rc::downgrade(&self.inner);
        self.inner.system.on_change(Box::new(move |is_dark: bool| {
            if let Some(inner) = weak.upgrade() {
                PreferenceController { inner }.on_system_preference_change(is_dark);
            }
        }));
    }

    pub fn persisted_sidebar_collapsed(&self) -> Option<bool> {
        let key = &self.inner.config.sidebar_key;
        match self.inner.store.get(key) {
            Ok(Some(value)) => {
                let collapsed = SidebarState::parse_collapsed(&value);
                if collapsed.is_none() {
                    debug!("Ignoring malformed value {:?} for '{}'", value, key);
                }
                collapsed
            }
            Ok(None) => None,
            Err(e) => {
                debug!("Sidebar preference unreadable: {}", e);
                None
            }
        }
    }

    pub fn sidebar_collapsed(&self) -> bool {
        self.inner.surface.sidebar_collapsed()
    }

    /// Apply the persisted sidebar state (expanded by default). Never writes
    /// to storage. Returns the applied state, or `None` when sidebar support
    /// is disabled.
    pub fn initialize_sidebar(&self) -> Option<bool> {
        if !self.inner.config.sidebar {
            return None;
        }
        let collapsed = self.persisted_sidebar_collapsed().unwrap_or(false);
        self.inner.surface.set_sidebar_collapsed(collapsed);
        debug!("Initial sidebar collapsed: {}", collapsed);
        Some(collapsed)
    }

    /// Negate the collapsed state shown on the container and persist it.
    pub fn toggle_sidebar(&self) -> Option<bool> {
        if !self.inner.config.sidebar {
            return None;
        }
        let collapsed = !self.inner.surface.sidebar_collapsed();
        self.inner.surface.set_sidebar_collapsed(collapsed);
        self.persist(
            &self.inner.config.sidebar_key,
            SidebarState::encode_collapsed(collapsed),
        );
        info!("Sidebar collapsed: {}", collapsed);
        Some(collapsed)
    }

    pub fn bind_theme_toggle_controls(&self, source: &dyn TriggerSource) -> usize {
        let controller = self.clone();
        bind_triggers(
            source,
            TriggerAction::ThemeToggle,
            Rc::new(move || {
                controller.toggle_theme();
            }),
        )
    }

    /// Binds nothing when sidebar support is disabled.
    pub fn bind_sidebar_toggle_controls(&self, source: &dyn TriggerSource) -> usize {
        if !self.inner.config.sidebar {
            return 0;
        }
        let controller = self.clone();
        bind_triggers(
            source,
            TriggerAction::SidebarToggle,
            Rc::new(move || {
                controller.toggle_sidebar();
            }),
        )
    }

    /// Ready-handler sequence: initialize, subscribe, then bind. On later
    /// calls only triggers that appeared since are bound.
    pub fn start(&self, triggers: &dyn TriggerSource) {
        let first_run = !self.inner.started.replace(true);
        if first_run {
            self.initialize_theme();
            self.watch_system_preference();
        }
        self.bind_theme_toggle_controls(triggers);
        if first_run {
            self.initialize_sidebar();
        }
        self.bind_sidebar_toggle_controls(triggers);
    }

    fn persist(&self, key: &str, value: &str) {
        if let Err(e) = self.inner.store.set(key, value) {
            warn!("Preference not saved, keeping it for this page only: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::surface::MemorySurface;
    use crate::system::ManualSystemPreference;

    struct Harness {
        store: Rc<MemoryStore>,
        system: Rc<ManualSystemPreference>,
        surface: Rc<MemorySurface>,
        controller: PreferenceController,
    }

    fn harness(persisted: &[(&str, &str)], system_dark: bool) -> Harness {
        let store = Rc::new(MemoryStore::with_values(persisted.iter().copied()));
        let system = Rc::new(ManualSystemPreference::new(system_dark));
        let surface = Rc::new(MemorySurface::new());
        let controller = PreferenceController::new(
            ControllerConfig::default(),
            store.clone(),
            system.clone(),
            surface.clone(),
        );
        Harness {
            store,
            system,
            surface,
            controller,
        }
    }

    #[test]
    fn test_initialize_theme_precedence() {
        let cases = [
            (None, false, false),
            (None, true, true),
            (Some("light"), true, false),
            (Some("light"), false, false),
            (Some("dark"), false, true),
            (Some("dark"), true, true),
            (Some("purple"), false, false),
            (Some("purple"), true, true),
        ];
        for (persisted, system_dark, expect_dark) in cases {
            let values: Vec<(&str, &str)> = persisted.map(|v| ("ui:theme", v)).into_iter().collect();
            let h = harness(&values, system_dark);
            h.controller.initialize_theme();
            assert_eq!(
                h.surface.is_dark(),
                expect_dark,
                "persisted={:?} system_dark={}",
                persisted,
                system_dark
            );
            assert!(h.store.writes().is_empty(), "initialization must not write");
        }
    }

    #[test]
    fn test_toggle_theme_twice_restores() {
        let h = harness(&[("ui:theme", "light")], true);
        h.controller.initialize_theme();

        assert_eq!(h.controller.toggle_theme(), Theme::Dark);
        assert_eq!(h.store.peek("ui:theme").as_deref(), Some("dark"));

        assert_eq!(h.controller.toggle_theme(), Theme::Light);
        assert!(!h.surface.is_dark());
        assert_eq!(h.store.peek("ui:theme").as_deref(), Some("light"));
    }

    #[test]
    fn test_system_change_ignored_with_persisted_theme() {
        let h = harness(&[("ui:theme", "light")], false);
        h.controller.initialize_theme();
        h.controller.watch_system_preference();

        h.system.announce(true);
        assert!(!h.surface.is_dark());
        assert!(h.store.writes().is_empty());
    }

    #[test]
    fn test_system_change_tracked_without_persisted_theme() {
        let h = harness(&[], false);
        h.controller.initialize_theme();
        h.controller.watch_system_preference();

        h.system.announce(true);
        assert!(h.surface.is_dark());
        h.system.announce(false);
        assert!(!h.surface.is_dark());
        assert!(h.store.writes().is_empty());
    }

    #[test]
    fn test_malformed_persisted_theme_logged_and_ignored() {
        let h = harness(&[("ui:theme", "Dark")], false);
        assert_eq!(h.controller.persisted_theme(), None);
        assert_eq!(h.controller.effective_theme(), Theme::Light);
    }

    #[test]
    fn test_malformed_persisted_theme_does_not_block_system_change() {
        let h = harness(&[("ui:theme", "purple")], false);
        assert!(h.controller.on_system_preference_change(true));
        assert!(h.surface.is_dark());
    }

    #[test]
    fn test_watch_subscribes_once() {
        let h = harness(&[], false);
        h.controller.watch_system_preference();
        h.controller.watch_system_preference();
        assert_eq!(h.system.subscriber_count(), 1);
    }

    #[test]
    fn test_toggle_after_system_change_uses_applied_state() {
        let h = harness(&[], false);
        h.controller.initialize_theme();
        h.controller.on_system_preference_change(true);

        assert_eq!(h.controller.toggle_theme(), Theme::Light);
        assert_eq!(h.store.peek("ui:theme").as_deref(), Some("light"));
    }

    #[test]
    fn test_write_failure_still_applies() {
        let h = harness(&[], false);
        h.store.set_fail_writes(true);
        h.controller.initialize_theme();

        assert_eq!(h.controller.toggle_theme(), Theme::Dark);
        assert!(h.surface.is_dark());
        assert_eq!(h.store.peek("ui:theme"), None);

        assert_eq!(h.controller.toggle_sidebar(), Some(true));
        assert_eq!(h.surface.sidebar_attribute().as_deref(), Some("true"));
    }

    #[test]
    fn test_read_failure_falls_back_to_system() {
        let h = harness(&[("ui:theme", "light"), ("ui:sidebar-collapsed", "1")], true);
        h.store.set_fail_reads(true);

        assert_eq!(h.controller.initialize_theme(), Theme::Dark);
        assert_eq!(h.controller.initialize_sidebar(), Some(false));
        assert!(h.controller.on_system_preference_change(false));
    }

    #[test]
    fn test_initialize_sidebar() {
        let h = harness(&[], false);
        assert_eq!(h.controller.initialize_sidebar(), Some(false));
        assert_eq!(h.surface.sidebar_attribute().as_deref(), Some("false"));

        let h = harness(&[("ui:sidebar-collapsed", "1")], false);
        assert_eq!(h.controller.initialize_sidebar(), Some(true));
        assert_eq!(h.surface.sidebar_attribute().as_deref(), Some("true"));

        let h = harness(&[("ui:sidebar-collapsed", "yes")], false);
        assert_eq!(h.controller.initialize_sidebar(), Some(false));
        assert!(h.store.writes().is_empty());
    }

    #[test]
    fn test_toggle_sidebar_reads_visual_state() {
        let h = harness(&[("ui:sidebar-collapsed", "1")], false);
        // Attribute says expanded even though storage says collapsed.
        h.surface.set_sidebar_attribute(Some("false"));

        assert_eq!(h.controller.toggle_sidebar(), Some(true));
        assert_eq!(h.surface.sidebar_attribute().as_deref(), Some("true"));
        assert_eq!(h.store.peek("ui:sidebar-collapsed").as_deref(), Some("1"));

        assert_eq!(h.controller.toggle_sidebar(), Some(false));
        assert_eq!(h.surface.sidebar_attribute().as_deref(), Some("false"));
        assert_eq!(h.store.peek("ui:sidebar-collapsed").as_deref(), Some("0"));
    }
}
