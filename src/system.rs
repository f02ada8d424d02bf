use std::cell::{Cell, RefCell};

use tracing::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::store::js_reason;

pub const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

/// Operating-environment dark/light preference.
pub trait SystemPreferenceSource {
    fn is_dark(&self) -> bool;
    /// Register a callback invoked with the new preference on every change.
    fn on_change(&self, callback: Box<dyn Fn(bool)>);
}

/// `matchMedia("(prefers-color-scheme: dark)")`. Without `matchMedia`
/// the source reports light and never fires.
pub struct MediaQuerySource {
    query: Option<web_sys::MediaQueryList>,
}

impl MediaQuerySource {
    pub fn new() -> Self {
        let query = web_sys::window().and_then(|window| match window.match_media(DARK_SCHEME_QUERY) {
            Ok(query) => query,
            Err(e) => {
                debug!("matchMedia failed: {}", js_reason(&e));
                None
            }
        });
        Self { query }
    }
}

impl Default for MediaQuerySource {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemPreferenceSource for MediaQuerySource {
    fn is_dark(&self) -> bool {
        self.query.as_ref().map(|q| q.matches()).unwrap_or_default()
    }

    fn on_change(&self, callback: Box<dyn Fn(bool)>) {
        let Some(query) = &self.query else {
            return;
        };
        let listener = Closure::<dyn FnMut(web_sys::MediaQueryListEvent)>::new(
            move |event: web_sys::MediaQueryListEvent| callback(event.matches()),
        );
        if let Err(e) =
            query.add_event_listener_with_callback("change", listener.as_ref().unchecked_ref())
        {
            warn!("Failed to listen for color-scheme changes: {}", js_reason(&e));
            return;
        }
        // Lives as long as the page.
        listener.forget();
    }
}

/// Preference source driven by hand, for tests and non-browser hosts.
#[derive(Default)]
pub struct ManualSystemPreference {
    dark: Cell<bool>,
    subscribers: RefCell<Vec<Box<dyn Fn(bool)>>>,
}

impl ManualSystemPreference {
    pub fn new(dark: bool) -> Self {
        Self {
            dark: Cell::new(dark),
            subscribers: RefCell::new(Vec::new()),
        }
    }

    /// Change the preference and notify every subscriber.
    pub fn announce(&self, dark: bool) {
        self.dark.set(dark);
        for subscriber in self.subscribers.borrow().iter() {
            subscriber(dark);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

impl SystemPreferenceSource for ManualSystemPreference {
    fn is_dark(&self) -> bool {
        self.dark.get()
    }

    fn on_change(&self, callback: Box<dyn Fn(bool)>) {
        self.subscribers.borrow_mut().push(callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_manual_announce_notifies_subscribers() {
        let source = ManualSystemPreference::new(false);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        source.on_change(Box::new(move |dark: bool| sink.borrow_mut().push(dark)));

        source.announce(true);
        source.announce(false);

        assert_eq!(*seen.borrow(), vec![true, false]);
        assert!(!source.is_dark());
        assert_eq!(source.subscriber_count(), 1);
    }
}
