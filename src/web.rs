use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::app::App;
use crate::config::ControllerConfig;
use crate::controller::PreferenceController;
use crate::error::PrefsError;
use crate::store::{js_reason, LocalStorageStore};
use crate::surface::DomSurface;
use crate::system::MediaQuerySource;
use crate::triggers::DomTriggers;

/// Global object a page can define before the script loads.
pub const CONFIG_GLOBAL: &str = "uiPrefsConfig";
/// Root element attribute holding the config as JSON.
pub const CONFIG_ATTRIBUTE: &str = "data-uiprefs-config";

struct Installed {
    controller: PreferenceController,
    triggers: Rc<DomTriggers>,
}

thread_local! {
    static INSTALLED: RefCell<Option<Rc<Installed>>> = const { RefCell::new(None) };
}

fn window() -> Result<web_sys::Window, PrefsError> {
    web_sys::window().ok_or_else(|| PrefsError::Environment("no global window".to_string()))
}

fn document() -> Result<web_sys::Document, PrefsError> {
    window()?
        .document()
        .ok_or_else(|| PrefsError::Environment("window has no document".to_string()))
}

/// Config from `window.uiPrefsConfig`, then from the root element's
/// `data-uiprefs-config` attribute, then defaults.
pub fn load_config() -> Result<ControllerConfig, PrefsError> {
    let window = window()?;
    let global = js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL))
        .map_err(|e| PrefsError::Config(js_reason(&e)))?;
    if !global.is_undefined() && !global.is_null() {
        let config: ControllerConfig = serde_wasm_bindgen::from_value(global)
            .map_err(|e| PrefsError::Config(format!("{CONFIG_GLOBAL}: {e}")))?;
        config.validate()?;
        return Ok(config);
    }

    let attribute = document()?
        .document_element()
        .and_then(|root| root.get_attribute(CONFIG_ATTRIBUTE));
    match attribute {
        Some(json) => ControllerConfig::from_json(&json),
        None => Ok(ControllerConfig::default()),
    }
}

fn has_container(document: &web_sys::Document, config: &ControllerConfig) -> bool {
    document
        .query_selector(&config.container_selector)
        .ok()
        .flatten()
        .is_some()
}

/// Build the browser-backed controller and start it once the DOM is ready.
/// A page without the application container gets the standalone `App`.
pub fn install(config: ControllerConfig) -> Result<PreferenceController, PrefsError> {
    let document = document()?;
    let controller = PreferenceController::new(
        config.clone(),
        Rc::new(LocalStorageStore::new()),
        Rc::new(MediaQuerySource::new()),
        Rc::new(DomSurface::new(document.clone(), &config)),
    );
    let installed = Rc::new(Installed {
        controller: controller.clone(),
        triggers: Rc::new(DomTriggers::new(document.clone(), &config.action_attribute)),
    });
    INSTALLED.with(|slot| *slot.borrow_mut() = Some(installed.clone()));

    if document.ready_state() == "loading" {
        let listener = Closure::<dyn FnMut()>::new(move || on_ready(&installed));
        document
            .add_event_listener_with_callback("DOMContentLoaded", listener.as_ref().unchecked_ref())
            .map_err(|e| PrefsError::Environment(js_reason(&e)))?;
        listener.forget();
        debug!("Waiting for DOMContentLoaded");
    } else {
        on_ready(&installed);
    }
    Ok(controller)
}

fn on_ready(installed: &Installed) {
    match document() {
        Ok(document) if !has_container(&document, installed.controller.config()) => {
            debug!("No application container, mounting standalone page");
            leptos::mount::mount_to_body(App);
        }
        Ok(_) => {}
        Err(e) => {
            debug!("Cannot start controller: {}", e);
            return;
        }
    }
    start(installed);
}

fn start(installed: &Installed) {
    installed.controller.start(&*installed.triggers);
    info!(
        "Preferences applied, theme is {}",
        installed.controller.applied_theme()
    );
}

/// Bind triggers inserted after the initial page load. Elements that are
/// already bound are left alone.
#[wasm_bindgen(js_name = uiPrefsRefresh)]
pub fn refresh() {
    let installed = INSTALLED.with(|slot| slot.borrow().clone());
    match installed {
        Some(installed) => start(&installed),
        None => debug!("uiPrefsRefresh called before install"),
    }
}
