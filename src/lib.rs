pub mod app;
pub mod components;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod store;
pub mod surface;
pub mod system;
pub mod theme;
pub mod triggers;
pub mod web;

pub use config::ControllerConfig;
pub use controller::PreferenceController;
pub use error::PrefsError;
pub use store::{LocalStorageStore, MemoryStore, PreferenceStore};
pub use surface::{AppearanceSurface, DomSurface, MemorySurface};
pub use system::{ManualSystemPreference, MediaQuerySource, SystemPreferenceSource};
pub use theme::{SidebarState, Theme};
pub use triggers::{FakeTrigger, FakeTriggerSource, Trigger, TriggerAction, TriggerSource};
