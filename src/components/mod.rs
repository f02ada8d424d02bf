pub mod sidebar;
pub mod toggles;
