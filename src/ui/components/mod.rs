pub mod overlay_view;
pub mod page_view;
pub mod sidebar;
pub mod toasts;
