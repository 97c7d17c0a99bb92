pub mod dialogs;
pub mod map_view;
pub mod theme;
pub mod timeline_bar;
pub mod toolbar;
