pub mod error_toast;
pub mod filter_bar;
pub mod map_view;
pub mod route_panel;
pub mod search_box;
