pub mod app_state;
pub mod creator_view;
pub mod product_view;
