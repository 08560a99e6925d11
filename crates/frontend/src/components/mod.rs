pub mod map_view;
pub mod search_form;
