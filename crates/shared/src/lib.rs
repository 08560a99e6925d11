pub mod geo;
pub mod models;
pub mod scene;
pub mod search;
