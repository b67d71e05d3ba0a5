pub mod app;
pub mod status;
pub mod table;
pub mod theme;
