pub mod chart;
pub mod file;
pub mod settings;
pub mod stats;
pub mod table;
pub mod user;
