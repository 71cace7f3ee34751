pub mod api;
pub mod bugs;
pub mod cases;
pub mod config;
pub mod report;
pub mod request;
