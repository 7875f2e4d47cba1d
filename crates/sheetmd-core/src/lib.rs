pub mod config;
pub mod logging;

pub mod controller;
pub mod download;
pub mod filename;
pub mod selection;
pub mod status;
pub mod transport;
