pub mod agenda;
pub mod app;
pub mod cmds;
pub mod config;
pub mod datetime;
pub mod error;
pub mod events;
pub mod feed;
pub mod grid;
pub mod model;
pub mod provider;
pub mod ui;
pub mod window;
