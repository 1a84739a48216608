pub mod command_dispatcher;
pub mod config;
pub mod contract;
pub mod core_service;
pub mod host;
pub mod logging;
pub mod model;
pub mod resolver;
pub mod runtime;
pub mod shortcut_table;
pub mod state_store;
pub mod tab_tracker;
pub mod transport;
pub mod url_transform;
