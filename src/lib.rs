pub mod api;
pub mod config;
pub mod consts;
pub mod error;
pub mod notation;
pub mod pins;
pub mod roster;
pub mod scorer;
pub mod simulator;
pub mod store;
