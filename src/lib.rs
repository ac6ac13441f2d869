pub mod config;
pub mod handlers;
pub mod models;
pub mod requests;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
pub mod views;
