pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod schema;
pub mod text;
pub mod api;

#[macro_use]
extern crate diesel;
