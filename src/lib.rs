//! A small wiki of articles served over a RESTful HTTP API.
//!
//! - [`api`]: the route table and its handlers.
//! - [`db`]: the article collection, stored in SQLite.
//! - [`models`]: article documents and request bodies.
//! - [`config`]: server settings from the environment.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
