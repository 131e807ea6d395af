//! Employee directory web application.
//!
//! This crate stores employee records in SQLite and serves them through
//! server-rendered pages, an AJAX search endpoint and a small JSON API.
//!
//! - [`schema`]: field constraints, input validation and serialization
//! - [`service`]: the data service every read and write goes through
//! - [`store`]: connection pool, migrations and SQL queries
//! - [`api`]: routes, handlers and templates
//! - [`config`], [`logging`]: the ambient setup used by the binary

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod schema;
pub mod service;
pub mod store;
pub mod uploads;
