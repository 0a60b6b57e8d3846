//! A small CRUD service for items, backed by SQLite and served with axum.

pub mod api;
pub mod app;
pub mod core;
pub mod infra;
