//! Job board backend
//!
//! Companies, job listings and applications behind a JSON API, with
//! role-based permissions, per-object ownership checks and role-scoped lists.

#![allow(missing_docs)]

pub mod api;
pub mod app;
pub mod auth;
pub mod boot;
pub mod cli;
pub mod commands;
pub mod config;
pub mod database;
pub mod environment;
pub mod policy;
pub mod router;
pub mod routes;
pub mod services;
pub mod setup_tracing;
