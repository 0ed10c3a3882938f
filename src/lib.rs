//! # Asistente Backend
//!
//! Backend for a multi-tenant attendance application for teachers.
//!
//! This crate provides the domain core and REST API for managing groups of
//! students, recording per-session attendance, browsing attendance history
//! through calendar summaries, tracking upcoming student birthdays, and
//! exporting attendance sheets as CSV. Storage is abstracted behind a
//! repository trait with an in-memory implementation for tests and local
//! development and a Diesel/Postgres implementation for production.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Identifier newtypes and the DTO surface for the HTTP API
//! - [`models`]: Domain entities (teachers, groups, students, attendance)
//! - [`db`]: Repository pattern, storage backends, and persistence layer
//! - [`services`]: Business logic (recording, aggregation, birthdays, export)
//! - [`routes`]: Route-specific data types
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod api;

pub mod db;
pub mod models;

pub mod routes;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
