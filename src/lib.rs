//! Core library exports for the product catalog service.
//!
//! This crate exposes the domain model, Diesel persistence layer, HTTP
//! routes and service layers used by the catalog web application.

pub mod db;
pub mod domain;
pub mod dto;
pub mod error_conversions;
pub mod forms;
pub mod models;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;
