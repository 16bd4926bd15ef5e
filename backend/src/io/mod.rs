//! # IO Module
//!
//! Adapter layer between the grid UI and the domain logic. It exposes the
//! REST API, converts JSON DTOs to domain values and translates domain
//! errors into HTTP responses.

pub mod rest;
