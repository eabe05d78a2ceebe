//! Module for user profile and hierarchy management API endpoints.
//!
//! Covers the authenticated profile view, provisioning of subordinate
//! accounts along the creator hierarchy, status changes and the deletion
//! endpoints with their cascade semantics.

pub mod handlers;
pub mod models;
pub mod routes;
