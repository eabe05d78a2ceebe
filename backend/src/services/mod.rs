//! Module for core business logic services.
//!
//! This module encapsulates services that perform specific business
//! operations and orchestrate interactions between repositories.

pub mod hierarchy_service;
pub mod user_service;
