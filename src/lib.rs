//! Indana ERP API Library
//!
//! Sales target tracking, revenue attribution and role-based navigation
//! for the Indana ERP, with the domain logic, repositories and HTTP
//! adapters it is built from.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
