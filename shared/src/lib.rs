//! Shared utilities for the storage gateway services

pub mod observability;
