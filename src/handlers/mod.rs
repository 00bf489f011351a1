//! MCP tool handlers for the hangar server
//!
//! This module contains the implementation of all MCP tool handlers.
//! Each handler is in a separate file for better organization.

pub mod alerts;
pub mod calendar;
pub mod counters;
pub mod import_export;
pub mod notifications;
