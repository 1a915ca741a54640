//! # cradle-core
//!
//! Core types, ID prefixes, and error types for Cradle.
//!
//! This crate provides the foundational types shared across all Cradle crates:
//! - Entity structs for the domain objects (accounts, children, vaccination records)
//! - The dose/status enums used by the immunization schedule
//! - Ephemeral chart types produced by the schedule generator
//! - ID prefix constants and formatting helpers
//! - Cross-cutting error types
//! - Service response types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod responses;
