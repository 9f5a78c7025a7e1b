//! # survey-core
//!
//! Core types, validation, and reconciliation for the survey service.
//!
//! This crate provides the foundational types shared across all survey crates:
//! - Entity structs for surveys, questions, answer sessions and answers
//! - Question type and survey status enums
//! - ID prefix constants
//! - The question validator and answer normalization
//! - The pure question-list reconciler (create / update / delete plan)
//! - Data-URI image payload parsing and slug derivation
//! - Pagination, dashboard response types and per-question answer tallies

pub mod aggregate;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod image;
pub mod pagination;
pub mod reconcile;
pub mod responses;
pub mod slug;
pub mod validate;
