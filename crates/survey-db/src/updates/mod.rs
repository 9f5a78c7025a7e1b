//! Input and patch types for survey mutations.
//!
//! Patch structs use `Option` fields: only `Some` fields are applied, and
//! `Option<Option<T>>` distinguishes "leave as is" from "clear".

pub mod survey;
