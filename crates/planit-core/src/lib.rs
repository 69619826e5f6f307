//! # planit-core
//!
//! Core types shared by every Planit crate.
//!
//! This crate provides the foundational pieces of the offline course cache:
//! - Record structs for courses, catalogs, requirement trees, and plan state
//! - Sort and dataset enums used by the store, query engine, and sync engine
//! - Persisted meta key names
//! - Pure requirement tree operations (path filtering, grouping, counting)
//! - The two-pass page planner used for "missing values sort last" paging
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod meta;
pub mod paging;
pub mod requirements;
