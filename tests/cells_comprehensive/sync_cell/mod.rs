//! SyncCell Test Suite
//!
//! ## Modules
//!
//! - `basic_ops`: Each access mode on a single thread
//! - `concurrency`: Blocking, hand-off and broadcast behavior
//! - `edge_cases`: Faults, policies and unusual payloads

pub mod concurrency;
