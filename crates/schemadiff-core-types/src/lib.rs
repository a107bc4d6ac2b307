//! Core types shared across schemadiff facilities
//!
//! This crate provides the canonical field keys and event names used by the
//! error and logging facilities, so every crate emitting structured events
//! agrees on their shape.

pub mod schema;
