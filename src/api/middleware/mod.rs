//! API middleware.

pub mod access;
