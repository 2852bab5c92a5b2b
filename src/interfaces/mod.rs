//! Inbound interfaces translating external input into domain operations.

pub mod csv;
