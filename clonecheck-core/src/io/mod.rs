//! Readers for instrument output.

pub mod abif;

pub use abif::{decode_base_calls, AbifTrace, DirEntry};
