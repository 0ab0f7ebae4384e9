//! Decoders for the tables that carry font metadata.
//!
//! Each decoder takes the raw bytes of one table and is lenient: a table
//! that cannot be decoded produces no values rather than an error.

pub mod maxp;
pub mod name;
pub mod os2;
