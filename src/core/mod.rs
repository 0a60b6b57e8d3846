//! Business logic, independent of the transport.

pub mod item;
