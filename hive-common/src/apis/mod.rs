//! Hive API groups

pub mod hive;
