//! Message store port.

pub mod repository;
