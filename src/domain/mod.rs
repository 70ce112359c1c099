//! Domain layer - contract types independent of any transport

pub mod contract;
