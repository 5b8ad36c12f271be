//! DTO modules bridging the REST backend and the domain layer.

pub mod lists;
pub mod wire;
