//! Tool invocation domain model

pub mod entities;
pub mod value_objects;
