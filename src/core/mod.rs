//! Core building blocks: the constraint catalog, the metadata model, the
//! record builder, cross-field rules and the validator. These are internal
//! primitives consumed by the high-level `api` module.
pub mod builder;
pub mod catalog;
pub mod consistency;
pub mod model;
pub mod params;
pub mod report;
pub mod validator;

#[cfg(test)]
pub(crate) mod fixtures;
