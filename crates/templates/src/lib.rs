//! Slidecut Templates — Transition Plan Selection
//!
//! Chooses a named sequence of transition effects for a render job:
//! - **classic:** one effect repeated for every image pair
//! - **slide:** four directional slides, cycled
//! - **mix:** a fixed hand-picked heterogeneous sequence
//! - **random:** distinct effects sampled from the catalog on every call
//!
//! This crate is pure computation. Randomness is always supplied by the
//! caller, so a seeded generator gives reproducible plans.

pub mod selector;

pub use selector::{Template, TemplateSelector};
