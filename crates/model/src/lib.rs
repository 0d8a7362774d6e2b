//! Slidecut Data Model
//!
//! Defines the data contracts shared by template selection and rendering:
//! - **Transitions:** The catalog of cross-fade effects and ordered plans of them
//! - **Timing:** Segment/transition durations and the offsets derived from them
//! - **Jobs:** Image sets, frame geometry, and the per-job state machine
//!
//! Nothing in this crate touches the filesystem or spawns processes.

pub mod job;
pub mod timing;
pub mod transition;

pub use job::*;
pub use timing::*;
pub use transition::*;
