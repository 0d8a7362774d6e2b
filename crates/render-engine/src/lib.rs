//! Slidecut Render Engine
//!
//! Turns an ordered set of still images and a transition plan into one
//! vertical video by driving an external encoder exactly once per job.
//!
//! # Pipeline Architecture
//!
//! ```text
//! image1 ── scale/pad ──┐
//! image2 ── scale/pad ──┴── xfade ──┐
//! image3 ── scale/pad ──────────────┴── xfade ── ... ──┐
//!                                                      ▼
//!                                            format (yuv420p)
//!                                                      │
//!                                              Encode (H.264)
//!                                                      │
//!                                                      ▼
//!                                                 output.mp4
//! ```
//!
//! Jobs move through `Created -> Validated -> Encoding -> {Succeeded | Failed}`.
//! A job with the wrong number of images fails before any process is started.

pub mod compositor;
pub mod encoder;
pub mod export;
pub mod placeholder;
pub mod progress;
pub mod workspace;

pub use encoder::{EncodeOutcome, EncodeRequest, Encoder, FfmpegEncoder};
pub use export::*;
pub use progress::{ProgressCallback, RenderProgress};
pub use workspace::JobWorkspace;
