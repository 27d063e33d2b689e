//! Pipeline stages for image relevance analysis and resizing.
//!
//! Each submodule implements exactly one step and is a pure function of
//! its inputs, so every stage is independently testable.
//!
//! ## Data Flow
//!
//! ```text
//!            ┌─▶ colors ───┐
//! input ─────┤             ├─▶ classify ──▶ score     (analysis)
//! (decode)   └─▶ geometry ─┘
//!
//! input ──▶ resize ──▶ encode                         (resizing)
//! ```
//!
//! 1. [`input`]    — validate paths, decode bytes, list a directory's images
//! 2. [`colors`]   — nearest-neighbour sample and distinct-colour count
//! 3. [`geometry`] — size and aspect-ratio scores from raw dimensions
//! 4. [`classify`] — ordered rule table assigning one [`crate::output::Category`]
//! 5. [`score`]    — weighted relevance and the process/skip cascade
//! 6. [`resize`]   — per-profile size plan and Lanczos resampling
//! 7. [`encode`]   — atomic write of the output image

pub mod classify;
pub mod colors;
pub mod encode;
pub mod geometry;
pub mod input;
pub mod resize;
pub mod score;
