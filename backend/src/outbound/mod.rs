//! Driven adapters: where the domain ports meet PostgreSQL and the disk.
//!
//! - [`persistence`]: Diesel repositories over a shared `bb8` pool.
//! - [`media`]: recipe images written beneath the media root.

pub mod media;
pub mod persistence;
