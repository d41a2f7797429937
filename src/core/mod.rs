//! Core game module - states, events, data loading and fundamental systems.
//!
//! This module provides the foundation that all other game systems build upon.

mod data;
mod error;
mod events;
mod plugin;
mod states;
mod tween;

pub use data::*;
pub use error::DataLoadError;
pub use events::*;
pub use plugin::CorePlugin;
pub use states::*;
pub use tween::*;
