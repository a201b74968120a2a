//! Interaktive Sitzungen, deren Zustand dem Aufrufer gehört.

pub mod cleanup;
pub mod stroke;

pub use cleanup::{updated_path, CleanupSession};
pub use stroke::StrokeSession;
