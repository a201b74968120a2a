//! Track Cones Library.
//! Dateiformate, Sitzungen und Optionen rund um die Streckenrand-Engine,
//! als Library exportiert für Tests und Wiederverwendung.

pub mod formats;
pub mod session;
pub mod shared;
pub mod use_cases;

pub use track_boundary_engine as engine;

pub use formats::{ConeFile, ConeFormat, ConeRecord, SlamGraph};
pub use session::{CleanupSession, StrokeSession};
pub use shared::{InputOptions, OutputOptions, ToolOptions};
