//! Geteilte Typen für alle Befehle: Werkzeug-Optionen.

pub mod options;

pub use options::{InputOptions, OutputOptions, ToolOptions, C_EXPORT_Y_OFFSET, CONFIG_FILE_NAME};
