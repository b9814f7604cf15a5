//! Project loading for EngineY.
//!
//! Runs the YScript front end over a `.yproj` or `.ysc` file and validates
//! the resulting project metadata into engine settings.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`config`] | `ConfigBuilder`, `ProjectConfig`, `WindowConfig` |
//! | [`loader`] | `Project`, `LoadOptions` |
//! | [`logging`] | `init_logging`, `LoggingConfig` |

pub mod config;
pub mod loader;
pub mod logging;

pub use config::{ConfigBuilder, ProjectConfig, ProjectMetadata, WindowConfig};
pub use loader::{LoadOptions, Project};
pub use logging::{LoggingConfig, init_logging};
