//! confconv core
//!
//! Converts a flat directory of YAML documents into pretty-printed JSON
//! documents, one output file per input file, written into a freshly staged
//! target directory.
//!
//! # Pipeline
//!
//! ```text
//! Stager → Enumerator → plan (names, collisions) → worker pool ─┬→ job: read → transcode → write
//!                                                               └→ barrier → RunReport
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use confconv_core::{ConvertConfig, Converter};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConvertConfig::new("./src", "./dist").with_max_jobs(8);
//! let report = Converter::new(config).run().await?;
//!
//! println!("{}", report.summary());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod enumerate;
pub mod error;
pub mod formats;
pub mod job;
pub mod naming;
pub mod orchestrator;
pub mod staging;

// Re-exports for convenience
pub use config::{ConvertConfig, NamingMode};
pub use enumerate::{enumerate_sources, is_eligible, FileSet};
pub use error::{ConvertError, ConvertResult, RunFailure};
pub use formats::{Transcoder, YamlToJson};
pub use job::{ConversionJob, ConvertedFile, JobOutcome};
pub use naming::derive_target_name;
pub use orchestrator::{CancelHandle, Converter, RunReport};
pub use staging::stage_target_dir;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running conversions
    pub use crate::config::{ConvertConfig, NamingMode};
    pub use crate::error::{ConvertError, RunFailure};
    pub use crate::formats::{Transcoder, YamlToJson};
    pub use crate::orchestrator::{Converter, RunReport};
}
