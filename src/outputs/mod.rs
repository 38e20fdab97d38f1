//! Output generation for a finished run.
//!
//! # Submodules
//!
//! - [`report`]: Writes the tabular report, one row per article
//! - [`json`]: Writes the output work item for downstream jobs
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── latimes.csv     # Report
//! ├── latimes.json    # Output work item
//! └── pictures/
//!     └── covid_cases_climb.jpg
//! ```

pub mod json;
pub mod report;
