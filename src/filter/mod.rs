//! In-memory search and population filtering over the loaded record set.
//!
//! # Modules
//!
//! - [`engine`]: Name and population predicates, subset computation
//! - [`population`]: Threshold parsing and the fixed select buckets
//! - [`policy`]: Override vs. composable combination of the two filters

pub mod engine;
pub mod policy;
pub mod population;

pub use engine::{below_threshold, filter, filter_indices, matches_name, FilterCriteria};
pub use policy::{FilterPolicy, FilterTrigger};
pub use population::{parse_threshold, PopulationBucket};
