//! Data processing, serialization and report types.

pub mod output;
pub mod plan;
pub mod yaml;

pub use output::{render, OutputFormat};
pub use plan::{ContextPlan, FilePlan, PlanSummary, ReviewPlan};
pub use yaml::{to_yaml, to_yaml_block};
