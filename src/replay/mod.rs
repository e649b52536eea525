//! The incremental export-replay pipeline
//!
//! - [`resolver`]: which source commits to replay
//! - [`workspace`]: fresh output repository per run
//! - [`step`]: one source commit to one output commit
//! - [`controller`]: the whole run, base first then the replay list
//! - [`publisher`]: optional force-push of the result
//! - [`preflight`]: precondition checks before replay starts

pub mod controller;
pub mod preflight;
pub mod publisher;
pub mod resolver;
pub mod step;
pub mod workspace;

pub use controller::{ReplayController, ReplayOptions, Replayed};
pub use preflight::{check_range, validate_identity, validate_run, ResolvedRange};
pub use publisher::Publisher;
pub use resolver::resolve;
pub use step::{StepExecutor, EXPORT_NOTES_REF};
pub use workspace::{remove_best_effort, OutputWorkspace};
