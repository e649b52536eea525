pub mod commit;
pub mod report;
pub mod run;

pub use commit::{escape_message, CommitIdentity, SourceCommit};
pub use report::{ExportReport, ExportedRevision, ReplayOutcome, StepRecord};
pub use run::{ExportRun, ReplayMode, RunIdentity};
