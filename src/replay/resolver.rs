//! Revision range resolution
//!
//! Decides which source commits get replayed after the base export.

use tracing::debug;

use crate::error::{ExportError, ExportResult};
use crate::git::GitRepo;
use crate::models::ReplayMode;

/// Commits to export after `base`, oldest first.
///
/// - `base == head`: nothing, only the base export runs (in either mode)
/// - [`ReplayMode::Fast`]: just `head`
/// - [`ReplayMode::Full`]: every first-parent commit reachable from `head`
///   and not from `base`, so side branches collapse to their merge commit
///
/// `base` is expected to be an ancestor of `head`; that is checked by
/// preflight, not here. Revisions may be given as names: in fast mode they
/// are resolved to commit ids before comparing, and in full mode two names
/// of the same commit yield an empty range.
pub fn resolve(
    source: &GitRepo<'_>,
    base: &str,
    head: &str,
    mode: ReplayMode,
) -> ExportResult<Vec<String>> {
    if base == head {
        debug!(%base, "base and head are identical, nothing to replay");
        return Ok(Vec::new());
    }

    let commits = match mode {
        ReplayMode::Fast => {
            let base_id = source.resolve_commit(base).map_err(ExportError::History)?;
            let head_id = source.resolve_commit(head).map_err(ExportError::History)?;
            if base_id == head_id {
                debug!(%base, %head, "base and head name the same commit, nothing to replay");
                return Ok(Vec::new());
            }
            vec![head_id]
        }
        ReplayMode::Full => source
            .first_parent_range(base, head)
            .map_err(ExportError::History)?,
    };

    debug!(%mode, count = commits.len(), "resolved replay list");
    Ok(commits)
}
