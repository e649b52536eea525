use serde::{Deserialize, Serialize};

/// A commit in the source repository, as seen by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCommit {
    /// Full object id
    pub id: String,
    /// One-line log summary (`git log --oneline -1`)
    pub summary: String,
}

/// Author and committer identity stamped on every exported commit.
///
/// Built from the triggering actor's name with a placeholder address, so the
/// output history attributes changes without carrying real contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitIdentity {
    pub name: String,
    pub email: String,
}

impl CommitIdentity {
    pub fn placeholder(actor: &str, email_domain: &str) -> Self {
        Self {
            name: actor.to_string(),
            email: format!("{actor}@{email_domain}"),
        }
    }

    /// `-c` overrides passed to git so no repository or global config is needed.
    pub fn git_config_args(&self) -> Vec<String> {
        vec![
            "-c".to_string(),
            format!("user.email={}", self.email),
            "-c".to_string(),
            format!("user.name={}", self.name),
        ]
    }
}

/// Escape embedded double quotes so the summary survives as a commit message
/// exactly as downstream tooling expects.
pub fn escape_message(summary: &str) -> String {
    summary.replace('"', "\\\"")
}
