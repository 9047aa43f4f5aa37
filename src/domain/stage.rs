use std::fmt;

/// Release pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    CheckCleanWorkingTree,
    BumpVersion,
    SyncDependencyArtifacts,
    CommitChanges,
    CreateTag,
    PushRemote,
}

impl Stage {
    /// All stages in the order the orchestrator runs them
    pub const ALL: [Stage; 6] = [
        Stage::CheckCleanWorkingTree,
        Stage::BumpVersion,
        Stage::SyncDependencyArtifacts,
        Stage::CommitChanges,
        Stage::CreateTag,
        Stage::PushRemote,
    ];

    /// Get the stage name as a string
    pub fn name(&self) -> &'static str {
        match self {
            Stage::CheckCleanWorkingTree => "CheckCleanWorkingTree",
            Stage::BumpVersion => "BumpVersion",
            Stage::SyncDependencyArtifacts => "SyncDependencyArtifacts",
            Stage::CommitChanges => "CommitChanges",
            Stage::CreateTag => "CreateTag",
            Stage::PushRemote => "PushRemote",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        assert_eq!(Stage::ALL.first(), Some(&Stage::CheckCleanWorkingTree));
        assert_eq!(Stage::ALL.last(), Some(&Stage::PushRemote));
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(
            Stage::SyncDependencyArtifacts.to_string(),
            "SyncDependencyArtifacts"
        );
    }
}
