use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a submission. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    New,
    Reviewed,
    Closed,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::New, Status::Reviewed, Status::Closed];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::New => "new",
            Status::Reviewed => "reviewed",
            Status::Closed => "closed",
        }
    }

    /// Case-insensitive parse of a status cell or query value.
    pub fn parse(raw: &str) -> Option<Status> {
        let raw = raw.trim();
        Status::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(raw))
    }

    /// Targets reachable in one step.
    pub fn allowed_targets(self) -> &'static [Status] {
        match self {
            Status::New => &[Status::Reviewed, Status::Closed],
            Status::Reviewed => &[Status::Closed],
            Status::Closed => &[],
        }
    }

    /// Whether `self → target` is a forward transition. Self-transitions are
    /// not transitions and return false.
    pub fn can_transition_to(self, target: Status) -> bool {
        self.allowed_targets().contains(&target)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
