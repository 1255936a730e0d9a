use std::fmt;

/// Lifecycle of a single download attempt, shown in the status region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Waiting,
    Downloading,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadMode {
    Video,
    AudioOnly,
}

/// One entry of the format selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOption {
    pub id: String,
    pub label: String,
}

impl fmt::Display for FormatOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// File-save side effect produced once a download attempt succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveAction {
    pub file_url: String,
    pub filename: String,
}
