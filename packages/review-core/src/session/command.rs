use review_api_client::PairKey;

/// Movement through the displayed sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Operator intent, independent of how it was entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Approve the selected pair, optionally with an edited merged name
    Approve { custom_name: Option<String> },
    Reject,
    Skip,
    Navigate(Direction),
    Select(PairKey),
    Reload,
    RefreshDetail,
}
