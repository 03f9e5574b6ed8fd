/// Result selector: turns a ranked classification into the hotdog verdict
///
/// Only the top-1 observation matters. Its label is tested for "hotdog"
/// with plain, case-sensitive substring containment.

use crate::vision::Observation;

/// Substring the top-1 label is tested for
pub const KEYWORD: &str = "hotdog";

/// Outcome of the top-1 keyword test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Hotdog,
    NotHotdog,
}

impl Verdict {
    /// Text shown as the screen title
    pub fn title(self) -> &'static str {
        match self {
            Verdict::Hotdog => "Hotdog!",
            Verdict::NotHotdog => "Not Hotdog!",
        }
    }
}

/// Judge a ranked list of observations
///
/// Returns `None` for an empty list, in which case the title must be left
/// alone.
pub fn judge(observations: &[Observation]) -> Option<Verdict> {
    let top = observations.first()?;

    if top.label.contains(KEYWORD) {
        Some(Verdict::Hotdog)
    } else {
        Some(Verdict::NotHotdog)
    }
}
