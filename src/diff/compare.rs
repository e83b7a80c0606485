//! Freshness rule

use crate::types::FileAction;
use std::time::SystemTime;

/// Decide what to do with a source file given the destination's state.
///
/// Modification time is the only change signal:
///
/// 1. **Destination missing** → CopyNew
/// 2. **Source strictly newer** → Update
/// 3. **Destination same age or newer** → Skip
///
/// Size is not consulted and content is never hashed; a destination whose
/// timestamp was moved forward without a content change is left alone.
pub fn compare_mtime(src_mtime: SystemTime, dest_mtime: Option<SystemTime>) -> FileAction {
    match dest_mtime {
        None => FileAction::CopyNew,
        Some(dest) if src_mtime > dest => FileAction::Update,
        Some(_) => FileAction::Skip,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn test_missing_destination_copies() {
        assert_eq!(compare_mtime(at(1000), None), FileAction::CopyNew);
    }

    #[test]
    fn test_source_newer_updates() {
        assert_eq!(compare_mtime(at(2000), Some(at(1000))), FileAction::Update);
    }

    #[test]
    fn test_equal_mtime_skips() {
        assert_eq!(compare_mtime(at(1000), Some(at(1000))), FileAction::Skip);
    }

    #[test]
    fn test_destination_newer_skips() {
        assert_eq!(compare_mtime(at(1000), Some(at(2000))), FileAction::Skip);
    }

    #[test]
    fn test_subsecond_difference_counts() {
        let dest = at(1000);
        let src = dest + Duration::from_nanos(1);
        assert_eq!(compare_mtime(src, Some(dest)), FileAction::Update);
    }
}
