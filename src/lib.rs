//! modmatch - OCR-tolerant game modifier matching
//!
//! This library maps lines of OCR-recognized text to the closest entry of a
//! fixed vocabulary of game modifier strings, and puts back the numbers the
//! line carried.
//!
//! ## Pipeline
//!
//! Raw text is classified and normalized (`text`), searched in a BK-tree
//! at growing edit distances (`index`, `search`), and the accepted entry
//! has its `#` placeholders filled from the original line (`matcher`).
//! An empty string means no confident match.
//!
//! ## Shared instance
//!
//! Hosts that want one process-wide matcher call [`init_shared`] once at
//! startup and build it through the returned lock. Queries take the read
//! lock; reset and rebuild take the write lock.

pub mod config;
pub mod index;
pub mod matcher;
pub mod search;
pub mod text;

use once_cell::sync::OnceCell;
use std::sync::RwLock;

pub use crate::config::Settings;
pub use crate::index::BkTree;
pub use crate::matcher::{IndexStats, MatchError, ModMatcher};
pub use crate::search::{MatchTier, SearchCandidate};
pub use crate::text::CorruptionLevel;

/// Global matcher instance for hosts that share one index
static SHARED_MATCHER: OnceCell<RwLock<ModMatcher>> = OnceCell::new();

/// Initialize the global matcher, unbuilt. Later calls are ignored.
pub fn init_shared(settings: Settings) -> &'static RwLock<ModMatcher> {
    SHARED_MATCHER.get_or_init(|| RwLock::new(ModMatcher::new(settings)))
}

/// Get a reference to the global matcher
pub fn shared() -> Option<&'static RwLock<ModMatcher>> {
    SHARED_MATCHER.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_matcher_lifecycle() {
        let lock = init_shared(Settings::default());
        assert!(shared().is_some());

        {
            let mut matcher = lock.write().unwrap();
            matcher.reset();
            matcher.build(["Monsters are Hexproof"]).unwrap();
        }
        {
            let matcher = shared().unwrap().read().unwrap();
            assert_eq!(matcher.match_line("monsters are hexproof"), "Monsters are Hexproof");
        }

        // Second init keeps the existing instance
        let again = init_shared(Settings::conservative());
        assert!(again.read().unwrap().is_built());

        lock.write().unwrap().reset();
        assert!(!lock.read().unwrap().is_built());
    }

    #[test]
    fn test_concurrent_readers() {
        let matcher = ModMatcher::with_vocabulary(
            Settings::default(),
            ["Area is very Alluring", "Monsters are Hexproof"],
        )
        .unwrap();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| matcher.match_line("Area i very Alur~ing")))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), "Area is very Alluring");
            }
        });
    }
}
