//! Poster overlay state
//!
//! The poster is shown until the first frame is ready. Once hidden it
//! stays hidden for the lifetime of the component.

use crate::types::PosterResizeMode;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug)]
pub struct PosterState {
    visible: AtomicBool,
}

impl PosterState {
    /// Visible iff a poster was configured
    pub fn new(has_poster: bool) -> Self {
        Self {
            visible: AtomicBool::new(has_poster),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Acquire)
    }

    /// Hide the poster. Returns true only for the call that performed the
    /// transition.
    pub fn hide(&self) -> bool {
        self.visible.swap(false, Ordering::AcqRel)
    }
}

/// Overlay drawn above the native surface while the poster is visible
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PosterOverlay {
    pub uri: String,
    pub resize_mode: PosterResizeMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        assert!(PosterState::new(true).is_visible());
        assert!(!PosterState::new(false).is_visible());
    }

    #[test]
    fn test_hides_once() {
        let poster = PosterState::new(true);
        assert!(poster.hide());
        assert!(!poster.is_visible());
        assert!(!poster.hide());
        assert!(!poster.is_visible());
    }

    #[test]
    fn test_hidden_poster_never_transitions() {
        let poster = PosterState::new(false);
        assert!(!poster.hide());
        assert!(!poster.is_visible());
    }
}
