//! The three-page controller: high scores, quiz, and results.
//!
//! The navigator only decides which transitions are allowed; it owns no
//! quiz or leaderboard state. Every method returns `true` when the
//! transition happened and `false` when it was refused in the current page.

use crate::common::Rank;
use crate::leaderboard::Placement;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// The leaderboard, optionally highlighting a freshly recorded rank.
    HighScores { highlight: Option<Rank> },
    Quiz,
    /// The final score, and where it would place on the leaderboard.
    Results { score: u32, placement: Placement },
}

impl Page {
    /// Whether this page offers the score-submission form.
    pub fn accepts_submission(&self) -> bool {
        matches!(self, Page::Results { placement, .. } if placement.qualifies())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Page::HighScores { .. } => "high-scores",
            Page::Quiz => "quiz",
            Page::Results { .. } => "results",
        }
    }
}

#[derive(Debug)]
pub struct Navigator {
    page: Page,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            page: Page::HighScores { highlight: None },
        }
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> Page {
        self.page
    }

    /// Whether a quiz may be started from the current page.
    ///
    /// Allowed from the high score page, and from results that offered no
    /// submission form.
    pub fn can_start_quiz(&self) -> bool {
        match self.page {
            Page::HighScores { .. } => true,
            Page::Results { placement, .. } => !placement.qualifies(),
            Page::Quiz => false,
        }
    }

    /// Whether the high score page may be opened by explicit navigation.
    pub fn can_show_high_scores(&self) -> bool {
        self.can_start_quiz()
    }

    pub fn start_quiz(&mut self) -> bool {
        if !self.can_start_quiz() {
            trace!(page = self.page.name(), "start request refused");
            return false;
        }
        self.go(Page::Quiz);
        true
    }

    /// Moves from the quiz to the results page once the session has finished.
    pub fn quiz_finished(&mut self, score: u32, placement: Placement) -> bool {
        if self.page != Page::Quiz {
            trace!(page = self.page.name(), "quiz completion outside the quiz page ignored");
            return false;
        }
        self.go(Page::Results { score, placement });
        true
    }

    /// Returns to the high score page after a qualifying score was recorded at `rank`.
    pub fn score_submitted(&mut self, rank: Rank) -> bool {
        if !self.page.accepts_submission() {
            trace!(page = self.page.name(), "score submission outside the results form ignored");
            return false;
        }
        self.go(Page::HighScores {
            highlight: Some(rank),
        });
        true
    }

    pub fn show_high_scores(&mut self) -> bool {
        if !self.can_show_high_scores() {
            trace!(page = self.page.name(), "high score navigation refused");
            return false;
        }
        self.go(Page::HighScores { highlight: None });
        true
    }

    fn go(&mut self, page: Page) {
        debug!(from = self.page.name(), to = page.name(), "page changed");
        self.page = page;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_high_scores() {
        let nav = Navigator::new();
        assert_eq!(nav.page(), Page::HighScores { highlight: None });
        assert!(nav.can_start_quiz());
    }

    #[test]
    fn qualifying_result_only_leaves_by_submission() {
        let mut nav = Navigator::new();
        assert!(nav.start_quiz());
        assert!(!nav.start_quiz());
        assert!(!nav.show_high_scores());

        assert!(nav.quiz_finished(3, Placement::Ranked(2)));
        assert!(nav.page().accepts_submission());
        assert!(!nav.show_high_scores());
        assert!(!nav.start_quiz());

        assert!(nav.score_submitted(2));
        assert_eq!(nav.page(), Page::HighScores { highlight: Some(2) });
    }

    #[test]
    fn non_qualifying_result_reenables_both_entry_points() {
        let mut nav = Navigator::new();
        nav.start_quiz();
        nav.quiz_finished(0, Placement::Unranked);
        assert!(!nav.page().accepts_submission());
        assert!(!nav.score_submitted(0));
        assert!(nav.can_start_quiz());
        assert!(nav.show_high_scores());
        assert_eq!(nav.page(), Page::HighScores { highlight: None });
    }

    #[test]
    fn completion_outside_quiz_is_ignored() {
        let mut nav = Navigator::new();
        assert!(!nav.quiz_finished(5, Placement::Ranked(0)));
        assert_eq!(nav.page(), Page::HighScores { highlight: None });
    }
}
