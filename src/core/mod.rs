// Core algorithm exports
pub mod matcher;
pub mod scoring;
pub mod tags;

pub use matcher::{rank_top_matches, Matcher, RankedMatch, DEFAULT_LIMIT, DEFAULT_MIN_SCORE};
pub use scoring::{calculate_match_score, score_breakdown, Offerer, ScoreBreakdown, Seeker};
pub use tags::{count_bidirectional_matches, count_contained_matches, normalize_tags};
