//! Mentor Match - mentorship matching service for students and alumni
//!
//! The core of the library is a weighted compatibility score between a
//! student (seeker) and an alumnus (offerer), and a ranking step that turns
//! a pool of candidates into a short list of recommendations. Around it sit
//! the HTTP API, PostgreSQL storage and token authentication.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{calculate_match_score, rank_top_matches, Matcher, Offerer, RankedMatch, Seeker};
pub use models::{Alumni, AlumniMatch, Student, StudentMatch};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let student = Student::default();
        let alumni = Alumni::default();
        assert_eq!(calculate_match_score(&student, &alumni), 10);
    }
}
