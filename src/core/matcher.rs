use serde::Serialize;

use crate::core::scoring::{calculate_match_score, Offerer, Seeker};

/// Scores must be strictly above this to be recommended
pub const DEFAULT_MIN_SCORE: u8 = 30;

/// Number of recommendations returned when the caller gives no limit
pub const DEFAULT_LIMIT: usize = 3;

/// A candidate paired with its match score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedMatch<C> {
    pub candidate: C,
    #[serde(rename = "matchScore")]
    pub match_score: u8,
}

/// Score every candidate, drop those at or below `min_score`, and keep the
/// best `limit` in descending score order
///
/// The sort is stable: candidates with equal scores keep their pool order.
pub fn rank_top_matches<C, F>(
    pool: impl IntoIterator<Item = C>,
    min_score: u8,
    limit: usize,
    mut score: F,
) -> Vec<RankedMatch<C>>
where
    F: FnMut(&C) -> u8,
{
    let mut ranked: Vec<RankedMatch<C>> = pool
        .into_iter()
        .filter_map(|candidate| {
            let match_score = score(&candidate);
            (match_score > min_score).then_some(RankedMatch {
                candidate,
                match_score,
            })
        })
        .collect();

    // Vec::sort_by is stable
    ranked.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    ranked.truncate(limit);

    ranked
}

/// Recommendation front-end over the scorer
///
/// Runs in both directions with the same score function: a seeker looking
/// through offerers, or an offerer looking through seekers.
#[derive(Debug, Clone, Copy)]
pub struct Matcher {
    min_score: u8,
    default_limit: usize,
}

impl Matcher {
    pub fn new(min_score: u8, default_limit: usize) -> Self {
        Self {
            min_score,
            default_limit,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_MIN_SCORE, DEFAULT_LIMIT)
    }

    pub fn min_score(&self) -> u8 {
        self.min_score
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    /// Best offerers (alumni) for a seeker (student)
    pub fn top_offerers<S, O>(
        &self,
        seeker: &S,
        offerers: Vec<O>,
        limit: Option<usize>,
    ) -> Vec<RankedMatch<O>>
    where
        S: Seeker + ?Sized,
        O: Offerer,
    {
        rank_top_matches(
            offerers,
            self.min_score,
            limit.unwrap_or(self.default_limit),
            |offerer| calculate_match_score(seeker, offerer),
        )
    }

    /// Best seekers (students) for an offerer (alumnus)
    pub fn top_seekers<S, O>(
        &self,
        offerer: &O,
        seekers: Vec<S>,
        limit: Option<usize>,
    ) -> Vec<RankedMatch<S>>
    where
        S: Seeker,
        O: Offerer + ?Sized,
    {
        rank_top_matches(
            seekers,
            self.min_score,
            limit.unwrap_or(self.default_limit),
            |seeker| calculate_match_score(seeker, offerer),
        )
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Alumni, Student};

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn create_alumni(name: &str, expertise: &[&str], years: i32) -> Alumni {
        Alumni {
            first_name: name.to_string(),
            expertise: tags(expertise),
            skills: tags(&["python"]),
            mentor_availability: tags(&["weekends"]),
            years_of_experience: years,
            ..Default::default()
        }
    }

    fn create_student() -> Student {
        Student {
            first_name: "Asha".to_string(),
            interests: tags(&["ai", "web"]),
            skills: tags(&["python"]),
            availability: tags(&["evenings"]),
            ..Default::default()
        }
    }

    #[test]
    fn test_rank_filters_and_sorts() {
        let ranked = rank_top_matches(vec![10u8, 31, 30, 90, 55], 30, 10, |s| *s);
        let scores: Vec<u8> = ranked.iter().map(|m| m.match_score).collect();

        assert_eq!(scores, vec![90, 55, 31]);
    }

    #[test]
    fn test_rank_respects_limit() {
        let ranked = rank_top_matches(40u8..=99, 30, 5, |s| *s);

        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[0].match_score, 99);
    }

    #[test]
    fn test_rank_ties_keep_pool_order() {
        let pool = vec![("a", 50u8), ("b", 70), ("c", 50), ("d", 70)];
        let ranked = rank_top_matches(pool, 30, 10, |(_, s)| *s);
        let names: Vec<&str> = ranked.iter().map(|m| m.candidate.0).collect();

        assert_eq!(names, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_rank_empty_pool() {
        let ranked = rank_top_matches(Vec::<u8>::new(), 30, 3, |s| *s);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_top_offerers_for_student() {
        let matcher = Matcher::with_defaults();
        let student = create_student();

        let alumni = vec![
            create_alumni("half", &["ai"], 1),          // 25 + 25 + 15 + 5 = 70
            create_alumni("full", &["ai", "web"], 5),   // 100
            create_alumni("none", &["finance"], 5),     // 50
        ];

        let ranked = matcher.top_offerers(&student, alumni, None);
        let names: Vec<&str> = ranked.iter().map(|m| m.candidate.first_name.as_str()).collect();

        assert_eq!(names, vec!["full", "half", "none"]);
        assert_eq!(ranked[0].match_score, 100);
        assert_eq!(ranked[1].match_score, 70);
        assert_eq!(ranked[2].match_score, 50);
    }

    #[test]
    fn test_top_seekers_for_alumni() {
        let matcher = Matcher::new(30, 5);
        let alumni = create_alumni("mentor", &["ai"], 3);

        let empty = Student::default(); // experience only: 10
        let students = vec![empty, create_student()];

        let ranked = matcher.top_seekers(&alumni, students, None);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].candidate.first_name, "Asha");
    }
}
