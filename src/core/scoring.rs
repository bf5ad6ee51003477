use serde::Serialize;

use crate::core::tags::{count_bidirectional_matches, count_contained_matches, match_ratio};

pub const TOPIC_WEIGHT: f64 = 50.0;
pub const AVAILABILITY_WEIGHT: f64 = 25.0;
pub const SKILL_WEIGHT: f64 = 15.0;
pub const EXPERIENCE_WEIGHT: f64 = 10.0;

/// Experience term awarded below the seniority floor
pub const JUNIOR_EXPERIENCE_SCORE: f64 = 5.0;

/// Years of experience needed for the full experience term
pub const SENIOR_EXPERIENCE_YEARS: u32 = 2;

pub const MAX_SCORE: u8 = 100;

/// The side of a match that is looking for help (a student)
pub trait Seeker {
    fn interests(&self) -> &[String];
    fn skills(&self) -> &[String];
    fn availability(&self) -> &[String];
}

/// The side of a match that offers help (an alumnus)
pub trait Offerer {
    fn expertise(&self) -> &[String];
    fn skills(&self) -> &[String];
    fn mentor_availability(&self) -> &[String];
    fn years_of_experience(&self) -> u32;
}

/// The four weighted terms behind a match score
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub topic: f64,
    pub availability: f64,
    pub skills: f64,
    pub experience: f64,
}

impl ScoreBreakdown {
    /// Sum of the terms rounded half-up and clamped to 0..=100
    pub fn total(&self) -> u8 {
        let sum = self.topic + self.availability + self.skills + self.experience;

        // Terms are non-negative, so f64::round (half away from zero) is half-up here
        sum.round().clamp(0.0, MAX_SCORE as f64) as u8
    }
}

/// Calculate the compatibility score (0-100) of an offerer for a seeker
///
/// Scoring formula:
/// score = round(
///     topic        * 50 +   # share of interests covered by expertise (either direction)
///     availability * 25 +   # both sides declared any availability at all
///     skills       * 15 +   # share of seeker skills contained in an offerer skill
///     experience            # 10 at two years or more, otherwise 5
/// )
///
/// The score is not symmetric: interests are compared against expertise and
/// skill containment only runs from the offerer's side.
pub fn calculate_match_score<S, O>(seeker: &S, offerer: &O) -> u8
where
    S: Seeker + ?Sized,
    O: Offerer + ?Sized,
{
    score_breakdown(seeker, offerer).total()
}

/// Compute each weighted term separately
pub fn score_breakdown<S, O>(seeker: &S, offerer: &O) -> ScoreBreakdown
where
    S: Seeker + ?Sized,
    O: Offerer + ?Sized,
{
    ScoreBreakdown {
        topic: calculate_topic_score(seeker.interests(), offerer.expertise()),
        availability: calculate_availability_score(
            seeker.availability(),
            offerer.mentor_availability(),
        ),
        skills: calculate_skill_score(seeker.skills(), offerer.skills()),
        experience: calculate_experience_score(offerer.years_of_experience()),
    }
}

#[inline]
fn calculate_topic_score(interests: &[String], expertise: &[String]) -> f64 {
    let matched = count_bidirectional_matches(interests, expertise);
    match_ratio(matched, interests.len()) * TOPIC_WEIGHT
}

/// Presence on both sides is enough; the windows themselves are not compared
#[inline]
fn calculate_availability_score(seeker_windows: &[String], offerer_windows: &[String]) -> f64 {
    if !seeker_windows.is_empty() && !offerer_windows.is_empty() {
        AVAILABILITY_WEIGHT
    } else {
        0.0
    }
}

#[inline]
fn calculate_skill_score(seeker_skills: &[String], offerer_skills: &[String]) -> f64 {
    let matched = count_contained_matches(seeker_skills, offerer_skills);
    match_ratio(matched, seeker_skills.len()) * SKILL_WEIGHT
}

#[inline]
fn calculate_experience_score(years: u32) -> f64 {
    if years >= SENIOR_EXPERIENCE_YEARS {
        EXPERIENCE_WEIGHT
    } else {
        JUNIOR_EXPERIENCE_SCORE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Alumni, Student};

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn create_test_student(interests: &[&str], skills: &[&str], availability: &[&str]) -> Student {
        Student {
            interests: tags(interests),
            skills: tags(skills),
            availability: tags(availability),
            ..Default::default()
        }
    }

    fn create_test_alumni(expertise: &[&str], skills: &[&str], windows: &[&str], years: i32) -> Alumni {
        Alumni {
            expertise: tags(expertise),
            skills: tags(skills),
            mentor_availability: tags(windows),
            years_of_experience: years,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_student_only_gets_experience() {
        let student = create_test_student(&[], &[], &[]);
        let alumni = create_test_alumni(&[], &[], &[], 5);

        assert_eq!(calculate_match_score(&student, &alumni), 10);
    }

    #[test]
    fn test_full_match() {
        let student = create_test_student(&["ai"], &["python"], &["evenings"]);
        let alumni = create_test_alumni(&["ai", "ml"], &["python", "react"], &["weekends"], 3);

        let breakdown = score_breakdown(&student, &alumni);
        assert_eq!(breakdown.topic, 50.0);
        assert_eq!(breakdown.availability, 25.0);
        assert_eq!(breakdown.skills, 15.0);
        assert_eq!(breakdown.experience, 10.0);
        assert_eq!(calculate_match_score(&student, &alumni), 100);
    }

    #[test]
    fn test_experience_floor() {
        assert_eq!(calculate_experience_score(0), 5.0);
        assert_eq!(calculate_experience_score(1), 5.0);
        assert_eq!(calculate_experience_score(2), 10.0);
        assert_eq!(calculate_experience_score(30), 10.0);
    }

    #[test]
    fn test_negative_experience_treated_as_junior() {
        let student = create_test_student(&[], &[], &[]);
        let alumni = create_test_alumni(&[], &[], &[], -4);

        assert_eq!(calculate_match_score(&student, &alumni), 5);
    }

    #[test]
    fn test_availability_needs_both_sides() {
        assert_eq!(calculate_availability_score(&tags(&["mon"]), &tags(&["tue"])), 25.0);
        assert_eq!(calculate_availability_score(&tags(&["mon"]), &[]), 0.0);
        assert_eq!(calculate_availability_score(&[], &tags(&["tue"])), 0.0);
    }

    #[test]
    fn test_partial_topic_rounds_half_up() {
        // 1 of 4 interests = 12.5, + 5 experience = 17.5 -> 18
        let student = create_test_student(&["ai", "rust", "go", "web"], &[], &[]);
        let alumni = create_test_alumni(&["ai"], &[], &[], 0);

        assert_eq!(calculate_match_score(&student, &alumni), 18);
    }

    #[test]
    fn test_thirds_round_to_nearest() {
        // 1/3 * 50 = 16.67 and 2/3 * 15 = 10.0, + 10 = 36.67 -> 37
        let student = create_test_student(&["ai", "rust", "go"], &["python", "sql", "c++"], &[]);
        let alumni = create_test_alumni(&["machine learning, ai"], &["python3", "postgresql"], &[], 4);

        assert_eq!(calculate_match_score(&student, &alumni), 37);
    }

    #[test]
    fn test_breakdown_total_is_clamped() {
        let breakdown = ScoreBreakdown {
            topic: 80.0,
            availability: 25.0,
            skills: 15.0,
            experience: 10.0,
        };
        assert_eq!(breakdown.total(), 100);
    }
}
