use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::scoring::{Offerer, Seeker};

/// Lifecycle of a student or alumni account
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Pending,
    #[default]
    Active,
    Inactive,
    Rejected,
    Deleted,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "invitation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

/// Account kind carried in access tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Alumni,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Alumni => "alumni",
            Role::Admin => "admin",
        }
    }
}

/// Which side of a mentorship a message, post or comment comes from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "participant_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ParticipantType {
    #[default]
    Student,
    Alumni,
}

impl ParticipantType {
    /// Participant side for a token role; admins post as alumni
    pub fn from_role(role: Role) -> Self {
        match role {
            Role::Student => ParticipantType::Student,
            Role::Alumni | Role::Admin => ParticipantType::Alumni,
        }
    }
}

/// Student seeking mentorship
#[derive(Debug, Clone, Default, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    pub college_name: String,
    pub year: i16,
    pub branch: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub project_topic: Option<String>,
    #[serde(default)]
    pub learning_goals: Option<String>,
    #[serde(default)]
    pub availability: Vec<String>,
    #[serde(default)]
    pub preferred_mentor_fields: Vec<String>,
    #[serde(default)]
    pub account_status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Seeker for Student {
    fn interests(&self) -> &[String] {
        &self.interests
    }

    fn skills(&self) -> &[String] {
        &self.skills
    }

    fn availability(&self) -> &[String] {
        &self.availability
    }
}

/// Alumnus offering mentorship
#[derive(Debug, Clone, Default, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Alumni {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(rename = "linkedInURL", default)]
    pub linkedin_url: Option<String>,
    pub company: String,
    pub designation: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub years_of_experience: i32,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub expertise: Vec<String>,
    #[serde(default)]
    pub industries: Vec<String>,
    #[serde(default)]
    pub mentorship_interests: Vec<String>,
    #[serde(default)]
    pub availability_per_week: Option<String>,
    #[serde(default)]
    pub mentor_availability: Vec<String>,
    #[serde(default)]
    pub college_alumnus: Option<String>,
    #[serde(default)]
    pub batch: Option<i32>,
    #[serde(default)]
    pub account_status: AccountStatus,
    #[serde(default)]
    pub invitation_status: InvitationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Alumni {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Offerer for Alumni {
    fn expertise(&self) -> &[String] {
        &self.expertise
    }

    fn skills(&self) -> &[String] {
        &self.skills
    }

    fn mentor_availability(&self) -> &[String] {
        &self.mentor_availability
    }

    fn years_of_experience(&self) -> u32 {
        u32::try_from(self.years_of_experience).unwrap_or(0)
    }
}

/// Platform administrator
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Id and stored password hash, used only to check credentials
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Credentials {
    pub id: Uuid,
    pub password_hash: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "connection_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    #[default]
    Pending,
    Active,
    Completed,
    Rejected,
}

/// An alumnus' answer to a connection request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionDecision {
    Accept,
    Reject,
}

impl ConnectionStatus {
    /// Status after the alumnus answers, or `None` if the connection is not
    /// waiting for an answer
    pub fn respond(self, decision: ConnectionDecision) -> Option<ConnectionStatus> {
        match (self, decision) {
            (ConnectionStatus::Pending, ConnectionDecision::Accept) => Some(ConnectionStatus::Active),
            (ConnectionStatus::Pending, ConnectionDecision::Reject) => Some(ConnectionStatus::Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "initiated_by", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InitiatedBy {
    #[default]
    System,
    Student,
    Alumni,
}

/// Mentorship link between one student and one alumnus
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: Uuid,
    pub student_id: Uuid,
    pub alumni_id: Uuid,
    pub match_score: i16,
    pub status: ConnectionStatus,
    pub initiated_by: InitiatedBy,
    pub last_message_at: Option<DateTime<Utc>>,
    pub last_activity_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Connection {
    /// Side of the connection `id` sits on, if any
    pub fn side_of(&self, id: Uuid) -> Option<ParticipantType> {
        if id == self.student_id {
            Some(ParticipantType::Student)
        } else if id == self.alumni_id {
            Some(ParticipantType::Alumni)
        } else {
            None
        }
    }

    pub fn involves(&self, id: Uuid) -> bool {
        self.side_of(id).is_some()
    }

    /// True when `sender_id` and `receiver_id` are the two opposite sides
    pub fn links(&self, sender_id: Uuid, receiver_id: Uuid) -> bool {
        (sender_id == self.student_id && receiver_id == self.alumni_id)
            || (sender_id == self.alumni_id && receiver_id == self.student_id)
    }
}

/// Pending request as shown to the alumnus
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRequestView {
    pub id: Uuid,
    pub student_id: Uuid,
    pub student_name: String,
    pub student_email: String,
    pub student_college: String,
    pub student_skills: Vec<String>,
    pub student_interests: Vec<String>,
    pub match_score: i16,
    pub created_at: DateTime<Utc>,
}

/// Active connection as shown to the alumnus
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedStudentView {
    pub id: Uuid,
    pub student_id: Uuid,
    pub student_name: String,
    pub student_email: String,
    pub student_college: String,
    pub match_score: i16,
    pub connected_at: DateTime<Utc>,
}

/// Active connection as shown to the student
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedAlumniView {
    pub id: Uuid,
    pub alumni_id: Uuid,
    pub alumni_name: String,
    pub alumni_email: String,
    pub alumni_company: String,
    pub alumni_designation: String,
    pub alumni_expertise: Vec<String>,
    pub alumni_skills: Vec<String>,
    pub alumni_experience: i32,
    pub match_score: i16,
    pub connected_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "message_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    #[default]
    Text,
    Image,
    File,
    Link,
}

/// Direct message inside a connection
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub connection_id: Uuid,
    pub sender_id: Uuid,
    pub sender_type: ParticipantType,
    pub receiver_id: Uuid,
    pub message: String,
    pub message_type: MessageType,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "post_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    Opportunity,
    Course,
    Project,
    Article,
    Achievement,
    Tip,
    #[default]
    Other,
}

/// Feed post
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_type: ParticipantType,
    pub author_name: String,
    pub author_photo: Option<String>,
    pub author_company: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub content: String,
    pub image: Option<String>,
    pub post_type: PostType,
    pub tags: Vec<String>,
    pub category: String,
    pub likes: Vec<Uuid>,
    pub saves: Vec<Uuid>,
    pub views: i32,
    pub is_edited: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Post {
    pub fn is_liked_by(&self, user_id: Uuid) -> bool {
        self.likes.contains(&user_id)
    }

    pub fn is_saved_by(&self, user_id: Uuid) -> bool {
        self.saves.contains(&user_id)
    }
}

/// Comment on a feed post
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub commentor_id: Uuid,
    pub commentor_name: String,
    pub commentor_photo: Option<String>,
    pub commentor_type: ParticipantType,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Like,
    Comment,
    Mention,
    Connection,
    Message,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub sender_id: Uuid,
    pub sender_name: Option<String>,
    pub sender_photo: Option<String>,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub post_id: Option<Uuid>,
    pub connection_id: Option<Uuid>,
    pub message: Option<String>,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Notification to be stored; ids and timestamps are assigned by the database
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub recipient_id: Uuid,
    pub sender_id: Uuid,
    pub sender_name: String,
    pub notification_type: NotificationType,
    pub post_id: Option<Uuid>,
    pub connection_id: Option<Uuid>,
    pub message: String,
}

/// Aggregate counts for the admin dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStats {
    pub total_students: i64,
    pub total_alumni: i64,
    pub active_alumni: i64,
    pub pending_alumni: i64,
    pub total_connections: i64,
    pub active_connections: i64,
    pub pending_connections: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_respond_from_pending() {
        assert_eq!(
            ConnectionStatus::Pending.respond(ConnectionDecision::Accept),
            Some(ConnectionStatus::Active)
        );
        assert_eq!(
            ConnectionStatus::Pending.respond(ConnectionDecision::Reject),
            Some(ConnectionStatus::Rejected)
        );
    }

    #[test]
    fn test_connection_respond_only_once() {
        for status in [ConnectionStatus::Active, ConnectionStatus::Completed, ConnectionStatus::Rejected] {
            assert_eq!(status.respond(ConnectionDecision::Accept), None);
            assert_eq!(status.respond(ConnectionDecision::Reject), None);
        }
    }

    #[test]
    fn test_student_missing_tags_default_to_empty() {
        let json = r#"{
            "id": "7f3c2e9a-1b4d-4c8e-9f0a-2b3c4d5e6f70",
            "firstName": "Asha",
            "lastName": "Rao",
            "email": "asha@example.edu",
            "collegeName": "State College",
            "year": 3,
            "branch": "CSE",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        }"#;

        let student: Student = serde_json::from_str(json).unwrap();
        assert!(student.interests.is_empty());
        assert!(student.availability.is_empty());
        assert_eq!(student.account_status, AccountStatus::Active);
        assert_eq!(student.full_name(), "Asha Rao");
    }

    #[test]
    fn test_alumni_missing_experience_defaults_to_zero() {
        let alumni = Alumni::default();
        assert_eq!(Offerer::years_of_experience(&alumni), 0);
        assert_eq!(alumni.invitation_status, InvitationStatus::Pending);
    }

    #[test]
    fn test_notification_type_serializes_lowercase() {
        let value = serde_json::to_value(NotificationType::Connection).unwrap();
        assert_eq!(value, "connection");
    }

    fn connection(student_id: Uuid, alumni_id: Uuid) -> Connection {
        Connection {
            id: Uuid::new_v4(),
            student_id,
            alumni_id,
            match_score: 85,
            status: ConnectionStatus::Active,
            initiated_by: InitiatedBy::Student,
            last_message_at: None,
            last_activity_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_connection_sides() {
        let (student, alumni, outsider) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let conn = connection(student, alumni);

        assert_eq!(conn.side_of(student), Some(ParticipantType::Student));
        assert_eq!(conn.side_of(alumni), Some(ParticipantType::Alumni));
        assert_eq!(conn.side_of(outsider), None);
        assert!(conn.involves(alumni));
        assert!(!conn.involves(outsider));
    }

    #[test]
    fn test_connection_links_only_opposite_sides() {
        let (student, alumni, outsider) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let conn = connection(student, alumni);

        assert!(conn.links(student, alumni));
        assert!(conn.links(alumni, student));
        assert!(!conn.links(student, student));
        assert!(!conn.links(student, outsider));
        assert!(!conn.links(outsider, alumni));
    }

    #[test]
    fn test_participant_from_role() {
        assert_eq!(ParticipantType::from_role(Role::Student), ParticipantType::Student);
        assert_eq!(ParticipantType::from_role(Role::Alumni), ParticipantType::Alumni);
    }
}
