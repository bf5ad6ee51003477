use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::domain::{ParticipantType, PostType};

/// Fields a student may change on their own profile
pub const STUDENT_UPDATABLE_FIELDS: &[&str] = &[
    "firstName",
    "lastName",
    "phone",
    "skills",
    "interests",
    "projectTopic",
    "learningGoals",
    "availability",
    "preferredMentorFields",
    "photo",
];

/// Fields an alumnus may change on their own profile
pub const ALUMNI_UPDATABLE_FIELDS: &[&str] = &[
    "firstName",
    "lastName",
    "phone",
    "photo",
    "linkedInURL",
    "company",
    "designation",
    "department",
    "yearsOfExperience",
    "skills",
    "expertise",
    "industries",
    "mentorshipInterests",
    "availabilityPerWeek",
    "mentorAvailability",
    "collegeAlumnus",
    "batch",
];

fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Reject a raw update body that touches any field outside `allowed`
///
/// Returns the message for the first offending field.
pub fn check_updatable_fields(body: &Map<String, Value>, allowed: &[&str]) -> Result<(), String> {
    match body.keys().find(|field| !allowed.contains(&field.as_str())) {
        Some(field) => Err(format!("{} cannot be updated", field)),
        None => Ok(()),
    }
}

/// Trim free text and strip angle brackets
pub fn sanitize_input(input: &str) -> String {
    input.trim().replace(['<', '>'], "")
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterStudentRequest {
    #[validate(custom(function = "non_blank", message = "First name required"))]
    pub first_name: String,
    #[validate(custom(function = "non_blank", message = "Last name required"))]
    pub last_name: String,
    #[validate(email(message = "Email required"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be 6+ characters"))]
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[validate(custom(function = "non_blank", message = "College name required"))]
    pub college_name: String,
    #[validate(range(min = 1, max = 4, message = "Valid year required (1-4)"))]
    pub year: i16,
    #[validate(custom(function = "non_blank", message = "Branch required"))]
    pub branch: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAlumniRequest {
    #[validate(custom(function = "non_blank", message = "First name required"))]
    pub first_name: String,
    #[validate(custom(function = "non_blank", message = "Last name required"))]
    pub last_name: String,
    #[validate(email(message = "Email required"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be 6+ characters"))]
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[validate(custom(function = "non_blank", message = "Company required"))]
    pub company: String,
    #[validate(custom(function = "non_blank", message = "Designation required"))]
    pub designation: String,
    #[serde(default)]
    pub expertise: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    #[validate(range(min = 0, message = "Years of experience cannot be negative"))]
    pub years_of_experience: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAdminRequest {
    #[validate(custom(function = "non_blank", message = "Name required"))]
    pub name: String,
    #[validate(email(message = "Email required"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be 6+ characters"))]
    pub password: String,
    #[serde(default)]
    pub secret_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    pub fn is_complete(&self) -> bool {
        !self.email.trim().is_empty() && !self.password.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentRequest {
    #[validate(custom(function = "non_blank", message = "First name required"))]
    pub first_name: Option<String>,
    #[validate(custom(function = "non_blank", message = "Last name required"))]
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub photo: Option<String>,
    pub skills: Option<Vec<String>>,
    pub interests: Option<Vec<String>>,
    pub project_topic: Option<String>,
    pub learning_goals: Option<String>,
    pub availability: Option<Vec<String>>,
    pub preferred_mentor_fields: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAlumniRequest {
    #[validate(custom(function = "non_blank", message = "First name required"))]
    pub first_name: Option<String>,
    #[validate(custom(function = "non_blank", message = "Last name required"))]
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub photo: Option<String>,
    #[serde(rename = "linkedInURL")]
    pub linkedin_url: Option<String>,
    pub company: Option<String>,
    pub designation: Option<String>,
    pub department: Option<String>,
    #[validate(range(min = 0, message = "Years of experience cannot be negative"))]
    pub years_of_experience: Option<i32>,
    pub skills: Option<Vec<String>>,
    pub expertise: Option<Vec<String>>,
    pub industries: Option<Vec<String>>,
    pub mentorship_interests: Option<Vec<String>>,
    pub availability_per_week: Option<String>,
    pub mentor_availability: Option<Vec<String>>,
    pub college_alumnus: Option<String>,
    pub batch: Option<i32>,
}

/// Optional limit on recommendation endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchesQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConnectionRequest {
    pub student_id: Option<Uuid>,
    pub alumni_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub connection_id: Option<Uuid>,
    pub sender_id: Option<Uuid>,
    pub sender_type: Option<ParticipantType>,
    pub receiver_id: Option<Uuid>,
    pub message: Option<String>,
}

/// A message with every required field present
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub connection_id: Uuid,
    pub sender_id: Uuid,
    pub sender_type: ParticipantType,
    pub receiver_id: Uuid,
    pub message: String,
}

impl SendMessageRequest {
    /// `None` when any field is missing or the text is blank
    pub fn into_new_message(self) -> Option<NewMessage> {
        let message = self.message.map(|m| m.trim().to_string()).filter(|m| !m.is_empty())?;

        Some(NewMessage {
            connection_id: self.connection_id?,
            sender_id: self.sender_id?,
            sender_type: self.sender_type?,
            receiver_id: self.receiver_id?,
            message,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub image: Option<String>,
    pub post_type: Option<PostType>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub author_name: Option<String>,
    pub author_photo: Option<String>,
    pub author_company: Option<String>,
    pub author_type: Option<ParticipantType>,
}

/// Post fields after defaults and sanitising
#[derive(Debug, Clone)]
pub struct NewPost {
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
}

impl CreatePostRequest {
    /// Apply defaults for the given author; `None` when title or content is missing
    pub fn into_new_post(self, author_id: Uuid, fallback_type: ParticipantType) -> Option<NewPost> {
        let title = self.title.as_deref().map(sanitize_input).filter(|t| !t.is_empty())?;
        let content = self.content.as_deref().map(sanitize_input).filter(|c| !c.is_empty())?;

        Some(NewPost {
            author_id,
            author_type: self.author_type.unwrap_or(fallback_type),
            author_name: self
                .author_name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| "Anonymous".to_string()),
            author_photo: self.author_photo,
            author_company: self.author_company,
            title,
            description: self.description.as_deref().map(sanitize_input),
            content,
            image: self.image,
            post_type: self.post_type.unwrap_or_default(),
            tags: self.tags,
            category: self
                .category
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| "general".to_string()),
        })
    }
}

/// Partial post edit; absent or empty fields keep their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub image: Option<String>,
    pub post_type: Option<PostType>,
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
}

impl UpdatePostRequest {
    /// Drop empty strings and sanitise the text fields
    pub fn sanitized(self) -> Self {
        let clean = |value: Option<String>| {
            value
                .as_deref()
                .map(sanitize_input)
                .filter(|v| !v.is_empty())
        };

        Self {
            title: clean(self.title),
            description: clean(self.description),
            content: clean(self.content),
            image: self.image.filter(|v| !v.is_empty()),
            post_type: self.post_type,
            tags: self.tags,
            category: self.category.filter(|v| !v.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub text: Option<String>,
    pub commentor_name: Option<String>,
    pub commentor_photo: Option<String>,
    pub commentor_type: Option<ParticipantType>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest {
    pub sender_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExploreQuery {
    pub category: Option<String>,
    pub post_type: Option<PostType>,
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn student_registration() -> RegisterStudentRequest {
        RegisterStudentRequest {
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            email: "asha@example.edu".to_string(),
            password: "secret1".to_string(),
            phone: None,
            college_name: "State College".to_string(),
            year: 3,
            branch: "CSE".to_string(),
        }
    }

    #[test]
    fn test_student_registration_valid() {
        assert!(student_registration().validate().is_ok());
    }

    #[test]
    fn test_student_registration_rejects_short_password() {
        let mut request = student_registration();
        request.password = "abc".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_student_registration_rejects_bad_year() {
        let mut request = student_registration();
        request.year = 5;
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_student_registration_rejects_blank_branch() {
        let mut request = student_registration();
        request.branch = "   ".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_alumni_registration_rejects_negative_experience() {
        let request: RegisterAlumniRequest = serde_json::from_value(json!({
            "firstName": "Ravi",
            "lastName": "Iyer",
            "email": "ravi@example.com",
            "password": "secret1",
            "company": "Acme",
            "designation": "Engineer",
            "yearsOfExperience": -1
        }))
        .unwrap();

        assert!(request.expertise.is_empty());
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_check_updatable_fields() {
        let body = json!({ "interests": ["ai"], "skills": [] });
        assert!(check_updatable_fields(body.as_object().unwrap(), STUDENT_UPDATABLE_FIELDS).is_ok());

        let body = json!({ "email": "new@example.edu" });
        assert_eq!(
            check_updatable_fields(body.as_object().unwrap(), STUDENT_UPDATABLE_FIELDS),
            Err("email cannot be updated".to_string())
        );
    }

    #[test]
    fn test_sanitize_input() {
        assert_eq!(sanitize_input("  <b>hello</b> "), "bhello/b");
    }

    #[test]
    fn test_send_message_requires_all_fields() {
        let request: SendMessageRequest = serde_json::from_value(json!({
            "connectionId": "7f3c2e9a-1b4d-4c8e-9f0a-2b3c4d5e6f70",
            "senderId": "7f3c2e9a-1b4d-4c8e-9f0a-2b3c4d5e6f71",
            "senderType": "student",
            "receiverId": "7f3c2e9a-1b4d-4c8e-9f0a-2b3c4d5e6f72",
            "message": "   "
        }))
        .unwrap();

        assert!(request.into_new_message().is_none());
    }

    #[test]
    fn test_new_post_defaults() {
        let request = CreatePostRequest {
            title: Some(" Internship <open> ".to_string()),
            content: Some("Apply by Friday".to_string()),
            ..Default::default()
        };

        let post = request
            .into_new_post(Uuid::nil(), ParticipantType::Alumni)
            .unwrap();

        assert_eq!(post.title, "Internship open");
        assert_eq!(post.author_name, "Anonymous");
        assert_eq!(post.category, "general");
        assert_eq!(post.post_type, PostType::Other);
        assert_eq!(post.author_type, ParticipantType::Alumni);
    }

    #[test]
    fn test_new_post_requires_title_and_content() {
        let request = CreatePostRequest {
            title: Some("Only a title".to_string()),
            ..Default::default()
        };
        assert!(request.into_new_post(Uuid::nil(), ParticipantType::Student).is_none());
    }
}
