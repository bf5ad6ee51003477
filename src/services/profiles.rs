use uuid::Uuid;

use crate::models::{
    AccountStatus, Admin, Alumni, Credentials, PlatformStats, RegisterAdminRequest,
    RegisterAlumniRequest, RegisterStudentRequest, Student, UpdateAlumniRequest,
    UpdateStudentRequest,
};
use crate::services::postgres::{PostgresClient, PostgresError};

const STUDENT_COLUMNS: &str = "id, first_name, last_name, email, phone, photo, college_name, \
    year, branch, skills, interests, project_topic, learning_goals, availability, \
    preferred_mentor_fields, account_status, created_at, updated_at";

const ALUMNI_COLUMNS: &str = "id, first_name, last_name, email, phone, photo, linkedin_url, \
    company, designation, department, years_of_experience, skills, expertise, industries, \
    mentorship_interests, availability_per_week, mentor_availability, college_alumnus, batch, \
    account_status, invitation_status, created_at, updated_at";

/// Emails are stored and looked up lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl PostgresClient {
    // ---- students ----

    pub async fn student_email_exists(&self, email: &str) -> Result<bool, PostgresError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM students WHERE email = $1)")
            .bind(normalize_email(email))
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    pub async fn find_student_credentials(
        &self,
        email: &str,
    ) -> Result<Option<Credentials>, PostgresError> {
        let credentials = sqlx::query_as::<_, Credentials>(
            "SELECT id, password_hash FROM students WHERE email = $1",
        )
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;

        Ok(credentials)
    }

    /// Insert a student with empty skills, interests and availability
    pub async fn create_student(
        &self,
        request: &RegisterStudentRequest,
        password_hash: &str,
    ) -> Result<Student, PostgresError> {
        let query = format!(
            r#"
            INSERT INTO students (id, first_name, last_name, email, password_hash, phone, college_name, year, branch)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            STUDENT_COLUMNS
        );

        let student = sqlx::query_as::<_, Student>(&query)
            .bind(Uuid::new_v4())
            .bind(request.first_name.trim())
            .bind(request.last_name.trim())
            .bind(normalize_email(&request.email))
            .bind(password_hash)
            .bind(request.phone.as_deref().unwrap_or(""))
            .bind(request.college_name.trim())
            .bind(request.year)
            .bind(request.branch.trim())
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!("Created student {}", student.id);

        Ok(student)
    }

    pub async fn get_student(&self, id: Uuid) -> Result<Option<Student>, PostgresError> {
        let query = format!("SELECT {} FROM students WHERE id = $1", STUDENT_COLUMNS);

        let student = sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(student)
    }

    /// Apply the present fields of `update`; returns `None` if the student does not exist
    pub async fn update_student(
        &self,
        id: Uuid,
        update: &UpdateStudentRequest,
    ) -> Result<Option<Student>, PostgresError> {
        let query = format!(
            r#"
            UPDATE students SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                phone = COALESCE($4, phone),
                photo = COALESCE($5, photo),
                skills = COALESCE($6, skills),
                interests = COALESCE($7, interests),
                project_topic = COALESCE($8, project_topic),
                learning_goals = COALESCE($9, learning_goals),
                availability = COALESCE($10, availability),
                preferred_mentor_fields = COALESCE($11, preferred_mentor_fields),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            STUDENT_COLUMNS
        );

        let student = sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .bind(update.first_name.as_deref().map(str::trim))
            .bind(update.last_name.as_deref().map(str::trim))
            .bind(update.phone.as_deref())
            .bind(update.photo.as_deref())
            .bind(update.skills.as_deref())
            .bind(update.interests.as_deref())
            .bind(update.project_topic.as_deref())
            .bind(update.learning_goals.as_deref())
            .bind(update.availability.as_deref())
            .bind(update.preferred_mentor_fields.as_deref())
            .fetch_optional(&self.pool)
            .await?;

        Ok(student)
    }

    /// Active students, newest first
    pub async fn list_active_students(&self) -> Result<Vec<Student>, PostgresError> {
        let query = format!(
            "SELECT {} FROM students WHERE account_status = 'active' ORDER BY created_at DESC, id",
            STUDENT_COLUMNS
        );

        let students = sqlx::query_as::<_, Student>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(students)
    }

    // ---- alumni ----

    pub async fn alumni_email_exists(&self, email: &str) -> Result<bool, PostgresError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM alumni WHERE email = $1)")
            .bind(normalize_email(email))
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    pub async fn find_alumni_credentials(
        &self,
        email: &str,
    ) -> Result<Option<Credentials>, PostgresError> {
        let credentials = sqlx::query_as::<_, Credentials>(
            "SELECT id, password_hash FROM alumni WHERE email = $1",
        )
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;

        Ok(credentials)
    }

    pub async fn create_alumni(
        &self,
        request: &RegisterAlumniRequest,
        password_hash: &str,
    ) -> Result<Alumni, PostgresError> {
        let query = format!(
            r#"
            INSERT INTO alumni (id, first_name, last_name, email, password_hash, phone, company,
                                designation, expertise, skills, years_of_experience)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            ALUMNI_COLUMNS
        );

        let alumni = sqlx::query_as::<_, Alumni>(&query)
            .bind(Uuid::new_v4())
            .bind(request.first_name.trim())
            .bind(request.last_name.trim())
            .bind(normalize_email(&request.email))
            .bind(password_hash)
            .bind(request.phone.as_deref().unwrap_or(""))
            .bind(request.company.trim())
            .bind(request.designation.trim())
            .bind(&request.expertise)
            .bind(&request.skills)
            .bind(request.years_of_experience)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!("Created alumni {}", alumni.id);

        Ok(alumni)
    }

    pub async fn get_alumni(&self, id: Uuid) -> Result<Option<Alumni>, PostgresError> {
        let query = format!("SELECT {} FROM alumni WHERE id = $1", ALUMNI_COLUMNS);

        let alumni = sqlx::query_as::<_, Alumni>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(alumni)
    }

    pub async fn update_alumni(
        &self,
        id: Uuid,
        update: &UpdateAlumniRequest,
    ) -> Result<Option<Alumni>, PostgresError> {
        let query = format!(
            r#"
            UPDATE alumni SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                phone = COALESCE($4, phone),
                photo = COALESCE($5, photo),
                linkedin_url = COALESCE($6, linkedin_url),
                company = COALESCE($7, company),
                designation = COALESCE($8, designation),
                department = COALESCE($9, department),
                years_of_experience = COALESCE($10, years_of_experience),
                skills = COALESCE($11, skills),
                expertise = COALESCE($12, expertise),
                industries = COALESCE($13, industries),
                mentorship_interests = COALESCE($14, mentorship_interests),
                availability_per_week = COALESCE($15, availability_per_week),
                mentor_availability = COALESCE($16, mentor_availability),
                college_alumnus = COALESCE($17, college_alumnus),
                batch = COALESCE($18, batch),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            ALUMNI_COLUMNS
        );

        let alumni = sqlx::query_as::<_, Alumni>(&query)
            .bind(id)
            .bind(update.first_name.as_deref().map(str::trim))
            .bind(update.last_name.as_deref().map(str::trim))
            .bind(update.phone.as_deref())
            .bind(update.photo.as_deref())
            .bind(update.linkedin_url.as_deref())
            .bind(update.company.as_deref())
            .bind(update.designation.as_deref())
            .bind(update.department.as_deref())
            .bind(update.years_of_experience)
            .bind(update.skills.as_deref())
            .bind(update.expertise.as_deref())
            .bind(update.industries.as_deref())
            .bind(update.mentorship_interests.as_deref())
            .bind(update.availability_per_week.as_deref())
            .bind(update.mentor_availability.as_deref())
            .bind(update.college_alumnus.as_deref())
            .bind(update.batch)
            .fetch_optional(&self.pool)
            .await?;

        Ok(alumni)
    }

    /// Active alumni in registration order
    ///
    /// This is the candidate pool order, so ranking ties resolve to the
    /// longest-registered alumnus.
    pub async fn list_active_alumni(&self) -> Result<Vec<Alumni>, PostgresError> {
        let query = format!(
            "SELECT {} FROM alumni WHERE account_status = 'active' ORDER BY created_at, id",
            ALUMNI_COLUMNS
        );

        let alumni = sqlx::query_as::<_, Alumni>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(alumni)
    }

    /// Every alumni account regardless of status, newest first
    pub async fn list_all_alumni(&self) -> Result<Vec<Alumni>, PostgresError> {
        let query = format!("SELECT {} FROM alumni ORDER BY created_at DESC, id", ALUMNI_COLUMNS);

        let alumni = sqlx::query_as::<_, Alumni>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(alumni)
    }

    pub async fn set_alumni_status(
        &self,
        id: Uuid,
        status: AccountStatus,
    ) -> Result<Option<Alumni>, PostgresError> {
        let query = format!(
            "UPDATE alumni SET account_status = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            ALUMNI_COLUMNS
        );

        let alumni = sqlx::query_as::<_, Alumni>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(alumni) = &alumni {
            tracing::info!("Alumni {} account status set to {:?}", alumni.id, status);
        }

        Ok(alumni)
    }

    /// Delete an alumnus together with their connections
    ///
    /// Returns false when no such alumnus exists.
    pub async fn delete_alumni(&self, id: Uuid) -> Result<bool, PostgresError> {
        let mut tx = self.pool.begin().await?;

        let connections = sqlx::query("DELETE FROM connections WHERE alumni_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM alumni WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;

        tracing::info!(
            "Deleted alumni {} and {} connections",
            id,
            connections.rows_affected()
        );

        Ok(true)
    }

    // ---- admins ----

    pub async fn admin_email_exists(&self, email: &str) -> Result<bool, PostgresError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM admins WHERE email = $1)")
            .bind(normalize_email(email))
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    pub async fn find_admin_credentials(
        &self,
        email: &str,
    ) -> Result<Option<Credentials>, PostgresError> {
        let credentials = sqlx::query_as::<_, Credentials>(
            "SELECT id, password_hash FROM admins WHERE email = $1",
        )
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;

        Ok(credentials)
    }

    pub async fn create_admin(
        &self,
        request: &RegisterAdminRequest,
        password_hash: &str,
    ) -> Result<Admin, PostgresError> {
        let admin = sqlx::query_as::<_, Admin>(
            r#"
            INSERT INTO admins (id, name, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.name.trim())
        .bind(normalize_email(&request.email))
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(admin)
    }

    pub async fn get_admin(&self, id: Uuid) -> Result<Option<Admin>, PostgresError> {
        let admin = sqlx::query_as::<_, Admin>(
            "SELECT id, name, email, created_at FROM admins WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }

    /// Platform-wide account and connection counts
    pub async fn platform_stats(&self) -> Result<PlatformStats, PostgresError> {
        let query = r#"
            SELECT
                (SELECT COUNT(*) FROM students) AS total_students,
                (SELECT COUNT(*) FROM alumni) AS total_alumni,
                (SELECT COUNT(*) FROM alumni WHERE account_status = 'active') AS active_alumni,
                (SELECT COUNT(*) FROM alumni WHERE account_status = 'pending') AS pending_alumni,
                (SELECT COUNT(*) FROM connections) AS total_connections,
                (SELECT COUNT(*) FROM connections WHERE status = 'active') AS active_connections,
                (SELECT COUNT(*) FROM connections WHERE status = 'pending') AS pending_connections
        "#;

        let (
            total_students,
            total_alumni,
            active_alumni,
            pending_alumni,
            total_connections,
            active_connections,
            pending_connections,
        ): (i64, i64, i64, i64, i64, i64, i64) = sqlx::query_as(query).fetch_one(&self.pool).await?;

        Ok(PlatformStats {
            total_students,
            total_alumni,
            active_alumni,
            pending_alumni,
            total_connections,
            active_connections,
            pending_connections,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Asha.Rao@Example.EDU "), "asha.rao@example.edu");
    }

    #[test]
    fn test_column_lists_exclude_password_hash() {
        assert!(!STUDENT_COLUMNS.contains("password_hash"));
        assert!(!ALUMNI_COLUMNS.contains("password_hash"));
    }
}
