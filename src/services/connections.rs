use uuid::Uuid;

use crate::models::{
    Connection, ConnectionRequestView, ConnectionStatus, ConnectedAlumniView,
    ConnectedStudentView, InitiatedBy, Message, NewMessage,
};
use crate::services::postgres::{PostgresClient, PostgresError};

impl PostgresClient {
    pub async fn get_connection(&self, id: Uuid) -> Result<Option<Connection>, PostgresError> {
        let connection = sqlx::query_as::<_, Connection>("SELECT * FROM connections WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(connection)
    }

    pub async fn find_connection(
        &self,
        student_id: Uuid,
        alumni_id: Uuid,
    ) -> Result<Option<Connection>, PostgresError> {
        let connection = sqlx::query_as::<_, Connection>(
            "SELECT * FROM connections WHERE student_id = $1 AND alumni_id = $2",
        )
        .bind(student_id)
        .bind(alumni_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(connection)
    }

    /// Store a connection request with its match score
    pub async fn create_connection(
        &self,
        student_id: Uuid,
        alumni_id: Uuid,
        match_score: u8,
        initiated_by: InitiatedBy,
    ) -> Result<Connection, PostgresError> {
        let connection = sqlx::query_as::<_, Connection>(
            r#"
            INSERT INTO connections (id, student_id, alumni_id, match_score, status, initiated_by, last_activity_at)
            VALUES ($1, $2, $3, $4, 'pending', $5, NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(student_id)
        .bind(alumni_id)
        .bind(i16::from(match_score))
        .bind(initiated_by)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(
            "Created connection {}: {} -> {} (score {})",
            connection.id,
            student_id,
            alumni_id,
            match_score
        );

        Ok(connection)
    }

    /// Move a connection from `from` to `to`
    ///
    /// The status check and the write happen in one statement, so `None`
    /// means the connection is missing or no longer in `from`.
    pub async fn transition_connection(
        &self,
        id: Uuid,
        from: ConnectionStatus,
        to: ConnectionStatus,
    ) -> Result<Option<Connection>, PostgresError> {
        let connection = sqlx::query_as::<_, Connection>(
            r#"
            UPDATE connections
            SET status = $3, last_activity_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .fetch_optional(&self.pool)
        .await?;

        Ok(connection)
    }

    /// Pending requests addressed to an alumnus, newest first
    pub async fn pending_requests_for_alumni(
        &self,
        alumni_id: Uuid,
    ) -> Result<Vec<ConnectionRequestView>, PostgresError> {
        let query = r#"
            SELECT
                c.id,
                s.id AS student_id,
                s.first_name || ' ' || s.last_name AS student_name,
                s.email AS student_email,
                s.college_name AS student_college,
                s.skills AS student_skills,
                s.interests AS student_interests,
                c.match_score,
                c.created_at
            FROM connections c
            JOIN students s ON s.id = c.student_id
            WHERE c.alumni_id = $1 AND c.status = 'pending'
            ORDER BY c.created_at DESC
        "#;

        let requests = sqlx::query_as::<_, ConnectionRequestView>(query)
            .bind(alumni_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(requests)
    }

    /// Active connections of an alumnus, newest first
    pub async fn accepted_connections_for_alumni(
        &self,
        alumni_id: Uuid,
    ) -> Result<Vec<ConnectedStudentView>, PostgresError> {
        let query = r#"
            SELECT
                c.id,
                s.id AS student_id,
                s.first_name || ' ' || s.last_name AS student_name,
                s.email AS student_email,
                s.college_name AS student_college,
                c.match_score,
                c.updated_at AS connected_at
            FROM connections c
            JOIN students s ON s.id = c.student_id
            WHERE c.alumni_id = $1 AND c.status = 'active'
            ORDER BY c.created_at DESC
        "#;

        let connections = sqlx::query_as::<_, ConnectedStudentView>(query)
            .bind(alumni_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(connections)
    }

    /// Active connections of a student, newest first
    pub async fn connected_alumni_for_student(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<ConnectedAlumniView>, PostgresError> {
        let query = r#"
            SELECT
                c.id,
                a.id AS alumni_id,
                a.first_name || ' ' || a.last_name AS alumni_name,
                a.email AS alumni_email,
                a.company AS alumni_company,
                a.designation AS alumni_designation,
                a.expertise AS alumni_expertise,
                a.skills AS alumni_skills,
                a.years_of_experience AS alumni_experience,
                c.match_score,
                c.updated_at AS connected_at
            FROM connections c
            JOIN alumni a ON a.id = c.alumni_id
            WHERE c.student_id = $1 AND c.status = 'active'
            ORDER BY c.created_at DESC
        "#;

        let connections = sqlx::query_as::<_, ConnectedAlumniView>(query)
            .bind(student_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(connections)
    }

    /// Store a message and touch the connection's activity timestamps
    pub async fn create_message(&self, message: &NewMessage) -> Result<Message, PostgresError> {
        let mut tx = self.pool.begin().await?;

        let touched = sqlx::query(
            "UPDATE connections SET last_message_at = NOW(), last_activity_at = NOW() WHERE id = $1",
        )
        .bind(message.connection_id)
        .execute(&mut *tx)
        .await?;

        if touched.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(PostgresError::NotFound(format!(
                "Connection {} not found",
                message.connection_id
            )));
        }

        let stored = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (id, connection_id, sender_id, sender_type, receiver_id, message)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(message.connection_id)
        .bind(message.sender_id)
        .bind(message.sender_type)
        .bind(message.receiver_id)
        .bind(&message.message)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(stored)
    }

    /// Messages of a connection, oldest first
    pub async fn messages_for_connection(
        &self,
        connection_id: Uuid,
    ) -> Result<Vec<Message>, PostgresError> {
        let messages = sqlx::query_as::<_, Message>(
            "SELECT * FROM messages WHERE connection_id = $1 ORDER BY created_at ASC, id",
        )
        .bind(connection_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }
}
