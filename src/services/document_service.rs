use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::document::ApplicantDocument;

#[derive(Clone)]
pub struct DocumentService {
    pool: PgPool,
}

impl DocumentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Records one supplementary upload. Requires the owning applicant
    /// row to exist already.
    pub async fn create(
        &self,
        applicant_id: Uuid,
        document_type: &str,
        file_url: &str,
        filename: &str,
        file_size: i64,
        mime_type: &str,
    ) -> Result<ApplicantDocument> {
        let document = sqlx::query_as::<_, ApplicantDocument>(
            "INSERT INTO applicant_documents \
                (applicant_id, document_type, file_url, filename, file_size, mime_type) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, applicant_id, document_type, file_url, filename, file_size, \
                       mime_type, uploaded_at",
        )
        .bind(applicant_id)
        .bind(document_type)
        .bind(file_url)
        .bind(filename)
        .bind(file_size)
        .bind(mime_type)
        .fetch_one(&self.pool)
        .await?;
        Ok(document)
    }

    pub async fn list_for_applicant(&self, applicant_id: Uuid) -> Result<Vec<ApplicantDocument>> {
        let documents = sqlx::query_as::<_, ApplicantDocument>(
            "SELECT id, applicant_id, document_type, file_url, filename, file_size, \
                    mime_type, uploaded_at \
             FROM applicant_documents WHERE applicant_id = $1 \
             ORDER BY uploaded_at ASC",
        )
        .bind(applicant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(documents)
    }
}
