use bytes::Bytes;

use crate::error::{Error, FieldError, Result};
use crate::models::applicant::{Applicant, NewApplicant};
use crate::services::applicant_service::ApplicantService;
use crate::services::document_service::DocumentService;
use crate::services::notification_service::NotificationService;
use crate::services::upload_service::{Bucket, UploadService};
use crate::services::verification_service::VerificationService;
use crate::utils::phone::normalize_phone;
use crate::utils::token::{generate_verification_token, token_expiry};
use crate::utils::validation;

/// One file as it arrived over multipart: declared MIME type and raw
/// bytes, plus the name it had on the applicant's machine.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub mime_type: String,
    pub data: Bytes,
}

#[derive(Debug, Clone)]
pub struct SupplementaryUpload {
    pub document_type: String,
    pub file: UploadedFile,
}

/// The structured intake payload the browser form submits.
#[derive(Debug, Clone, Default)]
pub struct SubmissionForm {
    pub full_name: String,
    pub email: String,
    pub email_confirmed: String,
    pub phone: String,
    pub positions: Vec<String>,
    pub experience_years: Option<String>,
    pub cover_letter: Option<String>,
    pub job_posting_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub resume: Option<UploadedFile>,
    pub documents: Vec<SupplementaryUpload>,
    pub newsletter_opt_in: bool,
    pub job_notifications_opt_in: bool,
    pub sms_notifications_opt_in: bool,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub referrer: Option<String>,
    pub landing_page: Option<String>,
    pub submission_language: Option<String>,
    pub browser_language: Option<String>,
}

/// Coordinates one applicant's intake from validated form state to a
/// durable, verifiable record. Steps run as a strictly sequential async
/// chain; there is no parallel fan-out within one submission.
#[derive(Clone)]
pub struct SubmissionService {
    applicants: ApplicantService,
    documents: DocumentService,
    verifications: VerificationService,
    uploads: UploadService,
    notifications: NotificationService,
}

impl SubmissionService {
    pub fn new(
        applicants: ApplicantService,
        documents: DocumentService,
        verifications: VerificationService,
        uploads: UploadService,
        notifications: NotificationService,
    ) -> Self {
        Self {
            applicants,
            documents,
            verifications,
            uploads,
            notifications,
        }
    }

    pub async fn submit(&self, form: SubmissionForm) -> Result<Applicant> {
        let errors = validate_form(&form);
        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }
        // validate_form guarantees the resume is present.
        let resume = form
            .resume
            .clone()
            .ok_or_else(|| Error::BadRequest("Resume file is required".to_string()))?;

        // Duplicate check runs before any upload so a rejected intake
        // leaves no orphaned blob behind.
        if let Some(existing) = self.applicants.find_by_phone(&form.phone).await? {
            return Err(Error::DuplicateApplicant(Box::new(existing)));
        }

        let token = generate_verification_token();
        let expiry = token_expiry();

        let stored_resume = self
            .uploads
            .store(Bucket::Resumes, &resume.filename, &resume.data)
            .await?;

        let applicant = self
            .applicants
            .create(NewApplicant {
                full_name: form.full_name.trim().to_string(),
                email: form.email.clone(),
                email_confirmed: form.email_confirmed.clone(),
                phone: form.phone.clone(),
                phone_normalized: normalize_phone(&form.phone),
                positions: form.positions.clone(),
                experience_years: form.experience_years.clone(),
                cover_letter: form.cover_letter.clone(),
                job_posting_url: form.job_posting_url.clone(),
                linkedin_url: form.linkedin_url.clone(),
                portfolio_url: form.portfolio_url.clone(),
                resume_url: stored_resume.url,
                resume_filename: stored_resume.filename,
                email_verification_token: token.clone(),
                token_expiry: expiry,
                newsletter_opt_in: form.newsletter_opt_in,
                job_notifications_opt_in: form.job_notifications_opt_in,
                sms_notifications_opt_in: form.sms_notifications_opt_in,
                utm_source: form.utm_source.clone(),
                utm_medium: form.utm_medium.clone(),
                utm_campaign: form.utm_campaign.clone(),
                referrer: form.referrer.clone(),
                landing_page: form.landing_page.clone(),
                submission_language: form.submission_language.clone(),
                browser_language: form.browser_language.clone(),
            })
            .await?;

        // Supplementary documents are best-effort: one failing upload or
        // insert is logged and skipped, the applicant record stands.
        for doc in &form.documents {
            if let Err(err) = self.attach_document(&applicant, doc).await {
                tracing::warn!(
                    applicant_id = %applicant.id,
                    filename = %doc.file.filename,
                    "Skipping supplementary document: {}",
                    err
                );
            }
        }

        self.verifications
            .create_log(applicant.id, &applicant.email, &token)
            .await?;

        // Fire-and-forget: the user has already been told to check
        // their inbox, so a failed enqueue is logged, not surfaced.
        if let Err(err) = self
            .notifications
            .enqueue_verification_email(&applicant, &token)
            .await
        {
            tracing::error!(
                applicant_id = %applicant.id,
                "Failed to enqueue verification email: {}",
                err
            );
        }

        Ok(applicant)
    }

    async fn attach_document(
        &self,
        applicant: &Applicant,
        doc: &SupplementaryUpload,
    ) -> Result<()> {
        let stored = self
            .uploads
            .store(Bucket::Documents, &doc.file.filename, &doc.file.data)
            .await?;
        self.documents
            .create(
                applicant.id,
                &doc.document_type,
                &stored.url,
                &stored.filename,
                doc.file.data.len() as i64,
                &doc.file.mime_type,
            )
            .await?;
        Ok(())
    }
}

/// Field-level validation of the whole form. Pure; returns every failing
/// field so the UI can render all inline errors at once.
pub fn validate_form(form: &SubmissionForm) -> Vec<FieldError> {
    let mut errors = Vec::new();
    let mut check = |field: &str, result: std::result::Result<(), String>| {
        if let Err(message) = result {
            errors.push(FieldError::new(field, message));
        }
    };

    check("full_name", validation::validate_name(&form.full_name));
    check("email", validation::validate_email(&form.email));
    check(
        "email_confirmed",
        validation::validate_email_confirmation(&form.email, &form.email_confirmed),
    );
    check("phone", validation::validate_phone(&form.phone));
    check("positions", validation::validate_positions(&form.positions));
    check(
        "job_posting_url",
        validation::validate_optional_url(form.job_posting_url.as_deref().unwrap_or("")),
    );
    check(
        "linkedin_url",
        validation::validate_linkedin_url(form.linkedin_url.as_deref().unwrap_or("")),
    );
    check(
        "portfolio_url",
        validation::validate_optional_url(form.portfolio_url.as_deref().unwrap_or("")),
    );

    match &form.resume {
        None => check("resume", Err("Resume file is required".to_string())),
        Some(resume) => {
            check(
                "resume",
                validation::validate_mime_type(&resume.mime_type, validation::RESUME_MIME_TYPES),
            );
            check(
                "resume",
                validation::validate_file_size(resume.data.len(), validation::RESUME_MAX_MB),
            );
            check(
                "resume",
                validation::validate_file_content(&resume.mime_type, &resume.data),
            );
        }
    }

    for doc in &form.documents {
        check(
            "documents",
            validation::validate_mime_type(&doc.file.mime_type, validation::DOCUMENT_MIME_TYPES),
        );
        check(
            "documents",
            validation::validate_file_size(doc.file.data.len(), validation::DOCUMENT_MAX_MB),
        );
        check(
            "documents",
            validation::validate_file_content(&doc.file.mime_type, &doc.file.data),
        );
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf(total_bytes: usize) -> UploadedFile {
        let mut data = b"%PDF-1.4 ".to_vec();
        data.resize(total_bytes.max(data.len()), 0);
        UploadedFile {
            filename: "resume.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            data: Bytes::from(data),
        }
    }

    fn valid_form() -> SubmissionForm {
        SubmissionForm {
            full_name: "Jane Doe".to_string(),
            email: "jane@x.com".to_string(),
            email_confirmed: "jane@x.com".to_string(),
            phone: "(301) 555-0100".to_string(),
            positions: vec!["Administrative".to_string()],
            experience_years: Some("3".to_string()),
            resume: Some(pdf(1024)),
            ..SubmissionForm::default()
        }
    }

    #[test]
    fn complete_form_passes() {
        assert!(validate_form(&valid_form()).is_empty());
    }

    #[test]
    fn missing_resume_is_reported() {
        let mut form = valid_form();
        form.resume = None;
        let errors = validate_form(&form);
        assert!(errors.iter().any(|e| e.field == "resume"));
    }

    #[test]
    fn mismatched_confirmation_is_reported() {
        let mut form = valid_form();
        form.email_confirmed = "other@x.com".to_string();
        let errors = validate_form(&form);
        assert!(errors.iter().any(|e| e.field == "email_confirmed"));
    }

    #[test]
    fn resume_over_ceiling_is_reported() {
        let mut form = valid_form();
        form.resume = Some(pdf(5 * 1024 * 1024 + 1));
        let errors = validate_form(&form);
        assert!(errors.iter().any(|e| e.field == "resume"));
    }

    #[test]
    fn resume_exactly_at_ceiling_passes() {
        let mut form = valid_form();
        form.resume = Some(pdf(5 * 1024 * 1024));
        assert!(validate_form(&form).is_empty());
    }

    #[test]
    fn optional_urls_only_checked_when_present() {
        let mut form = valid_form();
        form.linkedin_url = Some("https://notlinkedin.com".to_string());
        form.portfolio_url = Some("ftp://example.com".to_string());
        let errors = validate_form(&form);
        assert!(errors.iter().any(|e| e.field == "linkedin_url"));
        assert!(errors.iter().any(|e| e.field == "portfolio_url"));

        form.linkedin_url = None;
        form.portfolio_url = None;
        assert!(validate_form(&form).is_empty());
    }

    #[test]
    fn every_failing_field_is_collected() {
        let form = SubmissionForm::default();
        let errors = validate_form(&form);
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"full_name"));
        assert!(fields.contains(&"email"));
        assert!(fields.contains(&"phone"));
        assert!(fields.contains(&"positions"));
        assert!(fields.contains(&"resume"));
    }
}
