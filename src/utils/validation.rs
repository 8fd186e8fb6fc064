use url::Url;

use crate::utils::phone::normalize_phone;

/// MIME types accepted for the required resume upload.
pub const RESUME_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Supplementary documents additionally accept images (scanned
/// certificates, reference letters).
pub const DOCUMENT_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "image/jpeg",
    "image/png",
];

pub const RESUME_MAX_MB: usize = 5;
pub const DOCUMENT_MAX_MB: usize = 10;

pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().chars().count() < 2 {
        return Err("Name must be at least 2 characters".to_string());
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), String> {
    let invalid = || "Please enter a valid email address".to_string();

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    // The domain needs a dot with something on both sides of it.
    let (host, tld) = domain.rsplit_once('.').ok_or_else(invalid)?;
    if host.is_empty() || tld.is_empty() {
        return Err(invalid());
    }
    Ok(())
}

pub fn validate_email_confirmation(email: &str, confirmation: &str) -> Result<(), String> {
    if email != confirmation {
        return Err("Email addresses do not match".to_string());
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), String> {
    if normalize_phone(phone).len() < 10 {
        return Err("Phone number must contain at least 10 digits".to_string());
    }
    Ok(())
}

/// Optional-field semantics: an empty string passes, anything else must
/// parse as an absolute http(s) URL.
pub fn validate_optional_url(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Ok(());
    }
    let parsed =
        Url::parse(value).map_err(|_| "Please enter a valid URL".to_string())?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        _ => Err("URL must start with http:// or https://".to_string()),
    }
}

pub fn validate_linkedin_url(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Ok(());
    }
    validate_optional_url(value)?;
    let parsed = Url::parse(value).map_err(|_| "Please enter a valid URL".to_string())?;
    let host = parsed
        .host_str()
        .ok_or_else(|| "Please enter a valid LinkedIn URL".to_string())?;
    if host == "linkedin.com" || host.ends_with(".linkedin.com") {
        Ok(())
    } else {
        Err("Please enter a valid LinkedIn URL".to_string())
    }
}

pub fn validate_mime_type(mime: &str, allowed: &[&str]) -> Result<(), String> {
    if allowed.contains(&mime) {
        Ok(())
    } else {
        Err(format!("File type {} is not allowed", mime))
    }
}

pub fn validate_file_size(byte_len: usize, max_mb: usize) -> Result<(), String> {
    if byte_len > max_mb * 1024 * 1024 {
        return Err(format!("File must be {}MB or smaller", max_mb));
    }
    Ok(())
}

/// Light magic-byte check so a mislabeled upload is caught before it is
/// stored. Only types with a stable signature are checked.
pub fn validate_file_content(mime: &str, data: &[u8]) -> Result<(), String> {
    let matches = match mime {
        "application/pdf" => data.starts_with(b"%PDF"),
        "image/jpeg" => data.starts_with(&[0xFF, 0xD8]),
        "image/png" => data.starts_with(&[0x89, 0x50, 0x4E, 0x47]),
        _ => true,
    };
    if matches {
        Ok(())
    } else {
        Err(format!("File content does not match declared type {}", mime))
    }
}

pub fn validate_positions(positions: &[String]) -> Result<(), String> {
    if positions.iter().all(|p| p.trim().is_empty()) {
        return Err("Please select at least one position".to_string());
    }
    Ok(())
}
