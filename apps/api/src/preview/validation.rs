use crate::config::ContactPolicy;
use crate::errors::AppError;
use crate::models::resume::ResumeRecord;

/// Applies the configured contact policy to an already-normalized record.
///
/// Runs after normalization, so `normalize` itself stays total.
pub fn validate_contact(record: &ResumeRecord, policy: ContactPolicy) -> Result<(), AppError> {
    if policy == ContactPolicy::Permissive {
        return Ok(());
    }

    let missing: Vec<&str> = [("name", &record.name), ("email", &record.email)]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(format!("{} required", missing.join(" and "))))
    }
}
