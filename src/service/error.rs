use crate::validation::{FieldError, ValidationError};
use sea_orm::DbErr;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceErrorKind {
    BadRequest,
    NotFound,
    Conflict,
    Internal,
}

#[derive(Debug, Clone)]
pub struct ServiceError {
    kind: ServiceErrorKind,
    message: String,
    details: Vec<FieldError>,
}

impl ServiceError {
    pub fn new(kind: ServiceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::BadRequest, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Conflict, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Internal, message)
    }

    /// Bad request carrying one `{field, message}` entry per failure.
    pub fn validation<I>(errors: I) -> Self
    where
        I: IntoIterator<Item = ValidationError>,
    {
        Self {
            kind: ServiceErrorKind::BadRequest,
            message: "Validation failed".to_string(),
            details: errors.into_iter().map(FieldError::from).collect(),
        }
    }

    pub fn kind(&self) -> ServiceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> &[FieldError] {
        &self.details
    }
}

impl From<ValidationError> for ServiceError {
    fn from(error: ValidationError) -> Self {
        Self::validation([error])
    }
}

/// Classifies a database error. Driver text is logged, never returned.
pub(crate) fn map_db_error(error: DbErr) -> ServiceError {
    let message = error.to_string();
    let kind = match &error {
        DbErr::RecordNotFound(_) => ServiceErrorKind::NotFound,
        DbErr::Json(_) | DbErr::Type(_) => ServiceErrorKind::BadRequest,
        _ => {
            let lowered = message.to_ascii_lowercase();
            if lowered.contains("unique constraint failed")
                || lowered.contains("foreign key constraint failed")
            {
                ServiceErrorKind::Conflict
            } else if lowered.contains("not null constraint failed")
                || lowered.contains("check constraint failed")
                || lowered.contains("datatype mismatch")
            {
                ServiceErrorKind::BadRequest
            } else {
                ServiceErrorKind::Internal
            }
        }
    };

    match kind {
        ServiceErrorKind::NotFound => {
            warn!(error = %message, "database record not found");
            ServiceError::not_found("Record not found")
        }
        ServiceErrorKind::BadRequest => {
            warn!(error = %message, "database rejected data");
            ServiceError::bad_request("Invalid data")
        }
        ServiceErrorKind::Conflict => {
            warn!(error = %message, "database constraint conflict");
            ServiceError::conflict("Conflict")
        }
        ServiceErrorKind::Internal => ServiceError::internal(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::RuntimeErr;

    #[test]
    fn classifies_sqlite_constraint_messages() {
        let unique = DbErr::Exec(RuntimeErr::Internal(
            "UNIQUE constraint failed: tags.name".to_string(),
        ));
        let unique = map_db_error(unique);
        assert_eq!(unique.kind(), ServiceErrorKind::Conflict);
        assert_eq!(unique.message(), "Conflict");

        let check = DbErr::Exec(RuntimeErr::Internal(
            "CHECK constraint failed: length(title) <= 100".to_string(),
        ));
        let check = map_db_error(check);
        assert_eq!(check.kind(), ServiceErrorKind::BadRequest);
        assert_eq!(check.message(), "Invalid data");
        assert!(check.details().is_empty());

        let other = DbErr::Conn(RuntimeErr::Internal("disk I/O error".to_string()));
        assert_eq!(map_db_error(other).kind(), ServiceErrorKind::Internal);
    }

    #[test]
    fn validation_error_collects_field_details() {
        let error = ServiceError::validation([
            ValidationError::TitleRequired,
            ValidationError::TagsRequired,
        ]);
        assert_eq!(error.kind(), ServiceErrorKind::BadRequest);
        let fields: Vec<_> = error.details().iter().map(|detail| detail.field).collect();
        assert_eq!(fields, vec!["title", "tags"]);
    }
}
