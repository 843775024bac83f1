use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::forms::{
    ContactForm,
    ContactSubmission,
    FormKind,
    PartnershipForm,
    PartnershipSubmission,
    Submission,
    VolunteerForm,
    VolunteerSubmission,
};

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{}", .0.missing_fields_message())]
    MissingFields(FormKind),
    #[error("Invalid email address")]
    InvalidEmail,
}

/// A raw form body that can be checked into a [`Submission`].
pub trait FormInput {
    const KIND: FormKind;

    fn validate(self) -> Result<Submission, ValidationError>;
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Blank counts as absent.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn check_email(email: String) -> Result<String, ValidationError> {
    if is_valid_email(&email) {
        Ok(email)
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

impl FormInput for ContactForm {
    const KIND: FormKind = FormKind::Contact;

    fn validate(self) -> Result<Submission, ValidationError> {
        let (Some(name), Some(email), Some(subject), Some(message)) = (
            present(self.name),
            present(self.email),
            present(self.subject),
            present(self.message),
        ) else {
            return Err(ValidationError::MissingFields(Self::KIND));
        };

        Ok(Submission::Contact(ContactSubmission {
            name,
            email: check_email(email)?,
            subject,
            message,
        }))
    }
}

impl FormInput for PartnershipForm {
    const KIND: FormKind = FormKind::Partnership;

    fn validate(self) -> Result<Submission, ValidationError> {
        let (Some(vendor_name), Some(business_type), Some(email), Some(phone)) = (
            present(self.vendor_name),
            present(self.business_type),
            present(self.email),
            present(self.phone),
        ) else {
            return Err(ValidationError::MissingFields(Self::KIND));
        };

        Ok(Submission::Partnership(PartnershipSubmission {
            vendor_name,
            business_type,
            email: check_email(email)?,
            phone,
            more_information: present(self.more_information),
        }))
    }
}

impl FormInput for VolunteerForm {
    const KIND: FormKind = FormKind::Volunteer;

    fn validate(self) -> Result<Submission, ValidationError> {
        let (Some(name), Some(email), Some(time_commitment)) = (
            present(self.name),
            present(self.email),
            present(self.time_commitment),
        ) else {
            return Err(ValidationError::MissingFields(Self::KIND));
        };

        Ok(Submission::Volunteer(VolunteerSubmission {
            name,
            email: check_email(email)?,
            age: present(self.age),
            time_commitment,
            education_level: present(self.education_level),
            details: present(self.details),
        }))
    }
}
