use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Contact,
    Partnership,
    Volunteer,
}

impl FormKind {
    pub fn missing_fields_message(self) -> &'static str {
        match self {
            FormKind::Contact => "All fields are required",
            FormKind::Partnership => "All required fields must be filled",
            FormKind::Volunteer => "Name, email, and time commitment are required",
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            FormKind::Contact => "Your message has been sent successfully!",
            FormKind::Partnership => "Your partnership inquiry has been submitted successfully!",
            FormKind::Volunteer => "Your volunteer application has been submitted successfully!",
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            FormKind::Contact =>
                "There was an error sending your message. Please try again later.",
            FormKind::Partnership =>
                "There was an error submitting your partnership inquiry. Please try again later.",
            FormKind::Volunteer =>
                "There was an error submitting your volunteer application. Please try again later.",
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormKind::Contact => "contact",
            FormKind::Partnership => "partnership",
            FormKind::Volunteer => "volunteer",
        };
        write!(f, "{}", name)
    }
}

// Raw request bodies. Every field is optional here so that a missing field
// surfaces as a validation error instead of a JSON rejection.

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct PartnershipForm {
    pub vendor_name: Option<String>,
    pub business_type: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub more_information: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<String>,
    pub time_commitment: Option<String>,
    pub education_level: Option<String>,
    pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnershipSubmission {
    pub vendor_name: String,
    pub business_type: String,
    pub email: String,
    pub phone: String,
    pub more_information: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolunteerSubmission {
    pub name: String,
    pub email: String,
    pub age: Option<String>,
    pub time_commitment: String,
    pub education_level: Option<String>,
    pub details: Option<String>,
}

/// A form that passed validation: required fields present, email well formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Contact(ContactSubmission),
    Partnership(PartnershipSubmission),
    Volunteer(VolunteerSubmission),
}

impl Submission {
    pub fn kind(&self) -> FormKind {
        match self {
            Submission::Contact(_) => FormKind::Contact,
            Submission::Partnership(_) => FormKind::Partnership,
            Submission::Volunteer(_) => FormKind::Volunteer,
        }
    }

    pub fn submitter_email(&self) -> &str {
        match self {
            Submission::Contact(s) => &s.email,
            Submission::Partnership(s) => &s.email,
            Submission::Volunteer(s) => &s.email,
        }
    }

    pub fn submitter_name(&self) -> &str {
        match self {
            Submission::Contact(s) => &s.name,
            Submission::Partnership(s) => &s.vendor_name,
            Submission::Volunteer(s) => &s.name,
        }
    }
}
