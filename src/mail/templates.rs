use crate::models::forms::{
    ContactSubmission,
    PartnershipSubmission,
    Submission,
    VolunteerSubmission,
};

const NOT_PROVIDED: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}

/// Turns a validated submission into the two emails the relay sends.
/// Independent of any transport.
pub trait TemplateRenderer: Send + Sync {
    fn admin_notification(&self, submission: &Submission) -> RenderedEmail;
    fn confirmation(&self, submission: &Submission) -> RenderedEmail;
}

pub struct HtmlTemplates {
    organization: String,
    support_email: String,
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes and converts line breaks to `<br>`.
fn multiline(input: &str) -> String {
    escape_html(input).replace("\r\n", "\n").replace('\n', "<br>")
}

fn or_na(value: &Option<String>) -> String {
    value.as_deref().map(escape_html).unwrap_or_else(|| NOT_PROVIDED.to_string())
}

fn multiline_or_na(value: &Option<String>) -> String {
    value.as_deref().map(multiline).unwrap_or_else(|| NOT_PROVIDED.to_string())
}

impl HtmlTemplates {
    pub fn new(organization: impl Into<String>, support_email: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            support_email: support_email.into(),
        }
    }

    fn signature(&self) -> String {
        format!("<p>Best regards,<br>{} Team</p>", escape_html(&self.organization))
    }

    fn contact_admin(&self, s: &ContactSubmission) -> RenderedEmail {
        RenderedEmail {
            subject: format!("New Contact Form Submission: {}", s.subject),
            html: format!(
                "<h2>New Contact Form Submission</h2>\n\
                 <p><strong>Name:</strong> {}</p>\n\
                 <p><strong>Email:</strong> {}</p>\n\
                 <p><strong>Subject:</strong> {}</p>\n\
                 <p><strong>Message:</strong></p>\n\
                 <p>{}</p>\n",
                escape_html(&s.name),
                escape_html(&s.email),
                escape_html(&s.subject),
                multiline(&s.message)
            ),
        }
    }

    fn contact_confirmation(&self, s: &ContactSubmission) -> RenderedEmail {
        let org = escape_html(&self.organization);
        RenderedEmail {
            subject: format!("We received your message - {}", self.organization),
            html: format!(
                "<h2>Thank you for contacting {}</h2>\n\
                 <p>Hi {},</p>\n\
                 <p>We have received your message and will get back to you as soon as possible.</p>\n\
                 {}\n",
                org,
                escape_html(&s.name),
                self.signature()
            ),
        }
    }

    fn partnership_admin(&self, s: &PartnershipSubmission) -> RenderedEmail {
        RenderedEmail {
            subject: format!("New Partnership Inquiry: {}", s.vendor_name),
            html: format!(
                "<h2>New Partnership Inquiry</h2>\n\
                 <p><strong>Vendor/Business Name:</strong> {}</p>\n\
                 <p><strong>Type of Business:</strong> {}</p>\n\
                 <p><strong>Email:</strong> {}</p>\n\
                 <p><strong>Phone:</strong> {}</p>\n\
                 <p><strong>Additional Information:</strong></p>\n\
                 <p>{}</p>\n",
                escape_html(&s.vendor_name),
                escape_html(&s.business_type),
                escape_html(&s.email),
                escape_html(&s.phone),
                multiline_or_na(&s.more_information)
            ),
        }
    }

    fn partnership_confirmation(&self, s: &PartnershipSubmission) -> RenderedEmail {
        let org = escape_html(&self.organization);
        RenderedEmail {
            subject: format!("Partnership Inquiry Received - {}", self.organization),
            html: format!(
                "<h2>Thank you for your partnership inquiry</h2>\n\
                 <p>Hi {},</p>\n\
                 <p>We have received your partnership inquiry and appreciate your interest in collaborating with {}. \
                 Our team will review your submission and get back to you within 5-7 business days.</p>\n\
                 <p>If you have any urgent questions, please feel free to reach out to us at {}</p>\n\
                 {}\n",
                escape_html(&s.vendor_name),
                org,
                escape_html(&self.support_email),
                self.signature()
            ),
        }
    }

    fn volunteer_admin(&self, s: &VolunteerSubmission) -> RenderedEmail {
        RenderedEmail {
            subject: format!("New Volunteer Application: {}", s.name),
            html: format!(
                "<h2>New Volunteer Application</h2>\n\
                 <p><strong>Name:</strong> {}</p>\n\
                 <p><strong>Email:</strong> {}</p>\n\
                 <p><strong>Age:</strong> {}</p>\n\
                 <p><strong>Time Commitment:</strong> {}</p>\n\
                 <p><strong>Education Level:</strong> {}</p>\n\
                 <p><strong>Details:</strong></p>\n\
                 <p>{}</p>\n",
                escape_html(&s.name),
                escape_html(&s.email),
                or_na(&s.age),
                escape_html(&s.time_commitment),
                or_na(&s.education_level),
                multiline_or_na(&s.details)
            ),
        }
    }

    fn volunteer_confirmation(&self, s: &VolunteerSubmission) -> RenderedEmail {
        let org = escape_html(&self.organization);
        RenderedEmail {
            subject: format!("Thank You for Your Interest in Volunteering - {}", self.organization),
            html: format!(
                "<h2>Thank you for your volunteer application</h2>\n\
                 <p>Hi {},</p>\n\
                 <p>We have received your volunteer application and are grateful for your interest in supporting {}'s mission. \
                 Our team will review your application and get back to you within 5-7 business days.</p>\n\
                 <p>If you have any questions in the meantime, feel free to reach out to us at {}</p>\n\
                 {}\n",
                escape_html(&s.name),
                org,
                escape_html(&self.support_email),
                self.signature()
            ),
        }
    }
}

impl TemplateRenderer for HtmlTemplates {
    fn admin_notification(&self, submission: &Submission) -> RenderedEmail {
        match submission {
            Submission::Contact(s) => self.contact_admin(s),
            Submission::Partnership(s) => self.partnership_admin(s),
            Submission::Volunteer(s) => self.volunteer_admin(s),
        }
    }

    fn confirmation(&self, submission: &Submission) -> RenderedEmail {
        match submission {
            Submission::Contact(s) => self.contact_confirmation(s),
            Submission::Partnership(s) => self.partnership_confirmation(s),
            Submission::Volunteer(s) => self.volunteer_confirmation(s),
        }
    }
}
