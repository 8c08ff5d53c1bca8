/// Rendered subject and HTML body ready for an [`super::EmailDispatcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailContent {
    pub subject: String,
    pub html_body: String,
}

pub const APPLICATION_CONFIRMATION_SUBJECT: &str = "Job Application Successful";

/// Confirmation sent to an applicant once their application is stored.
pub fn application_confirmation(name: &str, job_title: &str) -> EmailContent {
    let html_body = format!(
        "<p>Hi {name},</p>\
         <p>Thank you for applying to the position of <strong>{title}</strong> on SkillBridge.</p>\
         <p>We\u{2019}ve successfully received your application and will keep you updated on the next steps.</p>\
         <br/><p>Best regards,<br/>SkillBridge Team</p>",
        name = escape_html(name),
        title = escape_html(job_title),
    );

    EmailContent {
        subject: APPLICATION_CONFIRMATION_SUBJECT.to_string(),
        html_body,
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
