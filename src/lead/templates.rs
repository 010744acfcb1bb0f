use crate::config::BrandConfig;

use super::Lead;

/// What the prospect said hurts most, bucketed by keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PainCategory {
    Email,
    Scheduling,
    FollowUps,
    Paperwork,
    CustomerComms,
    General,
}

const CATEGORY_KEYWORDS: &[(PainCategory, &[&str])] = &[
    (PainCategory::Email, &["email", "inbox"]),
    (
        PainCategory::Scheduling,
        &["schedul", "appointment", "calendar", "booking"],
    ),
    (PainCategory::FollowUps, &["follow", "lead", "sales"]),
    (
        PainCategory::Paperwork,
        &["data entry", "paperwork", "invoice", "spreadsheet", "admin"],
    ),
    (
        PainCategory::CustomerComms,
        &["customer", "support", "phone", "question"],
    ),
];

impl PainCategory {
    pub fn classify(pain_point: Option<&str>) -> Self {
        let Some(pain) = pain_point else {
            return Self::General;
        };
        let lower = pain.to_lowercase();
        CATEGORY_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(category, _)| *category)
            .unwrap_or(Self::General)
    }

    fn subject(self) -> &'static str {
        match self {
            Self::Email => "{name}, let's get your inbox back",
            Self::Scheduling => "{name}, scheduling on autopilot",
            Self::FollowUps => "{name}, never miss a follow-up again",
            Self::Paperwork => "{name}, less paperwork for {business}",
            Self::CustomerComms => "{name}, answer customers 24/7",
            Self::General => "{name}, a few AI ideas for {business}",
        }
    }

    fn intro(self) -> &'static str {
        match self {
            Self::Email => {
                "You mentioned email is eating your day. That's the most common thing we hear, \
                 and one of the easiest to fix."
            }
            Self::Scheduling => {
                "You mentioned scheduling is a headache. Back-and-forth booking is exactly the \
                 kind of work an assistant can take off your plate."
            }
            Self::FollowUps => {
                "You mentioned follow-ups slip through the cracks. Every missed follow-up is \
                 money left on the table, and it doesn't have to be."
            }
            Self::Paperwork => {
                "You mentioned paperwork and data entry. Retyping the same information into \
                 three systems is a job for software, not for you."
            }
            Self::CustomerComms => {
                "You mentioned keeping up with customer questions. Most of them repeat, which \
                 means most of them can be answered instantly."
            }
            Self::General => {
                "Thanks for reaching out. Every business has repetitive work that quietly eats \
                 the week, and that's where we start."
            }
        }
    }

    fn ideas(self) -> &'static [&'static str] {
        match self {
            Self::Email => &[
                "Sort and label incoming mail automatically",
                "Draft replies to routine questions for a one-click send",
                "Summarize the day's inbox into a short digest",
            ],
            Self::Scheduling => &[
                "Let customers book themselves into open slots",
                "Send reminders that cut no-shows",
                "Rebook cancellations from a waitlist",
            ],
            Self::FollowUps => &[
                "Follow up with every new lead within minutes",
                "Nudge quotes that haven't been answered",
                "Check in with past customers at the right time",
            ],
            Self::Paperwork => &[
                "Pull details out of invoices and forms automatically",
                "Keep spreadsheets and your other tools in sync",
                "Generate routine documents from a template",
            ],
            Self::CustomerComms => &[
                "A website chat assistant that knows your business",
                "Instant answers to the questions you hear every day",
                "Hand off to you only when a human is really needed",
            ],
            Self::General => &[
                "Automatic follow-ups and reminders",
                "A chat assistant for common customer questions",
                "Less copy-paste between the tools you already use",
            ],
        }
    }
}

/// A rendered transactional email.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailContent {
    pub subject: String,
    pub html: String,
}

/// Email sent to the prospect right after they submit the form.
pub fn lead_email(brand: &BrandConfig, lead: &Lead) -> EmailContent {
    let category = PainCategory::classify(lead.pain_point.as_deref());
    let business = if lead.business.is_empty() {
        "your business"
    } else {
        lead.business.as_str()
    };

    let subject = fill(category.subject(), lead.first_name(), business);

    let ideas: String = category
        .ideas()
        .iter()
        .map(|idea| format!("<li>{}</li>", escape_html(idea)))
        .collect();

    let mut html = format!(
        "<p>Hi {name},</p>\n<p>{intro}</p>\n<p>A few things we could set up for {business}:</p>\n<ul>{ideas}</ul>\n",
        name = escape_html(lead.first_name()),
        intro = escape_html(category.intro()),
        business = escape_html(business),
    );
    if !lead.insight.is_empty() {
        html.push_str(&format!("<p>{}</p>\n", escape_html(&lead.insight)));
    }
    html.push_str(&format!(
        "<p>{owner} will reach out personally within 24 hours. Just reply to this email if you want to get started sooner.</p>\n<p>- {assistant}, {company}</p>",
        owner = escape_html(&brand.owner),
        assistant = escape_html(&brand.assistant),
        company = escape_html(&brand.company),
    ));
    if !brand.site_url.is_empty() {
        html.push_str(&format!(
            "\n<p><a href=\"{url}\">{url}</a></p>",
            url = escape_html(&brand.site_url)
        ));
    }

    EmailContent { subject, html }
}

/// Text message sent to the prospect before the welcome call.
pub fn lead_sms(brand: &BrandConfig, lead: &Lead) -> String {
    format!(
        "Hey {name}! This is {assistant} from {company}. Thanks for reaching out. I just sent you \
         an email with some ideas for your business, and you'll get a quick call from me in a \
         moment. Talk soon!",
        name = lead.first_name(),
        assistant = brand.assistant,
        company = brand.company,
    )
}

/// Words spoken when the prospect answers the welcome call.
pub fn welcome_script(brand: &BrandConfig, name: &str) -> String {
    format!(
        "Hey {name}! This is {assistant} from {company}. Just sent you an email with some ideas \
         for your business. Check your inbox! {owner} will follow up personally. Talk soon, bye!",
        assistant = brand.assistant,
        company = brand.company,
        owner = brand.owner,
    )
}

fn fill(template: &str, name: &str, business: &str) -> String {
    template
        .replace("{name}", name)
        .replace("{business}", business)
}

/// Escape text for HTML and XML bodies.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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
