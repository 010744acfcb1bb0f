pub mod resend;
pub mod telegram;
pub mod twilio;

use std::fmt;
use std::time::Duration;

use crate::config::{BrandConfig, Config};
use crate::lead::phone::normalize_phone;
use crate::lead::templates::{lead_email, lead_sms};
use crate::lead::Lead;

use self::resend::ResendClient;
use self::telegram::TelegramClient;
use self::twilio::{urlencoded, TwilioClient};

/// Longest error text carried into the operator summary.
const MAX_REASON_CHARS: usize = 120;

/// What happened on one notification channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelOutcome {
    Sent,
    Failed(String),
    Skipped(&'static str),
}

impl ChannelOutcome {
    fn failed(err: impl fmt::Display) -> Self {
        let mut reason = err.to_string();
        if let Some((idx, _)) = reason.char_indices().nth(MAX_REASON_CHARS) {
            reason.truncate(idx);
            reason.push('…');
        }
        Self::Failed(reason)
    }

    fn marker(&self, label: &str) -> String {
        match self {
            Self::Sent => format!("✅ {label}"),
            Self::Failed(reason) => format!("❌ {label}: {}", escape_markdown(reason)),
            Self::Skipped(reason) => format!("➖ {label}: {reason}"),
        }
    }
}

/// Per-channel results of one lead fan-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadReport {
    pub email: ChannelOutcome,
    pub sms: ChannelOutcome,
    pub call: ChannelOutcome,
    pub operator: ChannelOutcome,
}

/// Sends every notification for a new lead: prospect email, SMS, welcome
/// call, then one operator summary.
pub struct LeadNotifier {
    brand: BrandConfig,
    external_url: String,
    call_delay: Duration,
    resend: Option<ResendClient>,
    twilio: Option<TwilioClient>,
    telegram: Option<TelegramClient>,
}

impl LeadNotifier {
    pub fn from_config(config: &Config) -> Self {
        let notifier = Self {
            brand: config.brand.clone(),
            external_url: config.server.external_url.trim_end_matches('/').to_string(),
            call_delay: Duration::from_millis(config.notify.call_delay_ms),
            resend: ResendClient::from_config(&config.resend),
            twilio: TwilioClient::from_config(&config.twilio),
            telegram: TelegramClient::from_config(&config.telegram),
        };
        tracing::info!(
            email = notifier.resend.is_some(),
            sms_and_call = notifier.twilio.is_some(),
            operator = notifier.telegram.is_some(),
            "Lead notification channels"
        );
        notifier
    }

    /// Run the fan-out. Channel failures never abort the others; they only
    /// show up in the report and the operator summary.
    pub async fn notify(&self, lead: &Lead) -> LeadReport {
        let (email, (sms, call)) = tokio::join!(self.send_email(lead), self.text_then_call(lead));

        let mut report = LeadReport {
            email,
            sms,
            call,
            operator: ChannelOutcome::Skipped("not configured"),
        };

        let summary = operator_summary(&self.brand, lead, &report);
        report.operator = match &self.telegram {
            Some(telegram) => match telegram.send_markdown(&summary).await {
                Ok(()) => ChannelOutcome::Sent,
                Err(e) => {
                    tracing::error!(lead_id = %lead.id, "Operator notification failed: {e}");
                    ChannelOutcome::failed(e)
                }
            },
            None => {
                tracing::error!(lead_id = %lead.id, "Telegram not configured, operator not notified");
                ChannelOutcome::Skipped("not configured")
            }
        };

        tracing::info!(lead_id = %lead.id, ?report, "Lead fan-out finished");
        report
    }

    async fn send_email(&self, lead: &Lead) -> ChannelOutcome {
        if lead.email.is_empty() {
            return ChannelOutcome::Skipped("no email");
        }
        let Some(resend) = &self.resend else {
            tracing::error!(lead_id = %lead.id, "Resend not configured, skipping email");
            return ChannelOutcome::Skipped("not configured");
        };

        let email = lead_email(&self.brand, lead);
        match resend.send(&lead.email, &email).await {
            Ok(_) => ChannelOutcome::Sent,
            Err(e) => {
                tracing::error!(lead_id = %lead.id, "Lead email failed: {e}");
                ChannelOutcome::failed(e)
            }
        }
    }

    /// SMS first, then the welcome call after a fixed pause.
    async fn text_then_call(&self, lead: &Lead) -> (ChannelOutcome, ChannelOutcome) {
        let Some(raw) = lead.phone.as_deref() else {
            return (
                ChannelOutcome::Skipped("no phone"),
                ChannelOutcome::Skipped("no phone"),
            );
        };
        let Some(phone) = normalize_phone(raw) else {
            tracing::warn!(lead_id = %lead.id, raw, "Phone number has no digits");
            return (
                ChannelOutcome::Skipped("invalid phone"),
                ChannelOutcome::Skipped("invalid phone"),
            );
        };
        let Some(twilio) = &self.twilio else {
            tracing::error!(lead_id = %lead.id, "Twilio not configured, skipping SMS and call");
            return (
                ChannelOutcome::Skipped("not configured"),
                ChannelOutcome::Skipped("not configured"),
            );
        };

        let sms = match twilio.send_sms(&phone, &lead_sms(&self.brand, lead)).await {
            Ok(_) => ChannelOutcome::Sent,
            Err(e) => {
                tracing::error!(lead_id = %lead.id, "Lead SMS failed: {e}");
                ChannelOutcome::failed(e)
            }
        };

        if self.external_url.is_empty() {
            tracing::error!(lead_id = %lead.id, "No external URL for the voice webhook, skipping call");
            return (sms, ChannelOutcome::Skipped("no external URL"));
        }

        tokio::time::sleep(self.call_delay).await;

        let webhook = format!(
            "{}/api/voice/welcome?name={}",
            self.external_url,
            urlencoded(lead.first_name())
        );
        let call = match twilio.call(&phone, &webhook).await {
            Ok(_) => ChannelOutcome::Sent,
            Err(e) => {
                tracing::error!(lead_id = %lead.id, "Welcome call failed: {e}");
                ChannelOutcome::failed(e)
            }
        };

        (sms, call)
    }
}

/// Markdown message for the operator chat.
pub fn operator_summary(brand: &BrandConfig, lead: &Lead, report: &LeadReport) -> String {
    let mut lines = vec![
        format!("🔥 *New Lead from {}!*", escape_markdown(&brand.company)),
        String::new(),
        field("Name", &lead.name),
        field("Email", &lead.email),
    ];
    if let Some(phone) = &lead.phone {
        lines.push(field("Phone", phone));
    }
    lines.push(field("Business", &lead.business));
    for (label, value) in [
        ("Website", &lead.website),
        ("Pain point", &lead.pain_point),
        ("Message", &lead.message),
    ] {
        if let Some(v) = value {
            lines.push(field(label, v));
        }
    }

    lines.push(String::new());
    lines.push("*Follow-up*".to_string());
    lines.push(report.email.marker("Email"));
    lines.push(report.sms.marker("SMS"));
    lines.push(report.call.marker("Call"));
    lines.push(String::new());
    lines.push(format!("_Lead id: {}_", escape_markdown(&lead.id)));

    lines.join("\n")
}

fn field(label: &str, value: &str) -> String {
    let value = if value.is_empty() { "-" } else { value };
    format!("*{label}:* {}", escape_markdown(value))
}

/// Escape Telegram legacy Markdown control characters.
fn escape_markdown(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lead::LeadSubmission;
    use wiremock::matchers::{method, path, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn lead(phone: Option<&str>) -> Lead {
        LeadSubmission {
            name: Some("Dana Reyes".into()),
            email: Some("dana@example.com".into()),
            phone: phone.map(String::from),
            business: Some("Reyes Bakery".into()),
            pain_point: Some("too many emails".into()),
            ..Default::default()
        }
        .into_lead("insight".into())
    }

    fn config(base: &str) -> Config {
        let mut config = Config::default();
        config.server.external_url = "https://funnel.example.com/".into();
        config.notify.call_delay_ms = 0;
        config.resend.api_key = "re_test".into();
        config.resend.from = "spark@example.com".into();
        config.resend.api_base = Some(base.to_string());
        config.twilio.account_sid = "AC1".into();
        config.twilio.auth_token = "tok".into();
        config.twilio.phone_number = "+12085550000".into();
        config.twilio.api_base = Some(base.to_string());
        config.telegram.bot_token = "1:x".into();
        config.telegram.chat_id = "42".into();
        config.telegram.api_base = Some(base.to_string());
        config
    }

    async fn mount_ok(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path_regex(r"^/(emails|2010-04-01/.*|bot.*)$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "x", "sid": "y", "ok": true
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn unconfigured_channels_are_skipped() {
        let notifier = LeadNotifier::from_config(&Config::default());
        let report = notifier.notify(&lead(Some("2085551234"))).await;
        assert_eq!(report.email, ChannelOutcome::Skipped("not configured"));
        assert_eq!(report.sms, ChannelOutcome::Skipped("not configured"));
        assert_eq!(report.call, ChannelOutcome::Skipped("not configured"));
        assert_eq!(report.operator, ChannelOutcome::Skipped("not configured"));
    }

    #[tokio::test]
    async fn all_channels_sent_sms_before_call() {
        let server = MockServer::start().await;
        mount_ok(&server).await;

        let notifier = LeadNotifier::from_config(&config(&server.uri()));
        let report = notifier.notify(&lead(Some("(208) 555-1234"))).await;

        assert_eq!(report.email, ChannelOutcome::Sent);
        assert_eq!(report.sms, ChannelOutcome::Sent);
        assert_eq!(report.call, ChannelOutcome::Sent);
        assert_eq!(report.operator, ChannelOutcome::Sent);

        let requests = server.received_requests().await.unwrap();
        let paths: Vec<String> = requests.iter().map(|r| r.url.path().to_string()).collect();
        let sms = paths.iter().position(|p| p.ends_with("Messages.json")).unwrap();
        let call = paths.iter().position(|p| p.ends_with("Calls.json")).unwrap();
        let summary = paths.iter().position(|p| p.starts_with("/bot")).unwrap();
        assert!(sms < call, "SMS must precede the call: {paths:?}");
        assert_eq!(summary, paths.len() - 1, "summary goes last: {paths:?}");

        let call_body = String::from_utf8_lossy(&requests[call].body).to_string();
        assert!(call_body.contains("To=%2B12085551234"));
        assert!(call_body.contains(
            "Url=https%3A%2F%2Ffunnel.example.com%2Fapi%2Fvoice%2Fwelcome%3Fname%3DDana"
        ));
    }

    #[tokio::test]
    async fn call_waits_for_configured_delay_after_sms() {
        let server = MockServer::start().await;
        mount_ok(&server).await;

        let mut cfg = config(&server.uri());
        cfg.notify.call_delay_ms = 300;
        let notifier = LeadNotifier::from_config(&cfg);

        let started = std::time::Instant::now();
        let report = notifier.notify(&lead(Some("2085551234"))).await;
        let elapsed = started.elapsed();

        assert_eq!(report.sms, ChannelOutcome::Sent);
        assert_eq!(report.call, ChannelOutcome::Sent);
        assert!(
            elapsed >= Duration::from_millis(300),
            "call placed after {elapsed:?}"
        );

        let paths: Vec<String> = server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .map(|r| r.url.path().to_string())
            .collect();
        let sms = paths.iter().position(|p| p.ends_with("Messages.json")).unwrap();
        let call = paths.iter().position(|p| p.ends_with("Calls.json")).unwrap();
        assert!(sms < call, "SMS must precede the call: {paths:?}");
    }

    #[tokio::test]
    async fn no_phone_skips_the_delay() {
        let server = MockServer::start().await;
        mount_ok(&server).await;

        let mut cfg = config(&server.uri());
        cfg.notify.call_delay_ms = 5_000;
        let started = std::time::Instant::now();
        let report = LeadNotifier::from_config(&cfg).notify(&lead(None)).await;

        assert_eq!(report.call, ChannelOutcome::Skipped("no phone"));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn email_failure_does_not_stop_other_channels() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;
        mount_ok(&server).await;

        let notifier = LeadNotifier::from_config(&config(&server.uri()));
        let report = notifier.notify(&lead(Some("2085551234"))).await;

        assert!(matches!(report.email, ChannelOutcome::Failed(ref r) if r.contains("500")));
        assert_eq!(report.sms, ChannelOutcome::Sent);
        assert_eq!(report.call, ChannelOutcome::Sent);
        assert_eq!(report.operator, ChannelOutcome::Sent);

        let requests = server.received_requests().await.unwrap();
        let summary = requests
            .iter()
            .find(|r| r.url.path().starts_with("/bot"))
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&summary.body).unwrap();
        let text = body["text"].as_str().unwrap();
        assert!(text.contains("❌ Email"), "{text}");
        assert!(text.contains("✅ SMS"), "{text}");
    }

    #[tokio::test]
    async fn no_phone_skips_twilio() {
        let server = MockServer::start().await;
        mount_ok(&server).await;

        let notifier = LeadNotifier::from_config(&config(&server.uri()));
        let report = notifier.notify(&lead(None)).await;

        assert_eq!(report.email, ChannelOutcome::Sent);
        assert_eq!(report.sms, ChannelOutcome::Skipped("no phone"));
        assert_eq!(report.call, ChannelOutcome::Skipped("no phone"));

        let requests = server.received_requests().await.unwrap();
        assert!(requests.iter().all(|r| !r.url.path().starts_with("/2010-04-01")));
    }

    #[tokio::test]
    async fn missing_external_url_skips_only_the_call() {
        let server = MockServer::start().await;
        mount_ok(&server).await;

        let mut cfg = config(&server.uri());
        cfg.server.external_url.clear();
        let report = LeadNotifier::from_config(&cfg)
            .notify(&lead(Some("2085551234")))
            .await;
        assert_eq!(report.sms, ChannelOutcome::Sent);
        assert_eq!(report.call, ChannelOutcome::Skipped("no external URL"));
    }

    #[test]
    fn summary_lists_fields_and_markers() {
        let mut l = lead(Some("+12085551234"));
        l.website = Some("reyes_bakery.com".into());
        let report = LeadReport {
            email: ChannelOutcome::Sent,
            sms: ChannelOutcome::Failed("bad *number*".into()),
            call: ChannelOutcome::Skipped("no external URL"),
            operator: ChannelOutcome::Skipped("not configured"),
        };
        let text = operator_summary(&BrandConfig::default(), &l, &report);

        assert!(text.starts_with("🔥 *New Lead from Stoke-AI!*"));
        assert!(text.contains("*Name:* Dana Reyes"));
        assert!(text.contains("*Phone:* +12085551234"));
        assert!(text.contains("*Website:* reyes\\_bakery.com"));
        assert!(text.contains("*Pain point:* too many emails"));
        assert!(!text.contains("*Message:*"));
        assert!(text.contains("✅ Email"));
        assert!(text.contains("❌ SMS: bad \\*number\\*"));
        assert!(text.contains("➖ Call: no external URL"));
    }

    #[test]
    fn long_failure_reasons_are_truncated() {
        let outcome = ChannelOutcome::failed("x".repeat(500));
        let ChannelOutcome::Failed(reason) = outcome else {
            panic!("expected failure");
        };
        assert_eq!(reason.chars().count(), MAX_REASON_CHARS + 1);
        assert!(reason.ends_with('…'));
    }
}
