pub mod error;

pub use error::{MailerError, Result};

use chrono::{Datelike, Utc};

#[derive(Debug, Clone)]
pub struct MailerOptions {
    /// Base URL of the transactional mail API, e.g. `https://api.resend.com`.
    pub base_url: String,
    pub api_key: String,
    /// Sender, e.g. `"Coachdex" <no-reply@coachdex.app>`.
    pub from: String,
}

pub struct MailerClient {
    client: reqwest::Client,
    options: MailerOptions,
}

impl MailerClient {
    pub fn new(options: MailerOptions) -> Self {
        Self {
            client: reqwest::Client::new(),
            options,
        }
    }

    /// Send the password-reset OTP message.
    pub async fn send_password_reset(&self, recipient: &str, otp: &str) -> Result<()> {
        let body = serde_json::json!({
            "from": self.options.from,
            "to": [recipient],
            "subject": "Password Reset OTP - Coachdex",
            "html": reset_email_html(otp),
            "text": reset_email_text(otp),
        });

        let url = format!("{}/emails", self.options.base_url.trim_end_matches('/'));
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.options.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(MailerError::Api {
                status: status.as_u16(),
                message,
            });
        }

        tracing::info!(recipient, "Password reset email sent");
        Ok(())
    }
}

fn reset_email_html(otp: &str) -> String {
    let year = Utc::now().year();
    format!(
        r#"<!DOCTYPE html>
<html>
  <body style="margin:0;padding:0;font-family:-apple-system,'Segoe UI',Roboto,Arial,sans-serif;background-color:#f5f5f5;">
    <table role="presentation" style="width:100%;border-collapse:collapse;">
      <tr><td align="center" style="padding:40px 0;">
        <table role="presentation" style="width:600px;border-collapse:collapse;background-color:#ffffff;border-radius:8px;">
          <tr><td style="padding:40px 40px 20px;text-align:center;">
            <h1 style="margin:0;font-size:28px;color:#000000;">Coach<span style="color:#ef4444;">dex</span></h1>
          </td></tr>
          <tr><td style="padding:20px 40px;">
            <h2 style="margin:0 0 20px;font-size:24px;color:#1f2937;">Password Reset Request</h2>
            <p style="margin:0 0 20px;font-size:16px;color:#4b5563;">
              We received a request to reset your password. Use the OTP code below to complete the process:
            </p>
            <div style="background-color:#f9fafb;border:2px solid #e5e7eb;border-radius:8px;padding:24px;text-align:center;margin:30px 0;">
              <p style="margin:0 0 8px;font-size:14px;color:#6b7280;text-transform:uppercase;">Your OTP Code</p>
              <p style="margin:0;font-size:36px;font-weight:bold;color:#ef4444;letter-spacing:8px;font-family:'Courier New',monospace;">{otp}</p>
            </div>
            <p style="margin:20px 0;font-size:14px;color:#6b7280;">
              This code will expire in <strong>15 minutes</strong>. If you didn't request this password reset, please ignore this email.
            </p>
          </td></tr>
          <tr><td style="padding:20px 40px 40px;border-top:1px solid #e5e7eb;">
            <p style="margin:0;font-size:12px;color:#9ca3af;text-align:center;">This is an automated email. Please do not reply to this message.</p>
            <p style="margin:8px 0 0;font-size:12px;color:#9ca3af;text-align:center;">&copy; {year} Coachdex. All rights reserved.</p>
          </td></tr>
        </table>
      </td></tr>
    </table>
  </body>
</html>"#
    )
}

fn reset_email_text(otp: &str) -> String {
    let year = Utc::now().year();
    format!(
        "Password Reset Request\n\n\
         Your OTP code is: {otp}\n\n\
         This code will expire in 15 minutes. If you didn't request this password reset, please ignore this email.\n\n\
         (c) {year} Coachdex. All rights reserved.\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_body_contains_code() {
        let html = reset_email_html("482913");
        assert!(html.contains("482913"));
        assert!(html.contains("15 minutes"));
    }

    #[test]
    fn text_body_contains_code() {
        let text = reset_email_text("000111");
        assert!(text.contains("Your OTP code is: 000111"));
    }
}
