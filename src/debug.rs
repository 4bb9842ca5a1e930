//! Development-only impersonation shortcut.
//!
//! Only compiled with the `debug-quickswitch` feature. The server exposes
//! `/debug/quickswitch/<key>` in non-production deployments; following it logs
//! the browser session in as that student.

use reqwest::Method;

use crate::models::Student;
use crate::services::{ApiError, HttpTwinApi};

/// What the quick-switch URL is keyed by
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuickSwitchKey {
    StudentNumber(u32),
    /// Older deployments keyed users by email
    Email(String),
}

impl From<&Student> for QuickSwitchKey {
    fn from(student: &Student) -> Self {
        QuickSwitchKey::StudentNumber(student.student_number)
    }
}

pub fn quickswitch_path(key: &QuickSwitchKey) -> String {
    match key {
        QuickSwitchKey::StudentNumber(number) => format!("/debug/quickswitch/{}", number),
        QuickSwitchKey::Email(email) => {
            format!("/debug/quickswitch/{}", urlencoding::encode(email))
        }
    }
}

/// Tracks the debug target field and yields where to navigate when it is set
#[derive(Debug, Clone)]
pub struct DebugSwitcher {
    base_url: String,
    target: Option<Student>,
}

impl DebugSwitcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            target: None,
        }
    }

    pub fn target(&self) -> Option<&Student> {
        self.target.as_ref()
    }

    /// Update the target. Returns the navigation URL when a student was set.
    pub fn set_target(&mut self, target: Option<Student>) -> Option<String> {
        self.target = target;
        self.target.as_ref().map(|student| {
            let url = format!("{}{}", self.base_url, quickswitch_path(&QuickSwitchKey::from(student)));
            tracing::warn!("Debug quick-switch to {}", url);
            url
        })
    }
}

impl HttpTwinApi {
    /// Follow the quick-switch redirect. Returns the URL the server finally sent us to.
    pub async fn quickswitch(&self, key: &QuickSwitchKey) -> Result<String, ApiError> {
        let response = self
            .request(Method::GET, &quickswitch_path(key))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.url().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quickswitch_path_by_student_number() {
        let key = QuickSwitchKey::from(&Student::new(2097174, "Jorrit Aärts"));
        assert_eq!(quickswitch_path(&key), "/debug/quickswitch/2097174");
    }

    #[test]
    fn test_quickswitch_path_encodes_email() {
        let key = QuickSwitchKey::Email("p wagener@avans.nl".to_string());
        assert_eq!(quickswitch_path(&key), "/debug/quickswitch/p%20wagener%40avans.nl");
    }

    #[test]
    fn test_switcher_only_navigates_when_set() {
        let mut switcher = DebugSwitcher::new("http://localhost:8000/");

        assert_eq!(switcher.set_target(None), None);
        assert_eq!(
            switcher.set_target(Some(Student::new(1, "Paul Wagener"))),
            Some("http://localhost:8000/debug/quickswitch/1".to_string())
        );
        assert_eq!(switcher.target().map(|s| s.student_number), Some(1));
    }
}
