//! Contact form validation and per-sender submission throttling.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::types::Email;

/// Length of the throttling window.
pub const WINDOW: Duration = Duration::minutes(15);

/// Submissions allowed per window.
pub const MAX_SUBMISSIONS: u32 = 5;

/// Minimum gap between two submissions from the same sender.
pub const COOLDOWN: Duration = Duration::seconds(10);

/// Contact form as posted by the browser.
///
/// `company` is a honeypot field hidden from humans; bots fill it in.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub company: String,
}

/// Trimmed contact fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanedContact {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// A contact message that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidContact {
    pub name: String,
    pub email: Email,
    pub subject: String,
    pub message: String,
}

fn length_between(value: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&value.chars().count())
}

impl ContactForm {
    /// Check every field and collect all problems, in form order.
    ///
    /// The cleaned (trimmed) fields are returned alongside the errors so
    /// callers can store them once the list is empty.
    #[must_use]
    pub fn validate(&self) -> (Vec<&'static str>, CleanedContact) {
        let cleaned = CleanedContact {
            name: self.name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            subject: self.subject.trim().to_owned(),
            message: self.message.trim().to_owned(),
        };

        let mut errors = Vec::new();
        if !self.company.trim().is_empty() {
            errors.push("Spam detected.");
        }
        if !length_between(&cleaned.name, 2, 100) {
            errors.push("Name must be between 2 and 100 characters.");
        }
        if Email::parse(&cleaned.email).is_err() {
            errors.push("Valid email is required.");
        }
        if !length_between(&cleaned.subject, 3, 120) {
            errors.push("Subject must be between 3 and 120 characters.");
        }
        if !length_between(&cleaned.message, 20, 2000) {
            errors.push("Message must be between 20 and 2000 characters.");
        }

        (errors, cleaned)
    }

    /// Validate and return the first problem, the way the API reports it.
    ///
    /// # Errors
    ///
    /// Returns the first validation message.
    pub fn into_valid(self) -> Result<ValidContact, &'static str> {
        let (errors, cleaned) = self.validate();
        if let Some(&first) = errors.first() {
            return Err(first);
        }
        let email = Email::parse(&cleaned.email).map_err(|_| "Valid email is required.")?;
        Ok(ValidContact {
            name: cleaned.name,
            email,
            subject: cleaned.subject,
            message: cleaned.message,
        })
    }
}

/// Outcome of a throttle check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    Allowed,
    /// The previous submission was too recent.
    Cooldown,
    /// The window's quota is used up.
    RateLimited,
}

impl ThrottleDecision {
    /// Message returned to the sender when a submission is refused.
    #[must_use]
    pub const fn message(&self) -> Option<&'static str> {
        match self {
            Self::Allowed => None,
            Self::Cooldown => Some("Please wait a few seconds before sending another message."),
            Self::RateLimited => Some("Too many messages sent. Please try again later."),
        }
    }
}

/// Submission history of one sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionWindow {
    count: u32,
    first_seen: DateTime<Utc>,
    last_seen: Option<DateTime<Utc>>,
}

impl SubmissionWindow {
    #[must_use]
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self {
            count: 0,
            first_seen: now,
            last_seen: None,
        }
    }

    /// Record an attempt at `now`.
    ///
    /// The window restarts once it is older than [`WINDOW`]. Refused
    /// attempts are not counted.
    pub fn check(&mut self, now: DateTime<Utc>) -> ThrottleDecision {
        if now - self.first_seen > WINDOW {
            self.count = 0;
            self.first_seen = now;
        }
        if self.last_seen.is_some_and(|last| now - last < COOLDOWN) {
            return ThrottleDecision::Cooldown;
        }
        if self.count >= MAX_SUBMISSIONS {
            return ThrottleDecision::RateLimited;
        }

        self.count += 1;
        self.last_seen = Some(now);
        ThrottleDecision::Allowed
    }

    /// Whether the window has expired and the entry can be forgotten.
    #[must_use]
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        now - self.first_seen > WINDOW
    }

    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form() -> ContactForm {
        ContactForm {
            name: "Aline".to_owned(),
            email: " Aline@Example.com ".to_owned(),
            subject: "Sizing question".to_owned(),
            message: "Do the Classic clogs run true to size?".to_owned(),
            company: String::new(),
        }
    }

    #[test]
    fn test_valid_form() {
        let (errors, cleaned) = form().validate();
        assert!(errors.is_empty());
        assert_eq!(cleaned.email, "Aline@Example.com");

        let valid = form().into_valid().unwrap();
        assert_eq!(valid.email.as_str(), "aline@example.com");
    }

    #[test]
    fn test_errors_in_form_order() {
        let bad = ContactForm {
            name: "A".to_owned(),
            email: "nope".to_owned(),
            subject: "Hi".to_owned(),
            message: "short".to_owned(),
            company: "Bots Inc".to_owned(),
        };
        let (errors, _) = bad.validate();
        assert_eq!(
            errors,
            vec![
                "Spam detected.",
                "Name must be between 2 and 100 characters.",
                "Valid email is required.",
                "Subject must be between 3 and 120 characters.",
                "Message must be between 20 and 2000 characters.",
            ]
        );
        assert_eq!(bad.into_valid(), Err("Spam detected."));
    }

    #[test]
    fn test_message_length_limits() {
        let mut f = form();
        f.message = "x".repeat(2001);
        assert_eq!(
            f.into_valid(),
            Err("Message must be between 20 and 2000 characters.")
        );

        let mut f = form();
        f.message = format!("  {}  ", "x".repeat(20));
        assert!(f.into_valid().is_ok());
    }

    #[test]
    fn test_throttle_cooldown() {
        let start = Utc::now();
        let mut window = SubmissionWindow::new(start);
        assert_eq!(window.check(start), ThrottleDecision::Allowed);
        assert_eq!(
            window.check(start + Duration::seconds(5)),
            ThrottleDecision::Cooldown
        );
        assert_eq!(
            window.check(start + Duration::seconds(10)),
            ThrottleDecision::Allowed
        );
        assert_eq!(window.count(), 2);
    }

    #[test]
    fn test_throttle_limit_and_reset() {
        let start = Utc::now();
        let mut window = SubmissionWindow::new(start);
        for i in 0..5 {
            assert_eq!(
                window.check(start + Duration::seconds(i * 11)),
                ThrottleDecision::Allowed
            );
        }
        let sixth = window.check(start + Duration::seconds(60));
        assert_eq!(sixth, ThrottleDecision::RateLimited);
        assert!(sixth.message().unwrap().starts_with("Too many"));

        let later = start + Duration::minutes(16);
        assert!(window.is_stale(later));
        assert_eq!(window.check(later), ThrottleDecision::Allowed);
        assert_eq!(window.count(), 1);
    }
}
