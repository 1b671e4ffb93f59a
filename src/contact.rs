use url::Url;

pub const EMAIL_COPIED_MESSAGE: &str = "Email copied to clipboard!";
pub const SENDING_LABEL: &str = "Sending...";

pub fn mailto_address(href: &str) -> Option<String> {
    let url = Url::parse(href.trim()).ok()?;
    if url.scheme() != "mailto" {
        return None;
    }

    let address = url.path().trim();
    if address.is_empty() {
        None
    } else {
        Some(address.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EmailCopyOutcome {
    Notify(&'static str),
    Navigate(String),
}

pub fn should_intercept(href: &str, clipboard_available: bool) -> Option<String> {
    if !clipboard_available {
        return None;
    }
    mailto_address(href)
}

pub fn after_clipboard_write<E>(result: Result<(), E>, href: &str) -> EmailCopyOutcome {
    match result {
        Ok(()) => EmailCopyOutcome::Notify(EMAIL_COPIED_MESSAGE),
        Err(_) => EmailCopyOutcome::Navigate(href.to_string()),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitButtonState {
    idle_label: String,
    sending: bool,
}

impl SubmitButtonState {
    pub fn new(idle_label: impl Into<String>) -> Self {
        Self {
            idle_label: idle_label.into(),
            sending: false,
        }
    }

    pub fn label(&self) -> &str {
        if self.sending {
            SENDING_LABEL
        } else {
            &self.idle_label
        }
    }

    pub fn begin(&mut self) -> bool {
        !std::mem::replace(&mut self.sending, true)
    }

    pub fn reset(&mut self) {
        self.sending = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mailto_address_strips_scheme_and_query() {
        assert_eq!(mailto_address("mailto:a@b.com").as_deref(), Some("a@b.com"));
        assert_eq!(
            mailto_address("mailto:a@b.com?subject=Hello").as_deref(),
            Some("a@b.com")
        );
        assert_eq!(mailto_address("https://b.com"), None);
        assert_eq!(mailto_address("mailto:"), None);
        assert_eq!(mailto_address("not a url"), None);
    }

    #[test]
    fn successful_copy_notifies_without_navigating() {
        let href = "mailto:a@b.com";
        assert_eq!(should_intercept(href, true).as_deref(), Some("a@b.com"));
        assert_eq!(
            after_clipboard_write::<()>(Ok(()), href),
            EmailCopyOutcome::Notify(EMAIL_COPIED_MESSAGE)
        );
    }

    #[test]
    fn rejected_or_missing_clipboard_falls_back_to_mailto() {
        let href = "mailto:a@b.com";
        assert_eq!(should_intercept(href, false), None);
        assert_eq!(
            after_clipboard_write(Err("denied"), href),
            EmailCopyOutcome::Navigate(href.to_string())
        );
    }

    #[test]
    fn submit_button_swaps_label_until_reset() {
        let mut button = SubmitButtonState::new("Send Message");
        assert_eq!(button.label(), "Send Message");

        assert!(button.begin());
        assert_eq!(button.label(), SENDING_LABEL);
        assert!(!button.begin());

        button.reset();
        assert_eq!(button.label(), "Send Message");
    }
}
