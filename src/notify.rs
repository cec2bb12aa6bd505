//! User-facing notifications.

/// Shows messages to the user, like a modal alert or a toast.
#[cfg_attr(test, mockall::automock)]
pub trait UserNotifier {
    /// Shows the provided failure `message` to the user.
    fn notify_failure(&self, message: &str);
}
