/// Success banner texts shown by the practice application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    LoginSuccess,
    RegistrationSuccess,
    MessageSentSuccess,
}

impl Notification {
    /// The exact banner text.
    pub fn text(&self) -> &'static str {
        match self {
            Notification::LoginSuccess => "You logged into a secure area!",
            Notification::RegistrationSuccess => "Successfully registered, you can log in now.",
            Notification::MessageSentSuccess => "Message was sent successfully",
        }
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}
