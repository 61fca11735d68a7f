/// Authentication state of one client: set at login, cleared at logout,
/// consulted before every protected request or view.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    token: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Granted,
    RedirectToLogin,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn logout(&mut self) {
        self.token = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Value for the `Authorization` header, if logged in.
    pub fn authorization(&self) -> Option<String> {
        self.token.as_ref().map(|token| format!("Bearer {token}"))
    }

    pub fn guard(&self) -> Access {
        if self.is_authenticated() {
            Access::Granted
        } else {
            Access::RedirectToLogin
        }
    }
}
