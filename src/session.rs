/// The conversation token handed out by the chat backend.
///
/// Starts empty; the first response carrying a token establishes the
/// session, and every later token the server returns replaces the held one,
/// so server-side session rotation is transparent. The token is never
/// cleared while the process runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Takes over whatever token the server returned. A response without a
    /// token leaves the held one in place.
    pub fn absorb(&mut self, token: Option<String>) {
        if let Some(token) = token {
            self.token = Some(token);
        }
    }
}
