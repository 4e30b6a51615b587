/// Who is making a request. Resolved once per request from the session
/// token and threaded through every core call; a missing or expired token
/// degrades to `Anonymous` instead of failing the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerIdentity {
    Anonymous,
    User(i64),
}

impl CallerIdentity {
    #[must_use]
    pub fn user_id(self) -> Option<i64> {
        match self {
            CallerIdentity::User(id) => Some(id),
            CallerIdentity::Anonymous => None,
        }
    }
}
