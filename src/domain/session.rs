/// Caller identity forwarded to the content API on every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub org_id: i64,
    pub user_id: i64,
}

impl Session {
    pub fn new(access_token: impl Into<String>, org_id: i64, user_id: i64) -> Self {
        Self {
            access_token: access_token.into(),
            org_id,
            user_id,
        }
    }
}
