use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Profile of the signed-in user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl UserProfile {
    /// Display name falling back to the username.
    pub fn display(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.username)
    }
}

#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    user: UserProfile,
}

/// Parse a `/user/info` payload. The profile is wrapped in a `user`
/// field, with a bare-object fallback.
pub fn parse_user_info(value: Value) -> Option<UserProfile> {
    if let Ok(wrapper) = serde_json::from_value::<UserInfoResponse>(value.clone()) {
        return Some(wrapper.user);
    }
    serde_json::from_value::<UserProfile>(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_wrapped_and_bare_profiles() {
        let wrapped = json!({ "user": { "username": "komkem" } });
        let bare = json!({ "username": "komkem", "email": "k@example.com" });
        assert_eq!(parse_user_info(wrapped).unwrap().username, "komkem");
        assert_eq!(
            parse_user_info(bare).unwrap().email.as_deref(),
            Some("k@example.com")
        );
        assert!(parse_user_info(Value::Null).is_none());
    }

    #[test]
    fn display_falls_back_to_username() {
        let mut profile = UserProfile {
            username: "komkem".to_string(),
            ..Default::default()
        };
        assert_eq!(profile.display(), "komkem");
        profile.display_name = Some("Kom".to_string());
        assert_eq!(profile.display(), "Kom");
    }
}
