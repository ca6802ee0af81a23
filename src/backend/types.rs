//! JSON wire types for the leaderboard API

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u32,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub id: u32,
    pub user_id: u32,
    pub score: u32,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A leaderboard row: a score joined with the user who set it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub id: u32,
    pub score: u32,
    #[serde(default)]
    pub created_at: Option<String>,
    pub user: User,
}

// Request bodies

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest<'a> {
    pub display_name: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CredentialsRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitScoreRequest {
    pub score: u32,
}

// Response envelopes

#[derive(Debug, Clone, Deserialize)]
pub struct UserResponse {
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoreResponse {
    pub score: ScoreRecord,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoresResponse {
    pub scores: Vec<ScoreRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardResponse {
    pub leaderboard: Vec<LeaderboardEntry>,
}

/// Body of any non-2xx response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaderboard_entry_uses_camel_case() {
        let json = r#"{
            "id": 4, "score": 31, "createdAt": "2024-05-01T10:00:00Z",
            "user": {"id": 2, "displayName": "wren"}
        }"#;
        let entry: LeaderboardEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.user.display_name, "wren");
        assert_eq!(entry.score, 31);
        assert_eq!(entry.user.created_at, None);
    }

    #[test]
    fn test_login_body_shape() {
        let body = serde_json::to_string(&LoginRequest { display_name: "kit" }).unwrap();
        assert_eq!(body, r#"{"displayName":"kit"}"#);
    }
}
