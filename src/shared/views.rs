/**
 * API Response Views
 *
 * Client-facing shapes returned by the JSON API. None of these carry a
 * password hash; the backend builds them from its row types.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Full profile, only ever returned to the account owner
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub bio: String,
    pub profile_image_url: String,
    pub is_active: bool,
}

/// Profile as seen by anyone other than the owner (no email)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PublicProfile {
    pub id: Uuid,
    pub username: String,
    pub bio: String,
    pub profile_image_url: String,
}

impl From<UserProfile> for PublicProfile {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id,
            username: profile.username,
            bio: profile.bio,
            profile_image_url: profile.profile_image_url,
        }
    }
}

/// Either view of a user, serialized without a tag
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ProfileView {
    Owner(UserProfile),
    Public(PublicProfile),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PostView {
    pub id: Uuid,
    pub content: String,
    /// `None` for anonymous posts or posts whose author was deleted
    pub user_id: Option<Uuid>,
    pub like_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FollowView {
    pub follower_id: Uuid,
    pub followed_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Plain acknowledgement body: `{"message": "..."}`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner_profile() -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            bio: "hello".to_string(),
            profile_image_url: String::new(),
            is_active: true,
        }
    }

    #[test]
    fn test_public_profile_drops_email() {
        let public: PublicProfile = owner_profile().into();
        let json = serde_json::to_value(ProfileView::Public(public)).unwrap();
        assert!(json.get("email").is_none());
        assert_eq!(json["username"], "alice");
    }

    #[test]
    fn test_owner_view_is_untagged() {
        let json = serde_json::to_value(ProfileView::Owner(owner_profile())).unwrap();
        assert_eq!(json["email"], "alice@example.com");
        assert!(json.get("Owner").is_none());
    }
}
