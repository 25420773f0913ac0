use serde::{Deserialize, Serialize};
use validator::Validate;

use analog_utils::checks::{check_community_name, check_description, check_slug};
use analog_utils::errors::AppError;

use crate::backend::{retry_once, Backend, CommunityBackend};
use crate::user::Actor;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Community {
    pub community_id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub member_count: i32,
    pub created_by: Option<String>,
    pub create_timestamp: chrono::DateTime<chrono::Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Validate, Serialize, Deserialize)]
pub struct CommunityInputs {
    #[validate(custom(function = "check_community_name"))]
    pub name: String,
    #[validate(custom(function = "check_slug"))]
    pub slug: String,
    #[validate(custom(function = "check_description"))]
    pub description: String,
}

/// Starter communities inserted into a fresh deployment.
pub const STARTER_COMMUNITIES: [(&str, &str, &str); 3] = [
    (
        "Light Phone Users",
        "light-phone",
        "For people living with a Light Phone as their daily driver.",
    ),
    (
        "Brick Phone Enthusiasts",
        "brick-phone",
        "Old handsets, long battery lives, and the people who love them.",
    ),
    (
        "Flip Phone Users",
        "flip-phone",
        "Flip phone owners swapping tips, mods, and carrier advice.",
    ),
];

impl CommunityInputs {
    pub fn new(name: &str, slug: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            slug: slug.to_string(),
            description: description.to_string(),
        }
    }

    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            slug: self.slug.trim().to_string(),
            description: self.description.trim().to_string(),
        }
    }
}

/// Creates a community and enrolls the creator as its first member in one
/// atomic unit, so `member_count` starts at 1 with a matching membership
/// record.
pub async fn create_community<B: Backend>(
    inputs: CommunityInputs,
    created_by: &Actor,
    backend: &B,
) -> Result<Community, AppError> {
    let inputs = inputs.trimmed();
    inputs.validate()?;

    let community = retry_once(|| backend.insert_community(&inputs, Some(created_by))).await?;
    log::debug!(
        "Created community {} ({})",
        community.community_id,
        community.slug
    );
    Ok(community)
}

pub async fn get_community_vec<B: Backend>(backend: &B) -> Result<Vec<Community>, AppError> {
    retry_once(|| backend.community_vec()).await
}

pub async fn get_community_by_id<B: Backend>(
    community_id: i64,
    backend: &B,
) -> Result<Community, AppError> {
    retry_once(|| backend.community_by_id(community_id)).await
}

pub async fn get_community_by_slug<B: Backend>(
    slug: &str,
    backend: &B,
) -> Result<Community, AppError> {
    retry_once(|| backend.community_by_slug(slug)).await
}

pub async fn check_membership<B: Backend>(
    community_id: i64,
    user_id: &str,
    backend: &B,
) -> Result<bool, AppError> {
    retry_once(|| backend.is_member(community_id, user_id)).await
}

/// Adds the user to the community. Joining twice is a no-op that leaves
/// `member_count` untouched; returns whether a membership was created.
pub async fn join_community<B: Backend>(
    community_id: i64,
    user_id: &str,
    backend: &B,
) -> Result<bool, AppError> {
    let joined = retry_once(|| backend.insert_membership(community_id, user_id)).await?;
    if joined {
        log::debug!("User {user_id} joined community {community_id}");
    }
    Ok(joined)
}

/// Removes the user from the community. Leaving without a membership is a
/// no-op; returns whether a membership was removed.
pub async fn leave_community<B: Backend>(
    community_id: i64,
    user_id: &str,
    backend: &B,
) -> Result<bool, AppError> {
    let left = retry_once(|| backend.delete_membership(community_id, user_id)).await?;
    if left {
        log::debug!("User {user_id} left community {community_id}");
    }
    Ok(left)
}

/// Inserts the starter communities, skipping any slug that already exists.
/// Safe to run on every startup.
pub async fn seed_communities<B: Backend>(backend: &B) -> Result<(), AppError> {
    for (name, slug, description) in STARTER_COMMUNITIES {
        match retry_once(|| backend.community_by_slug(slug)).await {
            Ok(_) => continue,
            Err(AppError::NotFound) => {}
            Err(error) => return Err(error),
        }
        let inputs = CommunityInputs::new(name, slug, description);
        retry_once(|| backend.insert_community(&inputs, None)).await?;
        log::debug!("Seeded community {slug}");
    }
    Ok(())
}
