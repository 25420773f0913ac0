use serde::{Deserialize, Serialize};

use analog_utils::errors::AppError;

use crate::backend::{retry_once, Backend, ContentBackend, ModerationBackend};
use crate::post::Post;
use crate::section::Section;
use crate::user::Actor;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Moderator {
    pub user_id: String,
    pub email: String,
}

/// Message left for an author whose post was removed by a moderator.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    pub notification_id: i64,
    pub user_id: String,
    pub post_title: String,
    pub section_key: String,
    pub moderator_name: String,
    pub is_read: bool,
    pub create_timestamp: chrono::DateTime<chrono::Utc>,
}

pub async fn check_moderator<B: Backend>(user_id: &str, backend: &B) -> Result<bool, AppError> {
    retry_once(|| backend.is_moderator(user_id)).await
}

/// Grants moderator privileges. Re-granting updates the stored email
/// rather than failing.
pub async fn add_moderator<B: Backend>(
    user_id: &str,
    email: &str,
    backend: &B,
) -> Result<Moderator, AppError> {
    let moderator = retry_once(|| backend.insert_moderator(user_id, email)).await?;
    log::debug!("Granted moderator privileges to user {user_id}");
    Ok(moderator)
}

/// Removes a post on behalf of a moderator and leaves a notification for
/// its author. The deletion is the operation; the notification is best
/// effort and never rolls it back.
pub async fn moderate_delete_post<B: Backend>(
    section: &Section,
    post_id: i64,
    moderator: &Actor,
    backend: &B,
) -> Result<Post, AppError> {
    if !retry_once(|| backend.is_moderator(&moderator.user_id)).await? {
        return Err(AppError::InsufficientPrivileges);
    }

    let post = retry_once(|| backend.delete_post(section, post_id)).await?;
    log::debug!(
        "Moderator {} deleted post {post_id} in section {section}",
        moderator.user_id
    );

    let notified = retry_once(|| {
        backend.insert_notification(
            &post.author_id,
            &post.title,
            section.key(),
            &moderator.pseudonym,
        )
    })
    .await;
    if let Err(error) = notified {
        log::warn!(
            "Post {post_id} deleted but author notification failed: {}",
            error.user_message()
        );
    }

    Ok(post)
}

/// The user's notifications, most recent first.
pub async fn get_notification_vec<B: Backend>(
    user_id: &str,
    backend: &B,
) -> Result<Vec<Notification>, AppError> {
    retry_once(|| backend.notification_vec(user_id)).await
}
