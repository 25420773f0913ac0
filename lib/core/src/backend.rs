use std::future::Future;

use async_trait::async_trait;

use analog_utils::errors::AppError;

use crate::comment::Comment;
use crate::community::{Community, CommunityInputs};
use crate::manifesto::ManifestoEntry;
use crate::moderation::{Moderator, Notification};
use crate::post::{Post, PostInputs};
use crate::ranking::{SortType, VoteKind};
use crate::section::Section;
use crate::user::Actor;

/// Persistence contract for posts and their comments, partitioned by
/// [`Section`]. Implementations must apply `increment_vote` as an atomic
/// storage-level increment, never as read-modify-write.
#[async_trait]
pub trait ContentBackend: Send + Sync {
    async fn insert_post(&self, section: &Section, inputs: &PostInputs, actor: &Actor) -> Result<Post, AppError>;
    async fn post_by_id(&self, section: &Section, post_id: i64) -> Result<Post, AppError>;
    async fn post_vec(&self, section: &Section, sort_type: SortType) -> Result<Vec<Post>, AppError>;
    async fn post_vec_by_author(&self, section: &Section, author_name: &str) -> Result<Vec<Post>, AppError>;
    async fn increment_vote(&self, section: &Section, post_id: i64, vote: VoteKind) -> Result<Post, AppError>;
    async fn insert_comment(&self, section: &Section, post_id: i64, content: &str, actor: &Actor) -> Result<Comment, AppError>;
    async fn comment_vec(&self, section: &Section, post_id: i64) -> Result<Vec<Comment>, AppError>;
    /// Removes the post and cascades its comments.
    async fn delete_post(&self, section: &Section, post_id: i64) -> Result<Post, AppError>;
}

/// Persistence contract for communities and membership records. The
/// membership records are the source of truth; `member_count` is the cached
/// counter and only moves when a record is actually inserted or removed.
#[async_trait]
pub trait CommunityBackend: Send + Sync {
    /// Inserts the community and, when `created_by` is given, the creator's
    /// membership in the same atomic unit.
    async fn insert_community(&self, inputs: &CommunityInputs, created_by: Option<&Actor>) -> Result<Community, AppError>;
    async fn community_vec(&self) -> Result<Vec<Community>, AppError>;
    async fn community_by_id(&self, community_id: i64) -> Result<Community, AppError>;
    async fn community_by_slug(&self, slug: &str) -> Result<Community, AppError>;
    async fn is_member(&self, community_id: i64, user_id: &str) -> Result<bool, AppError>;
    /// Returns whether a new membership was created (false when already a member).
    async fn insert_membership(&self, community_id: i64, user_id: &str) -> Result<bool, AppError>;
    /// Returns whether a membership was removed (false when not a member).
    async fn delete_membership(&self, community_id: i64, user_id: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait ManifestoBackend: Send + Sync {
    async fn insert_manifesto_entry(&self, content: &str) -> Result<ManifestoEntry, AppError>;
    async fn manifesto_entry_vec(&self) -> Result<Vec<ManifestoEntry>, AppError>;
}

#[async_trait]
pub trait ModerationBackend: Send + Sync {
    async fn is_moderator(&self, user_id: &str) -> Result<bool, AppError>;
    async fn insert_moderator(&self, user_id: &str, email: &str) -> Result<Moderator, AppError>;
    async fn insert_notification(
        &self,
        user_id: &str,
        post_title: &str,
        section_key: &str,
        moderator_name: &str,
    ) -> Result<Notification, AppError>;
    async fn notification_vec(&self, user_id: &str) -> Result<Vec<Notification>, AppError>;
}

/// Everything the store layer needs from a persistence backend.
pub trait Backend: ContentBackend + CommunityBackend + ManifestoBackend + ModerationBackend {}

impl<B: ContentBackend + CommunityBackend + ManifestoBackend + ModerationBackend> Backend for B {}

/// Runs a backend operation, retrying exactly once when the backend reports
/// itself unavailable. Safe for writes too: backends fail before applying
/// anything when unreachable.
pub(crate) async fn retry_once<T, F, Fut>(operation: F) -> Result<T, AppError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    match operation().await {
        Err(AppError::Unavailable(reason)) => {
            log::warn!("Backend unavailable ({reason}), retrying once");
            operation().await
        }
        result => result,
    }
}
