use std::env;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use analog_utils::errors::AppError;

use crate::backend::{CommunityBackend, ContentBackend, ManifestoBackend, ModerationBackend};
use crate::comment::Comment;
use crate::community::{Community, CommunityInputs};
use crate::manifesto::ManifestoEntry;
use crate::moderation::{Moderator, Notification};
use crate::post::{Post, PostInputs};
use crate::ranking::{SortType, VoteKind};
use crate::section::Section;
use crate::user::Actor;

pub const DB_URL_ENV: &str = "DATABASE_URL";

/// Postgres-backed persistence. All counter updates run as single SQL
/// statements so concurrent writers cannot lose increments, and multi-row
/// writes run in one transaction.
#[derive(Clone, Debug)]
pub struct PgBackend {
    pool: PgPool,
}

impl PgBackend {
    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub async fn from_env() -> Result<Self, AppError> {
        Self::connect(&env::var(DB_URL_ENV)?).await
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<(), AppError> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|error| AppError::DatabaseError(error.to_string()))
    }
}

fn map_slug_conflict(error: sqlx::Error) -> AppError {
    match &error {
        sqlx::Error::Database(db_error) if db_error.is_unique_violation() => {
            AppError::validation("A community with this slug already exists")
        }
        _ => AppError::from(error),
    }
}

fn map_missing_community(error: sqlx::Error) -> AppError {
    match &error {
        sqlx::Error::Database(db_error) if db_error.is_foreign_key_violation() => {
            AppError::NotFound
        }
        _ => AppError::from(error),
    }
}

#[async_trait]
impl ContentBackend for PgBackend {
    async fn insert_post(
        &self,
        section: &Section,
        inputs: &PostInputs,
        actor: &Actor,
    ) -> Result<Post, AppError> {
        let post = sqlx::query_as::<_, Post>(
            "INSERT INTO posts \
             (section_key, community_id, title, description, author_id, author_name, image_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING *",
        )
        .bind(section.key())
        .bind(section.community_id())
        .bind(&inputs.title)
        .bind(&inputs.description)
        .bind(&actor.user_id)
        .bind(&actor.pseudonym)
        .bind(&inputs.image_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(post)
    }

    async fn post_by_id(&self, section: &Section, post_id: i64) -> Result<Post, AppError> {
        let post = sqlx::query_as::<_, Post>(
            "SELECT * FROM posts p \
             WHERE p.post_id = $1 AND p.section_key = $2 \
             AND p.community_id IS NOT DISTINCT FROM $3",
        )
        .bind(post_id)
        .bind(section.key())
        .bind(section.community_id())
        .fetch_one(&self.pool)
        .await?;
        Ok(post)
    }

    async fn post_vec(
        &self,
        section: &Section,
        sort_type: SortType,
    ) -> Result<Vec<Post>, AppError> {
        let query = format!(
            "SELECT * FROM posts p \
             WHERE p.section_key = $1 AND p.community_id IS NOT DISTINCT FROM $2 \
             ORDER BY {}",
            sort_type.to_order_by_code()
        );
        let post_vec = sqlx::query_as::<_, Post>(&query)
            .bind(section.key())
            .bind(section.community_id())
            .fetch_all(&self.pool)
            .await?;
        Ok(post_vec)
    }

    async fn post_vec_by_author(
        &self,
        section: &Section,
        author_name: &str,
    ) -> Result<Vec<Post>, AppError> {
        let query = format!(
            "SELECT * FROM posts p \
             WHERE p.section_key = $1 AND p.community_id IS NOT DISTINCT FROM $2 \
             AND p.author_name = $3 \
             ORDER BY {}",
            SortType::Recent.to_order_by_code()
        );
        let post_vec = sqlx::query_as::<_, Post>(&query)
            .bind(section.key())
            .bind(section.community_id())
            .bind(author_name)
            .fetch_all(&self.pool)
            .await?;
        Ok(post_vec)
    }

    async fn increment_vote(
        &self,
        section: &Section,
        post_id: i64,
        vote: VoteKind,
    ) -> Result<Post, AppError> {
        // vote.column() is one of two fixed identifiers, never user input.
        let query = format!(
            "UPDATE posts SET {column} = {column} + 1 \
             WHERE post_id = $1 AND section_key = $2 \
             AND community_id IS NOT DISTINCT FROM $3 \
             RETURNING *",
            column = vote.column()
        );
        let post = sqlx::query_as::<_, Post>(&query)
            .bind(post_id)
            .bind(section.key())
            .bind(section.community_id())
            .fetch_one(&self.pool)
            .await?;
        Ok(post)
    }

    async fn insert_comment(
        &self,
        section: &Section,
        post_id: i64,
        content: &str,
        actor: &Actor,
    ) -> Result<Comment, AppError> {
        let comment = sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (post_id, content, author_id, author_name) \
             SELECT p.post_id, $4, $5, $6 FROM posts p \
             WHERE p.post_id = $1 AND p.section_key = $2 \
             AND p.community_id IS NOT DISTINCT FROM $3 \
             RETURNING *",
        )
        .bind(post_id)
        .bind(section.key())
        .bind(section.community_id())
        .bind(content)
        .bind(&actor.user_id)
        .bind(&actor.pseudonym)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)?;
        Ok(comment)
    }

    async fn comment_vec(&self, section: &Section, post_id: i64) -> Result<Vec<Comment>, AppError> {
        self.post_by_id(section, post_id).await?;
        let comment_vec = sqlx::query_as::<_, Comment>(
            "SELECT * FROM comments c WHERE c.post_id = $1 \
             ORDER BY c.create_timestamp ASC, c.comment_id ASC",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(comment_vec)
    }

    async fn delete_post(&self, section: &Section, post_id: i64) -> Result<Post, AppError> {
        // Comments go with the post via ON DELETE CASCADE.
        let post = sqlx::query_as::<_, Post>(
            "DELETE FROM posts \
             WHERE post_id = $1 AND section_key = $2 \
             AND community_id IS NOT DISTINCT FROM $3 \
             RETURNING *",
        )
        .bind(post_id)
        .bind(section.key())
        .bind(section.community_id())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)?;
        Ok(post)
    }
}

#[async_trait]
impl CommunityBackend for PgBackend {
    async fn insert_community(
        &self,
        inputs: &CommunityInputs,
        created_by: Option<&Actor>,
    ) -> Result<Community, AppError> {
        let mut transaction = self.pool.begin().await?;
        let community = sqlx::query_as::<_, Community>(
            "INSERT INTO communities (name, slug, description, member_count, created_by) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING *",
        )
        .bind(&inputs.name)
        .bind(&inputs.slug)
        .bind(&inputs.description)
        .bind(i32::from(created_by.is_some()))
        .bind(created_by.map(|actor| actor.user_id.clone()))
        .fetch_one(&mut *transaction)
        .await
        .map_err(map_slug_conflict)?;

        if let Some(actor) = created_by {
            sqlx::query("INSERT INTO community_members (community_id, user_id) VALUES ($1, $2)")
                .bind(community.community_id)
                .bind(&actor.user_id)
                .execute(&mut *transaction)
                .await?;
        }
        transaction.commit().await?;
        Ok(community)
    }

    async fn community_vec(&self) -> Result<Vec<Community>, AppError> {
        let community_vec =
            sqlx::query_as::<_, Community>("SELECT * FROM communities ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(community_vec)
    }

    async fn community_by_id(&self, community_id: i64) -> Result<Community, AppError> {
        let community =
            sqlx::query_as::<_, Community>("SELECT * FROM communities WHERE community_id = $1")
                .bind(community_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(community)
    }

    async fn community_by_slug(&self, slug: &str) -> Result<Community, AppError> {
        let community =
            sqlx::query_as::<_, Community>("SELECT * FROM communities WHERE slug = $1")
                .bind(slug)
                .fetch_one(&self.pool)
                .await?;
        Ok(community)
    }

    async fn is_member(&self, community_id: i64, user_id: &str) -> Result<bool, AppError> {
        let is_member = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS( \
             SELECT 1 FROM community_members \
             WHERE community_id = $1 AND user_id = $2)",
        )
        .bind(community_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(is_member)
    }

    async fn insert_membership(&self, community_id: i64, user_id: &str) -> Result<bool, AppError> {
        // The counter only moves when the membership row is actually new.
        let updated = sqlx::query_scalar::<_, i32>(
            "WITH inserted AS ( \
                 INSERT INTO community_members (community_id, user_id) \
                 VALUES ($1, $2) \
                 ON CONFLICT (community_id, user_id) DO NOTHING \
                 RETURNING community_id) \
             UPDATE communities c \
             SET member_count = c.member_count + 1 \
             FROM inserted \
             WHERE c.community_id = inserted.community_id \
             RETURNING c.member_count",
        )
        .bind(community_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_missing_community)?;
        Ok(updated.is_some())
    }

    async fn delete_membership(&self, community_id: i64, user_id: &str) -> Result<bool, AppError> {
        let updated = sqlx::query_scalar::<_, i32>(
            "WITH removed AS ( \
                 DELETE FROM community_members \
                 WHERE community_id = $1 AND user_id = $2 \
                 RETURNING community_id) \
             UPDATE communities c \
             SET member_count = GREATEST(c.member_count - 1, 0) \
             FROM removed \
             WHERE c.community_id = removed.community_id \
             RETURNING c.member_count",
        )
        .bind(community_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(updated.is_some())
    }
}

#[async_trait]
impl ManifestoBackend for PgBackend {
    async fn insert_manifesto_entry(&self, content: &str) -> Result<ManifestoEntry, AppError> {
        let entry = sqlx::query_as::<_, ManifestoEntry>(
            "INSERT INTO manifesto_entries (content) VALUES ($1) RETURNING *",
        )
        .bind(content)
        .fetch_one(&self.pool)
        .await?;
        Ok(entry)
    }

    async fn manifesto_entry_vec(&self) -> Result<Vec<ManifestoEntry>, AppError> {
        let entry_vec = sqlx::query_as::<_, ManifestoEntry>(
            "SELECT * FROM manifesto_entries \
             ORDER BY create_timestamp DESC, entry_id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(entry_vec)
    }
}

#[async_trait]
impl ModerationBackend for PgBackend {
    async fn is_moderator(&self, user_id: &str) -> Result<bool, AppError> {
        let is_moderator = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM moderators WHERE user_id = $1)",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(is_moderator)
    }

    async fn insert_moderator(&self, user_id: &str, email: &str) -> Result<Moderator, AppError> {
        let moderator = sqlx::query_as::<_, Moderator>(
            "INSERT INTO moderators (user_id, email) VALUES ($1, $2) \
             ON CONFLICT (user_id) DO UPDATE SET email = EXCLUDED.email \
             RETURNING *",
        )
        .bind(user_id)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(moderator)
    }

    async fn insert_notification(
        &self,
        user_id: &str,
        post_title: &str,
        section_key: &str,
        moderator_name: &str,
    ) -> Result<Notification, AppError> {
        let notification = sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (user_id, post_title, section_key, moderator_name) \
             VALUES ($1, $2, $3, $4) \
             RETURNING *",
        )
        .bind(user_id)
        .bind(post_title)
        .bind(section_key)
        .bind(moderator_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(notification)
    }

    async fn notification_vec(&self, user_id: &str) -> Result<Vec<Notification>, AppError> {
        let notification_vec = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications n WHERE n.user_id = $1 \
             ORDER BY n.create_timestamp DESC, n.notification_id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(notification_vec)
    }
}
