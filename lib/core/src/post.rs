use serde::{Deserialize, Serialize};
use validator::Validate;

use analog_utils::checks::{check_description, check_post_title};
use analog_utils::constants::MAX_IMAGE_URL_LENGTH;
use analog_utils::errors::AppError;

use crate::backend::{retry_once, Backend, CommunityBackend, ContentBackend};
use crate::comment::Comment;
use crate::ranking::{SortType, VoteKind};
use crate::section::Section;
use crate::user::Actor;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub post_id: i64,
    pub title: String,
    pub description: String,
    pub author_id: String,
    pub author_name: String,
    pub image_url: Option<String>,
    pub upvotes: i32,
    pub downvotes: i32,
    pub community_id: Option<i64>,
    pub create_timestamp: chrono::DateTime<chrono::Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Validate, Serialize, Deserialize)]
pub struct PostInputs {
    #[validate(custom(function = "check_post_title"))]
    pub title: String,
    #[validate(custom(function = "check_description"))]
    pub description: String,
    #[validate(length(max = MAX_IMAGE_URL_LENGTH))]
    pub image_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PostWithComments {
    pub post: Post,
    pub comments: Vec<Comment>,
}

/// An author's posts across the four forum sections.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PostHistory {
    pub learning: Vec<Post>,
    pub imagining: Vec<Post>,
    pub organizing: Vec<Post>,
    pub plugs: Vec<Post>,
}

impl Post {
    pub fn score(&self) -> i32 {
        self.upvotes - self.downvotes
    }
}

impl PostInputs {
    pub fn new(title: &str, description: &str, image_url: Option<&str>) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            image_url: image_url.map(str::to_string),
        }
    }

    /// Inputs with surrounding whitespace removed; an image url that trims
    /// to nothing becomes `None`.
    pub fn trimmed(&self) -> Self {
        let image_url = self
            .image_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string);
        Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            image_url,
        }
    }
}

impl PostHistory {
    pub fn total_posts(&self) -> usize {
        self.learning.len() + self.imagining.len() + self.organizing.len() + self.plugs.len()
    }
}

/// Posts of a section, ordered per `sort_type`. An empty section yields an
/// empty vec; backend outages surface as [`AppError::Unavailable`], never as
/// an empty result.
pub async fn get_post_vec<B: Backend>(
    section: &Section,
    sort_type: SortType,
    backend: &B,
) -> Result<Vec<Post>, AppError> {
    retry_once(|| backend.post_vec(section, sort_type)).await
}

pub async fn get_post_by_id<B: Backend>(
    section: &Section,
    post_id: i64,
    backend: &B,
) -> Result<Post, AppError> {
    retry_once(|| backend.post_by_id(section, post_id)).await
}

pub async fn get_post_with_comments_by_id<B: Backend>(
    section: &Section,
    post_id: i64,
    backend: &B,
) -> Result<PostWithComments, AppError> {
    let post = retry_once(|| backend.post_by_id(section, post_id)).await?;
    let comments = retry_once(|| backend.comment_vec(section, post_id)).await?;
    Ok(PostWithComments { post, comments })
}

/// Creates a post in the given section. Community sections require the
/// actor to hold a membership record; this is the enforcement point, not
/// any form visibility in a client.
pub async fn create_post<B: Backend>(
    section: &Section,
    inputs: PostInputs,
    actor: &Actor,
    backend: &B,
) -> Result<Post, AppError> {
    let inputs = inputs.trimmed();
    inputs.validate()?;

    if let Some(community_id) = section.community_id() {
        if !retry_once(|| backend.is_member(community_id, &actor.user_id)).await? {
            return Err(AppError::NotAMember);
        }
    }

    let post = retry_once(|| backend.insert_post(section, &inputs, actor)).await?;
    log::trace!("Created post {} in section {section}", post.post_id);
    Ok(post)
}

pub async fn upvote_post<B: Backend>(
    section: &Section,
    post_id: i64,
    backend: &B,
) -> Result<Post, AppError> {
    vote_on_post(section, post_id, VoteKind::Up, backend).await
}

pub async fn downvote_post<B: Backend>(
    section: &Section,
    post_id: i64,
    backend: &B,
) -> Result<Post, AppError> {
    vote_on_post(section, post_id, VoteKind::Down, backend).await
}

async fn vote_on_post<B: Backend>(
    section: &Section,
    post_id: i64,
    vote: VoteKind,
    backend: &B,
) -> Result<Post, AppError> {
    let post = retry_once(|| backend.increment_vote(section, post_id, vote)).await?;
    log::debug!("Recorded {vote:?} vote on post {post_id} in section {section}");
    Ok(post)
}

/// The author's posts across the four forum sections, most recent first
/// within each section.
pub async fn get_post_history<B: Backend>(
    author_name: &str,
    backend: &B,
) -> Result<PostHistory, AppError> {
    Ok(PostHistory {
        learning: retry_once(|| backend.post_vec_by_author(&Section::Learning, author_name))
            .await?,
        imagining: retry_once(|| backend.post_vec_by_author(&Section::Imagining, author_name))
            .await?,
        organizing: retry_once(|| backend.post_vec_by_author(&Section::Organizing, author_name))
            .await?,
        plugs: retry_once(|| backend.post_vec_by_author(&Section::Plugs, author_name)).await?,
    })
}

#[cfg(test)]
mod tests {
    use crate::post::{Post, PostHistory, PostInputs};

    #[test]
    fn test_post_score() {
        let post = Post {
            upvotes: 7,
            downvotes: 3,
            ..Post::default()
        };
        assert_eq!(post.score(), 4);
    }

    #[test]
    fn test_post_inputs_trimmed() {
        let inputs = PostInputs::new("  Hello ", "\tWorld\n", Some("  "));
        let trimmed = inputs.trimmed();
        assert_eq!(trimmed.title, "Hello");
        assert_eq!(trimmed.description, "World");
        assert_eq!(trimmed.image_url, None);

        let inputs = PostInputs::new("Hello", "World", Some(" https://example.com/a.jpg "));
        assert_eq!(
            inputs.trimmed().image_url.as_deref(),
            Some("https://example.com/a.jpg")
        );
    }

    #[test]
    fn test_post_history_total() {
        let history = PostHistory {
            learning: vec![Post::default(), Post::default()],
            plugs: vec![Post::default()],
            ..PostHistory::default()
        };
        assert_eq!(history.total_posts(), 3);
    }
}
