use serde::{Deserialize, Serialize};
use validator::Validate;

use analog_utils::checks::check_comment_content;
use analog_utils::errors::AppError;

use crate::backend::{retry_once, Backend, ContentBackend};
use crate::section::Section;
use crate::user::Actor;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub comment_id: i64,
    pub post_id: i64,
    pub content: String,
    pub author_id: String,
    pub author_name: String,
    pub create_timestamp: chrono::DateTime<chrono::Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Validate, Serialize, Deserialize)]
pub struct CommentInputs {
    #[validate(custom(function = "check_comment_content"))]
    pub content: String,
}

impl CommentInputs {
    pub fn new(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }

    pub fn trimmed(&self) -> Self {
        Self {
            content: self.content.trim().to_string(),
        }
    }
}

/// Attaches a comment to an existing post. Commenting on a post that was
/// deleted in the meantime yields [`AppError::NotFound`].
pub async fn create_comment<B: Backend>(
    section: &Section,
    post_id: i64,
    inputs: CommentInputs,
    actor: &Actor,
    backend: &B,
) -> Result<Comment, AppError> {
    let inputs = inputs.trimmed();
    inputs.validate()?;

    let comment =
        retry_once(|| backend.insert_comment(section, post_id, &inputs.content, actor)).await?;
    log::trace!(
        "Created comment {} on post {post_id} in section {section}",
        comment.comment_id
    );
    Ok(comment)
}

/// Comments of a post, oldest first.
pub async fn get_comment_vec<B: Backend>(
    section: &Section,
    post_id: i64,
    backend: &B,
) -> Result<Vec<Comment>, AppError> {
    retry_once(|| backend.comment_vec(section, post_id)).await
}

#[cfg(test)]
mod tests {
    use crate::comment::CommentInputs;

    #[test]
    fn test_comment_inputs_trimmed() {
        let inputs = CommentInputs::new("  keep it analog  ");
        assert_eq!(inputs.trimmed().content, "keep it analog");
    }
}
