use const_format::formatcp;
use validator::ValidationError;

use crate::constants::{MAX_COMMENT_LENGTH, MAX_COMMUNITY_NAME_LENGTH, MAX_DESCRIPTION_LENGTH, MAX_MANIFESTO_LENGTH, MAX_SLUG_LENGTH, MAX_TITLE_LENGTH};
use crate::errors::AppError;

/// # Returns whether the given string `input` is shorter or equal than the given max length and, if not `is_empty_ok`, that it's not empty
///
/// ```
/// use analog_utils::checks::check_string_length;
/// use analog_utils::errors::AppError;
///
/// assert!(check_string_length("hello", "input", 5, false).is_ok());
/// assert_eq!(check_string_length("hello", "input", 4, false), Err(AppError::validation("input exceeds the maximum length: 4.")));
/// assert_eq!(check_string_length("  ", "input", 4, false), Err(AppError::validation("input cannot be empty.")));
/// assert!(check_string_length("", "input", 4, true).is_ok());
/// ```
pub fn check_string_length(
    input: &str,
    input_name: &str,
    max_length: usize,
    is_empty_ok: bool,
) -> Result<(), AppError> {
    match (input.len() > max_length, !is_empty_ok && input.trim().is_empty()) {
        (true, _) => Err(AppError::validation(format!("{input_name} exceeds the maximum length: {max_length}."))),
        (_, true) => Err(AppError::validation(format!("{input_name} cannot be empty."))),
        (false, false) => Ok(()),
    }
}

/// # Returns whether a post title is valid
///
/// # Valid titles are non-empty after trimming, contain no newlines and have a maximum length of `MAX_TITLE_LENGTH`
///
/// ```
/// use analog_utils::checks::check_post_title;
/// use analog_utils::constants::MAX_TITLE_LENGTH;
///
/// assert!(check_post_title("Best Analog Note-Taking Systems").is_ok());
/// assert!(check_post_title("").is_err());
/// assert!(check_post_title("   ").is_err());
/// assert!(check_post_title("invalid\ntitle").is_err());
/// assert!(check_post_title(&"a".repeat(MAX_TITLE_LENGTH)).is_ok());
/// assert!(check_post_title(&"a".repeat(MAX_TITLE_LENGTH + 1)).is_err());
/// ```
pub fn check_post_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        Err(ValidationError::new("Post title cannot be empty."))
    } else if title.len() > MAX_TITLE_LENGTH {
        Err(ValidationError::new(formatcp!("Post title cannot exceed {MAX_TITLE_LENGTH} characters.")))
    } else if title.contains(&['\r', '\n'][..]) {
        Err(ValidationError::new("Post title cannot contain newlines."))
    } else {
        Ok(())
    }
}

/// # Returns whether a post description is valid
///
/// ```
/// use analog_utils::checks::check_description;
/// use analog_utils::constants::MAX_DESCRIPTION_LENGTH;
///
/// assert!(check_description("What analog note-taking systems have worked best for you?").is_ok());
/// assert!(check_description("").is_err());
/// assert!(check_description(" \t ").is_err());
/// assert!(check_description(&"a".repeat(MAX_DESCRIPTION_LENGTH + 1)).is_err());
/// ```
pub fn check_description(description: &str) -> Result<(), ValidationError> {
    if description.trim().is_empty() {
        Err(ValidationError::new("Description cannot be empty."))
    } else if description.len() > MAX_DESCRIPTION_LENGTH {
        Err(ValidationError::new(formatcp!("Description cannot exceed {MAX_DESCRIPTION_LENGTH} characters.")))
    } else {
        Ok(())
    }
}

/// # Returns whether a comment's content is valid
///
/// ```
/// use analog_utils::checks::check_comment_content;
/// use analog_utils::constants::MAX_COMMENT_LENGTH;
///
/// assert!(check_comment_content("Cornell note-taking changed my life.").is_ok());
/// assert!(check_comment_content("").is_err());
/// assert!(check_comment_content("   ").is_err());
/// assert!(check_comment_content(&"a".repeat(MAX_COMMENT_LENGTH + 1)).is_err());
/// ```
pub fn check_comment_content(content: &str) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        Err(ValidationError::new("Comment cannot be empty."))
    } else if content.len() > MAX_COMMENT_LENGTH {
        Err(ValidationError::new(formatcp!("Comment cannot exceed {MAX_COMMENT_LENGTH} characters.")))
    } else {
        Ok(())
    }
}

/// # Returns whether a manifesto entry's content is valid
///
/// ```
/// use analog_utils::checks::check_manifesto_content;
/// use analog_utils::constants::MAX_MANIFESTO_LENGTH;
///
/// assert!(check_manifesto_content("Slow down and write it by hand.").is_ok());
/// assert!(check_manifesto_content("").is_err());
/// assert!(check_manifesto_content(&"a".repeat(MAX_MANIFESTO_LENGTH + 1)).is_err());
/// ```
pub fn check_manifesto_content(content: &str) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        Err(ValidationError::new("Manifesto entry cannot be empty."))
    } else if content.len() > MAX_MANIFESTO_LENGTH {
        Err(ValidationError::new(formatcp!("Manifesto entry cannot exceed {MAX_MANIFESTO_LENGTH} characters.")))
    } else {
        Ok(())
    }
}

/// # Returns whether a community name is valid
///
/// ```
/// use analog_utils::checks::check_community_name;
/// use analog_utils::constants::MAX_COMMUNITY_NAME_LENGTH;
///
/// assert!(check_community_name("Flip Phone Users").is_ok());
/// assert!(check_community_name("").is_err());
/// assert!(check_community_name(&"a".repeat(MAX_COMMUNITY_NAME_LENGTH + 1)).is_err());
/// ```
pub fn check_community_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        Err(ValidationError::new("Community name cannot be empty."))
    } else if name.len() > MAX_COMMUNITY_NAME_LENGTH {
        Err(ValidationError::new(formatcp!("Community name cannot exceed {MAX_COMMUNITY_NAME_LENGTH} characters.")))
    } else {
        Ok(())
    }
}

/// # Returns whether a community slug is valid
///
/// # Valid slugs contain only lowercase ascii letters, digits and hyphens and have a maximum length of `MAX_SLUG_LENGTH`
///
/// ```
/// use analog_utils::checks::check_slug;
/// use analog_utils::constants::MAX_SLUG_LENGTH;
///
/// assert!(check_slug("flip-phone").is_ok());
/// assert!(check_slug("phone2").is_ok());
/// assert!(check_slug("").is_err());
/// assert!(check_slug("Flip-Phone").is_err());
/// assert!(check_slug("flip phone").is_err());
/// assert!(check_slug("flip_phone").is_err());
/// assert!(check_slug(&"a".repeat(MAX_SLUG_LENGTH)).is_ok());
/// assert!(check_slug(&"a".repeat(MAX_SLUG_LENGTH + 1)).is_err());
/// ```
pub fn check_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.is_empty() {
        Err(ValidationError::new("Slug cannot be empty."))
    } else if !slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
        Err(ValidationError::new("Slug can only contain lowercase letters, digits and hyphens."))
    } else if slug.len() > MAX_SLUG_LENGTH {
        Err(ValidationError::new(formatcp!("Slug cannot exceed {MAX_SLUG_LENGTH} characters.")))
    } else {
        Ok(())
    }
}
