use std::sync::Arc;

use analog_core::memory::MemoryBackend;
use analog_core::post::{self, PostInputs};
use analog_core::ranking::SortType;
use analog_core::section::Section;
use analog_utils::errors::AppError;

pub use crate::common::*;
pub use crate::data_factory::*;

mod common;
mod data_factory;

#[tokio::test]
async fn test_create_and_get_post() -> Result<(), AppError> {
    let backend = get_backend();
    let actor = test_actor();

    let inputs = PostInputs::new(
        "  My first week offline  ",
        "It was quieter than expected.",
        Some("https://example.com/week.jpg"),
    );
    let post = post::create_post(&Section::Learning, inputs, &actor, &backend).await?;

    assert_eq!(post.title, "My first week offline");
    assert_eq!(post.description, "It was quieter than expected.");
    assert_eq!(post.author_id, actor.user_id);
    assert_eq!(post.author_name, actor.pseudonym);
    assert_eq!(post.image_url.as_deref(), Some("https://example.com/week.jpg"));
    assert_eq!(post.upvotes, 0);
    assert_eq!(post.downvotes, 0);
    assert_eq!(post.community_id, None);

    let loaded = post::get_post_by_id(&Section::Learning, post.post_id, &backend).await?;
    assert_eq!(loaded, post);

    // The same id does not resolve through a different section.
    let missing = post::get_post_by_id(&Section::Imagining, post.post_id, &backend).await;
    assert_eq!(missing, Err(AppError::NotFound));

    Ok(())
}

#[tokio::test]
async fn test_empty_section_yields_empty_vec() -> Result<(), AppError> {
    let backend = get_backend();
    let post_vec = post::get_post_vec(&Section::Plugs, SortType::Recent, &backend).await?;
    assert!(post_vec.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_post_validation() {
    let backend = get_backend();
    let actor = test_actor();

    let blank_title = PostInputs::new("   ", "body", None);
    let result = post::create_post(&Section::Learning, blank_title, &actor, &backend).await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));

    let long_title = PostInputs::new(&"t".repeat(251), "body", None);
    let result = post::create_post(&Section::Learning, long_title, &actor, &backend).await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));

    let blank_body = PostInputs::new("title", "\n\t ", None);
    let result = post::create_post(&Section::Learning, blank_body, &actor, &backend).await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn test_recent_sorting() -> Result<(), AppError> {
    let backend = get_backend();
    let actor = test_actor();

    let first = create_test_post(&Section::Organizing, "first", &actor, &backend).await;
    let second = create_test_post(&Section::Organizing, "second", &actor, &backend).await;
    let third = create_test_post(&Section::Organizing, "third", &actor, &backend).await;

    let post_vec = post::get_post_vec(&Section::Organizing, SortType::Recent, &backend).await?;
    let id_vec: Vec<i64> = post_vec.iter().map(|post| post.post_id).collect();
    assert_eq!(id_vec, vec![third.post_id, second.post_id, first.post_id]);
    Ok(())
}

#[tokio::test]
async fn test_popular_sorting_breaks_ties_deterministically() -> Result<(), AppError> {
    let backend = get_backend();
    let actor = test_actor();
    let section = Section::Learning;

    let low = create_post_with_votes(&section, "low", 1, 0, &actor, &backend).await;
    let tied_old = create_post_with_votes(&section, "tied old", 5, 2, &actor, &backend).await;
    let tied_new = create_post_with_votes(&section, "tied new", 3, 0, &actor, &backend).await;
    let high = create_post_with_votes(&section, "high", 9, 1, &actor, &backend).await;

    for _ in 0..3 {
        let post_vec = post::get_post_vec(&section, SortType::Popular, &backend).await?;
        let id_vec: Vec<i64> = post_vec.iter().map(|post| post.post_id).collect();
        assert_eq!(
            id_vec,
            vec![high.post_id, tied_new.post_id, tied_old.post_id, low.post_id]
        );
    }
    Ok(())
}

#[tokio::test]
async fn test_concurrent_votes_are_not_lost() -> Result<(), AppError> {
    let backend = Arc::new(MemoryBackend::new());
    let actor = test_actor();
    let section = Section::Plugs;
    let post = create_test_post(&section, "voting target", &actor, backend.as_ref()).await;

    let mut handles = Vec::new();
    for i in 0..60 {
        let backend = Arc::clone(&backend);
        handles.push(tokio::spawn(async move {
            if i % 3 == 0 {
                post::downvote_post(&section, post.post_id, backend.as_ref()).await
            } else {
                post::upvote_post(&section, post.post_id, backend.as_ref()).await
            }
        }));
    }
    for handle in handles {
        handle.await.expect("Vote task should not panic")?;
    }

    let loaded = post::get_post_by_id(&section, post.post_id, backend.as_ref()).await?;
    assert_eq!(loaded.upvotes, 40);
    assert_eq!(loaded.downvotes, 20);
    Ok(())
}

#[tokio::test]
async fn test_vote_on_missing_post() {
    let backend = get_backend();
    let result = post::upvote_post(&Section::Learning, 999, &backend).await;
    assert_eq!(result, Err(AppError::NotFound));
}

#[tokio::test]
async fn test_post_history_spans_sections() -> Result<(), AppError> {
    let backend = get_backend();
    let actor = test_actor();
    let other = other_actor();

    create_test_post(&Section::Learning, "learning 1", &actor, &backend).await;
    create_test_post(&Section::Learning, "learning 2", &actor, &backend).await;
    create_test_post(&Section::Plugs, "plug", &actor, &backend).await;
    create_test_post(&Section::Imagining, "someone else", &other, &backend).await;

    let history = post::get_post_history(&actor.pseudonym, &backend).await?;
    assert_eq!(history.learning.len(), 2);
    assert_eq!(history.imagining.len(), 0);
    assert_eq!(history.organizing.len(), 0);
    assert_eq!(history.plugs.len(), 1);
    assert_eq!(history.total_posts(), 3);

    // Most recent first within a section.
    assert_eq!(history.learning[0].title, "learning 2");
    Ok(())
}

#[tokio::test]
async fn test_community_posting_requires_membership() -> Result<(), AppError> {
    let backend = get_backend();
    let owner = test_actor();
    let outsider = other_actor();

    let community = create_test_community("walkers", &owner, &backend).await;
    let section = Section::Community(community.community_id);

    let result = post::create_post(
        &section,
        PostInputs::new("hello", "body", None),
        &outsider,
        &backend,
    )
    .await;
    assert_eq!(result, Err(AppError::NotAMember));

    // The creator was enrolled at creation time and can post right away.
    let post = post::create_post(
        &section,
        PostInputs::new("hello", "body", None),
        &owner,
        &backend,
    )
    .await?;
    assert_eq!(post.community_id, Some(community.community_id));

    // Community posts stay scoped to their community.
    let post_vec = post::get_post_vec(&Section::Learning, SortType::Recent, &backend).await?;
    assert!(post_vec.is_empty());

    Ok(())
}
