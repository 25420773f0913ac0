#![allow(dead_code)]

use analog_core::community::{self, Community, CommunityInputs};
use analog_core::memory::MemoryBackend;
use analog_core::post::{self, Post, PostInputs};
use analog_core::section::Section;
use analog_core::user::Actor;

pub async fn create_test_post(
    section: &Section,
    title: &str,
    actor: &Actor,
    backend: &MemoryBackend,
) -> Post {
    post::create_post(
        section,
        PostInputs::new(title, "body", None),
        actor,
        backend,
    )
    .await
    .expect("Should be able to create post.")
}

pub async fn create_post_with_votes(
    section: &Section,
    title: &str,
    upvotes: usize,
    downvotes: usize,
    actor: &Actor,
    backend: &MemoryBackend,
) -> Post {
    let post = create_test_post(section, title, actor, backend).await;
    for _ in 0..upvotes {
        post::upvote_post(section, post.post_id, backend)
            .await
            .expect("Should be able to upvote post.");
    }
    for _ in 0..downvotes {
        post::downvote_post(section, post.post_id, backend)
            .await
            .expect("Should be able to downvote post.");
    }
    post::get_post_by_id(section, post.post_id, backend)
        .await
        .expect("Should be able to reload post.")
}

pub async fn create_test_community(
    slug: &str,
    created_by: &Actor,
    backend: &MemoryBackend,
) -> Community {
    community::create_community(
        CommunityInputs::new(&format!("Community {slug}"), slug, "description"),
        created_by,
        backend,
    )
    .await
    .expect("Should be able to create community.")
}
