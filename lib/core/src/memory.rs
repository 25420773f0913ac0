use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use analog_utils::errors::AppError;

use crate::backend::{CommunityBackend, ContentBackend, ManifestoBackend, ModerationBackend};
use crate::comment::Comment;
use crate::community::{Community, CommunityInputs};
use crate::manifesto::ManifestoEntry;
use crate::moderation::{Moderator, Notification};
use crate::post::{Post, PostInputs};
use crate::ranking::{sort_post_vec, SortType, VoteKind};
use crate::section::Section;
use crate::user::Actor;

#[derive(Clone, Debug)]
struct StoredPost {
    section: Section,
    post: Post,
}

#[derive(Debug, Default)]
struct MemoryState {
    posts: HashMap<i64, StoredPost>,
    comments: HashMap<i64, Vec<Comment>>,
    communities: HashMap<i64, Community>,
    memberships: HashMap<i64, HashSet<String>>,
    manifesto: Vec<ManifestoEntry>,
    moderators: HashMap<String, Moderator>,
    notifications: Vec<Notification>,
}

/// Map-based backend with the same observable behavior as the Postgres
/// backend. Counter updates happen under the state lock, so concurrent
/// votes and joins never lose increments.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: RwLock<MemoryState>,
    next_id: AtomicI64,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }
}

fn in_section(stored: &StoredPost, section: &Section) -> bool {
    stored.section == *section
}

#[async_trait]
impl ContentBackend for MemoryBackend {
    async fn insert_post(
        &self,
        section: &Section,
        inputs: &PostInputs,
        actor: &Actor,
    ) -> Result<Post, AppError> {
        let post_id = self.next_id();
        let post = Post {
            post_id,
            title: inputs.title.clone(),
            description: inputs.description.clone(),
            author_id: actor.user_id.clone(),
            author_name: actor.pseudonym.clone(),
            image_url: inputs.image_url.clone(),
            upvotes: 0,
            downvotes: 0,
            community_id: section.community_id(),
            create_timestamp: chrono::Utc::now(),
        };
        let mut state = self.state.write().await;
        state.posts.insert(
            post_id,
            StoredPost {
                section: *section,
                post: post.clone(),
            },
        );
        state.comments.insert(post_id, Vec::new());
        Ok(post)
    }

    async fn post_by_id(&self, section: &Section, post_id: i64) -> Result<Post, AppError> {
        let state = self.state.read().await;
        state
            .posts
            .get(&post_id)
            .filter(|stored| in_section(stored, section))
            .map(|stored| stored.post.clone())
            .ok_or(AppError::NotFound)
    }

    async fn post_vec(
        &self,
        section: &Section,
        sort_type: SortType,
    ) -> Result<Vec<Post>, AppError> {
        let state = self.state.read().await;
        let mut post_vec: Vec<Post> = state
            .posts
            .values()
            .filter(|stored| in_section(stored, section))
            .map(|stored| stored.post.clone())
            .collect();
        sort_post_vec(&mut post_vec, sort_type);
        Ok(post_vec)
    }

    async fn post_vec_by_author(
        &self,
        section: &Section,
        author_name: &str,
    ) -> Result<Vec<Post>, AppError> {
        let state = self.state.read().await;
        let mut post_vec: Vec<Post> = state
            .posts
            .values()
            .filter(|stored| in_section(stored, section) && stored.post.author_name == author_name)
            .map(|stored| stored.post.clone())
            .collect();
        sort_post_vec(&mut post_vec, SortType::Recent);
        Ok(post_vec)
    }

    async fn increment_vote(
        &self,
        section: &Section,
        post_id: i64,
        vote: VoteKind,
    ) -> Result<Post, AppError> {
        let mut state = self.state.write().await;
        let stored = state
            .posts
            .get_mut(&post_id)
            .filter(|stored| stored.section == *section)
            .ok_or(AppError::NotFound)?;
        match vote {
            VoteKind::Up => stored.post.upvotes += 1,
            VoteKind::Down => stored.post.downvotes += 1,
        }
        Ok(stored.post.clone())
    }

    async fn insert_comment(
        &self,
        section: &Section,
        post_id: i64,
        content: &str,
        actor: &Actor,
    ) -> Result<Comment, AppError> {
        let comment_id = self.next_id();
        let mut state = self.state.write().await;
        if !state
            .posts
            .get(&post_id)
            .is_some_and(|stored| in_section(stored, section))
        {
            return Err(AppError::NotFound);
        }
        let comment = Comment {
            comment_id,
            post_id,
            content: content.to_string(),
            author_id: actor.user_id.clone(),
            author_name: actor.pseudonym.clone(),
            create_timestamp: chrono::Utc::now(),
        };
        state
            .comments
            .entry(post_id)
            .or_default()
            .push(comment.clone());
        Ok(comment)
    }

    async fn comment_vec(&self, section: &Section, post_id: i64) -> Result<Vec<Comment>, AppError> {
        let state = self.state.read().await;
        if !state
            .posts
            .get(&post_id)
            .is_some_and(|stored| in_section(stored, section))
        {
            return Err(AppError::NotFound);
        }
        Ok(state.comments.get(&post_id).cloned().unwrap_or_default())
    }

    async fn delete_post(&self, section: &Section, post_id: i64) -> Result<Post, AppError> {
        let mut state = self.state.write().await;
        if !state
            .posts
            .get(&post_id)
            .is_some_and(|stored| in_section(stored, section))
        {
            return Err(AppError::NotFound);
        }
        let stored = state.posts.remove(&post_id).ok_or(AppError::NotFound)?;
        state.comments.remove(&post_id);
        Ok(stored.post)
    }
}

#[async_trait]
impl CommunityBackend for MemoryBackend {
    async fn insert_community(
        &self,
        inputs: &CommunityInputs,
        created_by: Option<&Actor>,
    ) -> Result<Community, AppError> {
        let community_id = self.next_id();
        let mut state = self.state.write().await;
        if state
            .communities
            .values()
            .any(|community| community.slug == inputs.slug)
        {
            return Err(AppError::validation("A community with this slug already exists"));
        }
        let mut members = HashSet::new();
        if let Some(actor) = created_by {
            members.insert(actor.user_id.clone());
        }
        let community = Community {
            community_id,
            name: inputs.name.clone(),
            slug: inputs.slug.clone(),
            description: inputs.description.clone(),
            member_count: members.len() as i32,
            created_by: created_by.map(|actor| actor.user_id.clone()),
            create_timestamp: chrono::Utc::now(),
        };
        state.communities.insert(community_id, community.clone());
        state.memberships.insert(community_id, members);
        Ok(community)
    }

    async fn community_vec(&self) -> Result<Vec<Community>, AppError> {
        let state = self.state.read().await;
        let mut community_vec: Vec<Community> = state.communities.values().cloned().collect();
        community_vec.sort_by(|l, r| l.name.cmp(&r.name));
        Ok(community_vec)
    }

    async fn community_by_id(&self, community_id: i64) -> Result<Community, AppError> {
        let state = self.state.read().await;
        state
            .communities
            .get(&community_id)
            .cloned()
            .ok_or(AppError::NotFound)
    }

    async fn community_by_slug(&self, slug: &str) -> Result<Community, AppError> {
        let state = self.state.read().await;
        state
            .communities
            .values()
            .find(|community| community.slug == slug)
            .cloned()
            .ok_or(AppError::NotFound)
    }

    async fn is_member(&self, community_id: i64, user_id: &str) -> Result<bool, AppError> {
        let state = self.state.read().await;
        Ok(state
            .memberships
            .get(&community_id)
            .is_some_and(|members| members.contains(user_id)))
    }

    async fn insert_membership(&self, community_id: i64, user_id: &str) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        if !state.communities.contains_key(&community_id) {
            return Err(AppError::NotFound);
        }
        let inserted = state
            .memberships
            .entry(community_id)
            .or_default()
            .insert(user_id.to_string());
        if inserted {
            if let Some(community) = state.communities.get_mut(&community_id) {
                community.member_count += 1;
            }
        }
        Ok(inserted)
    }

    async fn delete_membership(&self, community_id: i64, user_id: &str) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        let removed = state
            .memberships
            .get_mut(&community_id)
            .is_some_and(|members| members.remove(user_id));
        if removed {
            if let Some(community) = state.communities.get_mut(&community_id) {
                community.member_count = (community.member_count - 1).max(0);
            }
        }
        Ok(removed)
    }
}

#[async_trait]
impl ManifestoBackend for MemoryBackend {
    async fn insert_manifesto_entry(&self, content: &str) -> Result<ManifestoEntry, AppError> {
        let entry = ManifestoEntry {
            entry_id: self.next_id(),
            content: content.to_string(),
            create_timestamp: chrono::Utc::now(),
        };
        let mut state = self.state.write().await;
        state.manifesto.push(entry.clone());
        Ok(entry)
    }

    async fn manifesto_entry_vec(&self) -> Result<Vec<ManifestoEntry>, AppError> {
        let state = self.state.read().await;
        let mut entry_vec = state.manifesto.clone();
        entry_vec.sort_by(|l, r| {
            r.create_timestamp
                .cmp(&l.create_timestamp)
                .then(r.entry_id.cmp(&l.entry_id))
        });
        Ok(entry_vec)
    }
}

#[async_trait]
impl ModerationBackend for MemoryBackend {
    async fn is_moderator(&self, user_id: &str) -> Result<bool, AppError> {
        let state = self.state.read().await;
        Ok(state.moderators.contains_key(user_id))
    }

    async fn insert_moderator(&self, user_id: &str, email: &str) -> Result<Moderator, AppError> {
        let moderator = Moderator {
            user_id: user_id.to_string(),
            email: email.to_string(),
        };
        let mut state = self.state.write().await;
        state
            .moderators
            .insert(user_id.to_string(), moderator.clone());
        Ok(moderator)
    }

    async fn insert_notification(
        &self,
        user_id: &str,
        post_title: &str,
        section_key: &str,
        moderator_name: &str,
    ) -> Result<Notification, AppError> {
        let notification = Notification {
            notification_id: self.next_id(),
            user_id: user_id.to_string(),
            post_title: post_title.to_string(),
            section_key: section_key.to_string(),
            moderator_name: moderator_name.to_string(),
            is_read: false,
            create_timestamp: chrono::Utc::now(),
        };
        let mut state = self.state.write().await;
        state.notifications.push(notification.clone());
        Ok(notification)
    }

    async fn notification_vec(&self, user_id: &str) -> Result<Vec<Notification>, AppError> {
        let state = self.state.read().await;
        let mut notification_vec: Vec<Notification> = state
            .notifications
            .iter()
            .filter(|notification| notification.user_id == user_id)
            .cloned()
            .collect();
        notification_vec.sort_by(|l, r| {
            r.create_timestamp
                .cmp(&l.create_timestamp)
                .then(r.notification_id.cmp(&l.notification_id))
        });
        Ok(notification_vec)
    }
}
