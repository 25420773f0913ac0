use serde::{Deserialize, Serialize};

use analog_utils::constants::{POPULAR_ORDER_BY_CODE, RECENT_ORDER_BY_CODE};

use crate::post::Post;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum SortType {
    /// Most recent first.
    #[default]
    Recent,
    /// Highest `upvotes - downvotes` first; ties broken by recency, then id,
    /// so the order is fully deterministic.
    Popular,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum VoteKind {
    Up,
    Down,
}

impl SortType {
    pub fn to_order_by_code(self) -> &'static str {
        match self {
            SortType::Recent => RECENT_ORDER_BY_CODE,
            SortType::Popular => POPULAR_ORDER_BY_CODE,
        }
    }
}

impl VoteKind {
    /// Counter column targeted by the atomic increment.
    pub fn column(self) -> &'static str {
        match self {
            VoteKind::Up => "upvotes",
            VoteKind::Down => "downvotes",
        }
    }
}

/// In-memory equivalent of [`SortType::to_order_by_code`].
pub fn sort_post_vec(post_vec: &mut [Post], sort_type: SortType) {
    post_vec.sort_by(|l, r| {
        let by_recency = r
            .create_timestamp
            .cmp(&l.create_timestamp)
            .then(r.post_id.cmp(&l.post_id));
        match sort_type {
            SortType::Recent => by_recency,
            SortType::Popular => r.score().cmp(&l.score()).then(by_recency),
        }
    });
}
