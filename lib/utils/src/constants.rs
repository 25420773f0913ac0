pub const MAX_TITLE_LENGTH: usize = 250;
pub const MAX_DESCRIPTION_LENGTH: usize = 20000;
pub const MAX_COMMENT_LENGTH: usize = 5000;
pub const MAX_MANIFESTO_LENGTH: usize = 5000;

pub const MAX_COMMUNITY_NAME_LENGTH: usize = 100;
pub const MAX_SLUG_LENGTH: usize = 50;
pub const MAX_IMAGE_URL_LENGTH: u64 = 2000;

pub const RECENT_ORDER_BY_CODE: &str = "p.create_timestamp DESC, p.post_id DESC";
pub const POPULAR_ORDER_BY_CODE: &str =
    "(p.upvotes - p.downvotes) DESC, p.create_timestamp DESC, p.post_id DESC";
