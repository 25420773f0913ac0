pub mod backend;
pub mod comment;
pub mod community;
pub mod manifesto;
pub mod memory;
pub mod moderation;
pub mod post;
pub mod postgres;
pub mod ranking;
pub mod section;
pub mod user;
