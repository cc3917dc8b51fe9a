pub mod block;
pub mod bookmark;
pub mod friend;
pub mod like;
pub mod post;
pub mod tag;
pub mod tracker;
pub mod user;
