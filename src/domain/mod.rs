pub mod posts;
pub mod slug;
pub mod validate;
