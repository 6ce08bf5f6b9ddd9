mod comment;

pub use comment::CommentMetadata;
