//! Domain records and request/response models

pub mod post;
pub mod user;

pub use post::{
    CommentView, CreatePostResponse, MessageResponse, Post, PostComment, PostDetails, PostMedia,
    PostRating, PostView, RatingBody, Tag,
};
pub use user::{AuthResponse, LoginRequest, SignupRequest, User, UserPublic};
