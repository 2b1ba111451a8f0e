mod envelope;
pub use self::envelope::{Cursor, Envelope};

mod blog;
pub use self::blog::{
    Author, Blog, BlogPage, BlogStatus, CreateBlogRequest, RawAuthor, RawBlog, TagSuggestion,
    UpdateBlogRequest,
};

mod auth;
pub use self::auth::{
    AckMessage, AuthSession, AuthUser, ForgotPasswordRequest, LoginRequest, RegisterRequest,
    ResetPasswordRequest,
};
