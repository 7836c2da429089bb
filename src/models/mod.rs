pub mod gallery;
pub mod register;
pub mod user_params;

pub use gallery::{gallery_images, GalleryImage, GalleryOptions, MemberDetail};
pub use register::RegisterForm;
pub use user_params::{LikesParams, UserParams};
