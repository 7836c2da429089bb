//! Client-side member browsing for the dating API
//!
//! Member listing with a page cache, member lookup and photo gallery, likes,
//! account session handling and routing of failed requests.

pub mod cache;
pub mod cache_key;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;

pub use cache::{CacheStats, MemberCache, MemberPage};
pub use cache_key::CacheKey;
pub use filters::{build_params, FilterSet, FilterValue, QueryParams};
pub use middleware::{ErrorRouter, NavigationState, Navigator, Notifier, Route};
pub use models::{LikesParams, MemberDetail, RegisterForm, UserParams};
pub use services::{AccountService, MembersService};
pub use state::AppState;
