// ============================================================================
// CLIENT SERVICES
// ============================================================================
pub mod account_service;
pub mod members_service;

pub use account_service::AccountService;
pub use members_service::MembersService;
