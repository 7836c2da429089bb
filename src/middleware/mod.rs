pub mod error_router;

pub use error_router::{
    ErrorRouter, NavigationState, Navigator, Notifier, Route, TracingNavigator, TracingNotifier,
};
