//! Routes failed API requests to notifications or navigation
//!
//! Every failed request passes through [`ErrorRouter`] before its error reaches
//! the caller:
//! - 400/401: field errors are flattened into [`ApiError::Validation`]; a text
//!   body is shown as a notification; anything else shows the status text.
//! - 404: navigate to the not-found view.
//! - 500: navigate to the server-error view carrying the failure body.
//! - anything else, transport failures included: generic notification plus a
//!   warning log.
//!
//! The error is always returned afterwards, so callers still see the failure.

use serde::Serialize;
use shared::service_client::status_text;
use shared::{ApiError, FailureBody, FailureHandler, RequestFailure};
use std::sync::Arc;
use tracing::{info, warn};

pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong";

/// Toast-style notifications shown to the user
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str, title: Option<&str>);
}

/// Client-side view navigation
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// State handed to the server-error view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigationState {
    pub error: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    NotFound,
    ServerError(NavigationState),
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::NotFound => "/not-found",
            Route::ServerError(_) => "/server-error",
        }
    }

    pub fn state(&self) -> Option<&NavigationState> {
        match self {
            Route::ServerError(state) => Some(state),
            Route::NotFound => None,
        }
    }
}

/// [`FailureHandler`] dispatching to a [`Notifier`] and a [`Navigator`]
#[derive(Clone)]
pub struct ErrorRouter {
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

impl ErrorRouter {
    pub fn new(notifier: Arc<dyn Notifier>, navigator: Arc<dyn Navigator>) -> Self {
        Self { notifier, navigator }
    }

    fn handle_rejection(&self, failure: &RequestFailure) {
        let RequestFailure::Status { status, body, .. } = failure else {
            return;
        };

        match body {
            // Surfaced to the caller as ApiError::Validation.
            FailureBody::FieldErrors(_) => {}
            FailureBody::Text(text) => self.notifier.error(text, None),
            _ => {
                let title = status.as_u16().to_string();
                self.notifier.error(status_text(*status), Some(&title));
            }
        }
    }
}

impl FailureHandler for ErrorRouter {
    fn handle(&self, failure: RequestFailure) -> ApiError {
        match failure.status().map(|s| s.as_u16()) {
            Some(400) | Some(401) => self.handle_rejection(&failure),
            Some(404) => self.navigator.navigate(Route::NotFound),
            Some(500) => {
                let error = match &failure {
                    RequestFailure::Status { body, .. } => body.to_value(),
                    RequestFailure::Transport { .. } => serde_json::Value::Null,
                };
                self.navigator
                    .navigate(Route::ServerError(NavigationState { error }));
            }
            _ => {
                self.notifier.error(GENERIC_FAILURE_MESSAGE, None);
                warn!(url = %failure.url(), "Request failed: {:?}", failure);
            }
        }

        failure.into_error()
    }
}

/// Writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str, title: Option<&str>) {
        match title {
            Some(title) => warn!("🔔 [{}] {}", title, message),
            None => warn!("🔔 {}", message),
        }
    }
}

/// Writes navigation requests to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn navigate(&self, route: Route) {
        match route.state() {
            Some(state) => info!("➡️ Navigating to {} with state {}", route.path(), state.error),
            None => info!("➡️ Navigating to {}", route.path()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use reqwest::{Method, StatusCode};

    #[derive(Default)]
    struct Recorder {
        notifications: Mutex<Vec<(String, Option<String>)>>,
        routes: Mutex<Vec<Route>>,
    }

    impl Notifier for Recorder {
        fn error(&self, message: &str, title: Option<&str>) {
            self.notifications
                .lock()
                .push((message.to_string(), title.map(str::to_string)));
        }
    }

    impl Navigator for Recorder {
        fn navigate(&self, route: Route) {
            self.routes.lock().push(route);
        }
    }

    fn router() -> (ErrorRouter, Arc<Recorder>) {
        let recorder = Arc::new(Recorder::default());
        (ErrorRouter::new(recorder.clone(), recorder.clone()), recorder)
    }

    fn failure(code: u16, raw: &str) -> RequestFailure {
        RequestFailure::Status {
            method: Method::POST,
            url: "http://localhost/api/account/register".to_string(),
            status: StatusCode::from_u16(code).unwrap(),
            body: FailureBody::parse(raw),
        }
    }

    #[test]
    fn test_field_errors_become_flat_validation_error() {
        let (router, recorder) = router();
        let err = router.handle(failure(400, r#"{"errors":{"password":["too short"]}}"#));

        match err {
            ApiError::Validation { errors } => assert_eq!(errors, vec!["too short".to_string()]),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(recorder.notifications.lock().is_empty());
        assert!(recorder.routes.lock().is_empty());
    }

    #[test]
    fn test_text_body_is_notified_and_still_returned() {
        let (router, recorder) = router();
        let err = router.handle(failure(401, "\"Invalid password\""));

        assert!(matches!(err, ApiError::Rejected { status: 401, .. }));
        assert_eq!(
            *recorder.notifications.lock(),
            vec![("Invalid password".to_string(), None)]
        );
    }

    #[test]
    fn test_unstructured_rejection_uses_status_text() {
        let (router, recorder) = router();
        router.handle(failure(400, r#"{"title":"bad"}"#));
        router.handle(failure(401, ""));

        assert_eq!(
            *recorder.notifications.lock(),
            vec![
                ("Bad Request".to_string(), Some("400".to_string())),
                ("Unauthorized".to_string(), Some("401".to_string())),
            ]
        );
    }

    #[test]
    fn test_not_found_navigates_without_notification() {
        let (router, recorder) = router();
        let err = router.handle(failure(404, ""));

        assert!(matches!(err, ApiError::NotFound { .. }));
        assert_eq!(*recorder.routes.lock(), vec![Route::NotFound]);
        assert!(recorder.notifications.lock().is_empty());
    }

    #[test]
    fn test_server_error_carries_body_as_state() {
        let (router, recorder) = router();
        let err = router.handle(failure(500, r#"{"detail":"boom"}"#));

        assert!(matches!(err, ApiError::Server { .. }));
        let routes = recorder.routes.lock();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path(), "/server-error");
        assert_eq!(
            serde_json::to_value(routes[0].state().unwrap()).unwrap(),
            serde_json::json!({"error": {"detail": "boom"}})
        );
    }

    #[test]
    fn test_other_statuses_get_generic_notification() {
        let (router, recorder) = router();
        let err = router.handle(failure(503, ""));

        assert!(matches!(err, ApiError::Http { status: 503, .. }));
        assert_eq!(
            *recorder.notifications.lock(),
            vec![(GENERIC_FAILURE_MESSAGE.to_string(), None)]
        );
        assert!(recorder.routes.lock().is_empty());
    }
}
