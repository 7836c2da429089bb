// ============================================================================
// ACCOUNT SERVICE
// ============================================================================
// Login, registration and the current-user session shown by the nav bar.
// ============================================================================

use shared::{ApiClient, LoginRequest, Result, User};
use tokio::sync::watch;
use tracing::info;

use crate::models::RegisterForm;

const LOGIN_ENDPOINT: &str = "account/login";
const REGISTER_ENDPOINT: &str = "account/register";

pub struct AccountService {
    client: ApiClient,
    current_user: watch::Sender<Option<User>>,
}

impl AccountService {
    pub fn new(client: ApiClient) -> Self {
        let (current_user, _) = watch::channel(None);
        Self {
            client,
            current_user,
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<User> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let user: User = self.client.post(LOGIN_ENDPOINT, &request).await?;
        info!("🔐 Logged in as {}", user.username);
        self.set_current_user(Some(user.clone()));
        Ok(user)
    }

    /// Validates the form locally, then registers and signs in the new user.
    pub async fn register(&self, form: &RegisterForm) -> Result<User> {
        let request = form.to_request()?;

        let user: User = self.client.post(REGISTER_ENDPOINT, &request).await?;
        info!("📝 Registered {}", user.username);
        self.set_current_user(Some(user.clone()));
        Ok(user)
    }

    pub fn logout(&self) {
        if let Some(user) = self.current_user() {
            info!("👋 Logged out {}", user.username);
        }
        self.set_current_user(None);
    }

    /// Snapshot of the signed-in user.
    pub fn current_user(&self) -> Option<User> {
        self.current_user.borrow().clone()
    }

    /// Stream of current-user changes, starting with the present value.
    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.current_user.subscribe()
    }

    fn set_current_user(&self, user: Option<User>) {
        self.client
            .set_token(user.as_ref().map(|u| u.token.clone()));
        self.current_user.send_replace(user);
    }
}
