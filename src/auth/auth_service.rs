use std::sync::Arc;

use crate::auth::{verify_password, TokenService};
use crate::error::{AppError, Result};
use crate::user::{user_dto::UserRequest, user_models::DEFAULT_ROLE, User, UserService};

use super::auth_dto::{AuthResponse, RegisterRequest};

const INVALID_CREDENTIALS: &str = "Invalid email or password.";

#[derive(Clone)]
pub struct AuthService {
    user_service: UserService,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(user_service: UserService, tokens: Arc<TokenService>) -> Self {
        Self {
            user_service,
            tokens,
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse> {
        tracing::info!("Registering user with email: {}", request.email);
        if let Some(role) = request.role.as_deref().filter(|r| *r != DEFAULT_ROLE) {
            tracing::warn!("Ignoring requested role {} on self-registration", role);
        }

        let user = self
            .user_service
            .create_user(UserRequest {
                username: request.username,
                first_name: Some(request.first_name),
                last_name: Some(request.last_name),
                email: request.email,
                password: Some(request.password),
                role: None,
                location: request.location,
                phone_number: request.phone_number,
            })
            .await?;

        self.respond_with_token(&user)
    }

    /// Unknown email and wrong password produce the same error.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let user = match self.user_service.find_by_email(email).await? {
            Some(user) => user,
            None => {
                tracing::warn!("Login failed: no user with email {}", email);
                return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
            }
        };

        if !verify_password(password, &user.password) {
            tracing::warn!("Login failed: wrong password for {}", email);
            return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        tracing::info!("Login successful for {}", email);
        self.respond_with_token(&user)
    }

    /// The reset email itself is delivered by the identity provider; this only
    /// records the request and never reveals whether the address exists.
    pub async fn request_password_reset(&self, email: &str) -> Result<()> {
        match self.user_service.find_by_email(email).await {
            Ok(Some(user)) => tracing::info!("Password reset requested for user {}", user.user_id),
            Ok(None) => tracing::info!("Password reset requested for unknown email {}", email),
            Err(e) => tracing::warn!("Password reset lookup failed for {}: {}", email, e),
        }
        Ok(())
    }

    fn respond_with_token(&self, user: &User) -> Result<AuthResponse> {
        let token = self
            .tokens
            .issue(&user.user_id, &user.role, &user.email, &user.display_name())
            .map_err(|e| {
                tracing::error!("Token issuance failed: {}", e);
                AppError::InternalError
            })?;

        Ok(AuthResponse {
            token,
            user_id: user.user_id.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, Repository};
    use chrono::Duration;

    fn service() -> (AuthService, Arc<TokenService>) {
        let tokens = Arc::new(TokenService::new(&[1u8; 64], Duration::hours(1)));
        let users = UserService::new(Repository::new(Arc::new(MemoryStore::new())));
        (AuthService::new(users, tokens.clone()), tokens)
    }

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            email: "ada@x.io".into(),
            password: "secret123".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            username: "ada".into(),
            role: None,
            location: Some("Cebu".into()),
            phone_number: None,
        }
    }

    #[tokio::test]
    async fn test_register_issues_token_for_new_user() {
        let (auth, tokens) = service();
        let response = auth.register(register_request()).await.unwrap();

        let claims = tokens.validate(&response.token).unwrap();
        assert_eq!(claims.sub, response.user_id);
        assert_eq!(claims.role, "USER");
        assert_eq!(claims.name, "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (auth, _) = service();
        auth.register(register_request()).await.unwrap();

        let wrong_password = auth.login("ada@x.io", "nope").await.unwrap_err();
        let unknown_email = auth.login("who@x.io", "secret123").await.unwrap_err();
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());

        assert!(auth.login("ada@x.io", "secret123").await.is_ok());
    }

    #[tokio::test]
    async fn test_register_ignores_requested_role() {
        let (auth, tokens) = service();
        let mut request = register_request();
        request.role = Some("ADMIN".into());

        let response = auth.register(request).await.unwrap();
        assert_eq!(response.role, DEFAULT_ROLE);
        assert_eq!(tokens.validate(&response.token).unwrap().role, DEFAULT_ROLE);
    }
}
