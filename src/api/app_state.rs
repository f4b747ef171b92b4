use crate::config::config::AppConfig;
use crate::error::Result;
use crate::security::config::SecuritySettings;
use crate::security::credentials::CredentialStore;
use crate::security::path_guard::FileSandbox;
use crate::security::rate_limit::RateLimiter;
use crate::security::token::{JwtVerifier, TokenIssuer};
use std::sync::Arc;

/// Application state containing all shared security components
#[derive(Clone)]
pub struct AppState {
    /// Bearer token verifier (algorithm allow-list bound)
    pub verifier: Arc<JwtVerifier>,
    /// Token issuer for login responses
    pub issuer: Arc<TokenIssuer>,
    /// Login rate limiter
    pub login_limiter: Arc<RateLimiter>,
    /// Credential store for password verification
    pub credentials: Arc<CredentialStore>,
    /// Download sandbox
    pub sandbox: Arc<FileSandbox>,
    /// Security settings (cookie policy, work factors)
    pub settings: Arc<SecuritySettings>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("verifier", &self.verifier)
            .field("issuer", &"Arc<TokenIssuer>")
            .field("login_limiter", &self.login_limiter)
            .field("credentials", &"Arc<CredentialStore>")
            .field("sandbox", &self.sandbox)
            .field("settings", &self.settings)
            .finish()
    }
}

impl AppState {
    /// Create new application state from explicit components
    pub fn new(
        verifier: JwtVerifier,
        issuer: TokenIssuer,
        login_limiter: RateLimiter,
        credentials: CredentialStore,
        sandbox: FileSandbox,
        settings: SecuritySettings,
    ) -> Self {
        Self {
            verifier: Arc::new(verifier),
            issuer: Arc::new(issuer),
            login_limiter: Arc::new(login_limiter),
            credentials: Arc::new(credentials),
            sandbox: Arc::new(sandbox),
            settings: Arc::new(settings),
        }
    }

    /// Assemble application state from the loaded configuration.
    ///
    /// The downloads directory is created if absent so the sandbox can
    /// canonicalize its base.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let settings = SecuritySettings::from_config(&config.security);

        std::fs::create_dir_all(&config.security.downloads_dir)?;
        let sandbox = FileSandbox::new(&config.security.downloads_dir)?;

        let verifier = JwtVerifier::new(
            &settings.jwt_secret,
            &[jsonwebtoken::Algorithm::HS256],
        )?;
        let issuer = TokenIssuer::new(&settings.jwt_secret, settings.jwt_expiry_seconds);

        let login_limiter = RateLimiter::from_settings(
            settings.login_max_requests,
            settings.login_window_seconds,
            settings.rate_limit_enabled,
        );

        let credentials = CredentialStore::new(settings.bcrypt_cost);

        Ok(Self::new(
            verifier,
            issuer,
            login_limiter,
            credentials,
            sandbox,
            settings,
        ))
    }
}
