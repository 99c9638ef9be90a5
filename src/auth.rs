// src/auth.rs
use crate::database::{DatabaseConfig, Recruiter, RecruiterRepository};
use anyhow::Result;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::{Request, State};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{error, info, warn};

#[derive(Debug, Serialize, Deserialize)]
pub struct FirebaseUser {
    pub uid: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub email_verified: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub aud: String, // Firebase project ID
    pub iss: String, // Firebase issuer
    pub sub: String, // User ID (uid)
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub email_verified: bool,
    pub exp: usize, // Expiration timestamp
    pub iat: usize, // Issued at timestamp
}

impl From<Claims> for FirebaseUser {
    fn from(claims: Claims) -> Self {
        Self {
            uid: claims.sub,
            email: claims.email,
            name: claims.name,
            picture: claims.picture,
            email_verified: claims.email_verified,
        }
    }
}

pub struct AuthConfig {
    pub project_id: String,
    pub firebase_keys: HashMap<String, String>, // kid -> public key
}

impl AuthConfig {
    pub fn new(project_id: String) -> Self {
        Self {
            project_id,
            firebase_keys: HashMap::new(),
        }
    }

    /// Fetch Firebase public keys for JWT verification
    pub async fn update_firebase_keys(&mut self) -> Result<()> {
        let url = "https://www.googleapis.com/robot/v1/metadata/x509/securetoken@system.gserviceaccount.com";

        let response = reqwest::get(url).await?;
        let keys: HashMap<String, String> = response.json().await?;

        self.firebase_keys = keys;
        info!("Updated Firebase public keys");

        Ok(())
    }
}

/// Authenticated user resolved to a recruiter account.
pub struct AuthenticatedUser {
    pub firebase_user: FirebaseUser,
    pub recruiter: Recruiter,
}

impl AuthenticatedUser {
    pub fn user(&self) -> &FirebaseUser {
        &self.firebase_user
    }

    pub fn recruiter(&self) -> &Recruiter {
        &self.recruiter
    }

    pub fn email(&self) -> &str {
        &self.firebase_user.email
    }

    pub fn recruiter_id(&self) -> i64 {
        self.recruiter.id
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = AuthError;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let auth_config = match req.guard::<&State<AuthConfig>>().await {
            Outcome::Success(config) => config,
            Outcome::Error((status, _)) => {
                return Outcome::Error((status, AuthError::DatabaseError))
            }
            Outcome::Forward(f) => return Outcome::Forward(f),
        };

        let db_config = match req.guard::<&State<DatabaseConfig>>().await {
            Outcome::Success(config) => config,
            Outcome::Error((status, _)) => {
                return Outcome::Error((status, AuthError::DatabaseError))
            }
            Outcome::Forward(f) => return Outcome::Forward(f),
        };

        // Extract Authorization header
        let token = match req.headers().get_one("Authorization") {
            Some(header) if header.starts_with("Bearer ") => &header[7..],
            Some(_) => {
                warn!("Invalid Authorization header format");
                return Outcome::Error((Status::Unauthorized, AuthError::InvalidToken));
            }
            None => {
                warn!("Missing Authorization header");
                return Outcome::Error((Status::Unauthorized, AuthError::MissingToken));
            }
        };

        // Verify the Firebase ID token
        let firebase_user = match verify_firebase_token(token, auth_config).await {
            Ok(user) => user,
            Err(e) => {
                error!("Token verification failed: {}", e);
                return Outcome::Error((Status::Unauthorized, AuthError::TokenVerificationFailed));
            }
        };

        let pool = match db_config.pool() {
            Ok(pool) => pool,
            Err(e) => {
                error!("Database connection failed: {}", e);
                return Outcome::Error((Status::InternalServerError, AuthError::DatabaseError));
            }
        };

        // First login provisions the recruiter account.
        let recruiters = RecruiterRepository::new(pool);
        let recruiter = match recruiters
            .get_or_create(&firebase_user.email, firebase_user.name.as_deref())
            .await
        {
            Ok(recruiter) => recruiter,
            Err(e) => {
                error!(
                    "Failed to get or create recruiter for {}: {}",
                    firebase_user.email, e
                );
                return Outcome::Error((Status::InternalServerError, AuthError::DatabaseError));
            }
        };

        info!(
            "User {} authenticated as recruiter {}",
            firebase_user.email, recruiter.id
        );

        Outcome::Success(AuthenticatedUser {
            firebase_user,
            recruiter,
        })
    }
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    TokenVerificationFailed,
    NotAuthorized,
    DatabaseError,
}

impl AuthError {
    pub fn message(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "Authorization token required",
            AuthError::InvalidToken => "Invalid authorization token format",
            AuthError::TokenVerificationFailed => "Token verification failed",
            AuthError::NotAuthorized => "User not authorized",
            AuthError::DatabaseError => "Database error occurred",
        }
    }
}

async fn verify_firebase_token(token: &str, auth_config: &AuthConfig) -> Result<FirebaseUser> {
    // Decode header to get the key ID
    let header = jsonwebtoken::decode_header(token)?;
    let kid = header
        .kid
        .ok_or_else(|| anyhow::anyhow!("Missing kid in token header"))?;

    // Get the public key for this kid
    let public_key = auth_config
        .firebase_keys
        .get(&kid)
        .ok_or_else(|| anyhow::anyhow!("Unknown key ID: {}", kid))?;

    // Verify the token
    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[&auth_config.project_id]);
    validation.set_issuer(&[format!(
        "https://securetoken.google.com/{}",
        auth_config.project_id
    )]);

    let decoding_key = DecodingKey::from_rsa_pem(public_key.as_bytes())?;
    let token_data = decode::<Claims>(token, &decoding_key, &validation)?;

    Ok(token_data.claims.into())
}

// Optional auth guard that doesn't fail if no auth is provided
pub struct OptionalAuth {
    pub user: Option<AuthenticatedUser>,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for OptionalAuth {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match AuthenticatedUser::from_request(req).await {
            Outcome::Success(auth) => Outcome::Success(OptionalAuth { user: Some(auth) }),
            _ => Outcome::Success(OptionalAuth { user: None }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_map_to_user() {
        let claims = Claims {
            aud: "candi-prod".to_string(),
            iss: "https://securetoken.google.com/candi-prod".to_string(),
            sub: "uid-123".to_string(),
            email: "jane@example.com".to_string(),
            name: Some("Jane".to_string()),
            picture: None,
            email_verified: true,
            exp: 2_000_000_000,
            iat: 1_700_000_000,
        };

        let user: FirebaseUser = claims.into();
        assert_eq!(user.uid, "uid-123");
        assert_eq!(user.email, "jane@example.com");
        assert!(user.email_verified);
    }

    #[test]
    fn test_error_messages_are_stable() {
        assert_eq!(
            AuthError::MissingToken.message(),
            "Authorization token required"
        );
        assert_eq!(
            AuthError::TokenVerificationFailed.message(),
            "Token verification failed"
        );
    }
}
