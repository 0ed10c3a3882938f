//! Registration, login and session resolution.
//!
//! The acting teacher is always an explicit parameter or derived from an
//! explicit token; there is no process-wide "current user".

use crate::api::SessionToken;
use crate::db::repository::{
    FullRepository, RepositoryError, SessionRepository, TeacherRepository,
};
use crate::models::{Session, Teacher};
use crate::services::password::{hash_password, verify_password};

/// Errors surfaced by the authentication operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Invalid registration or login input; reported inline, not retried.
    #[error("{0}")]
    Validation(String),
    /// Unknown email or wrong password. Deliberately indistinguishable.
    #[error("invalid email or password")]
    InvalidCredentials,
    /// Missing, revoked or unknown session token.
    #[error("not authenticated")]
    NotAuthenticated,
    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] RepositoryError),
}

/// Registration form input.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub full_name: String,
}

/// Create a teacher account.
///
/// Email, password and full name are required; the password must be at
/// least 6 characters and match its confirmation; the email must be
/// unused. Emails are normalized to lowercase.
pub async fn register(
    repo: &dyn FullRepository,
    input: RegisterInput,
) -> Result<Teacher, AuthError> {
    let email = input.email.trim().to_lowercase();
    let full_name = input.full_name.trim();
    if email.is_empty() || input.password.is_empty() || full_name.is_empty() {
        return Err(AuthError::Validation(
            "email, password and full name are required".to_string(),
        ));
    }
    if input.password != input.confirm_password {
        return Err(AuthError::Validation("passwords do not match".to_string()));
    }
    if input.password.len() < 6 {
        return Err(AuthError::Validation(
            "password must be at least 6 characters".to_string(),
        ));
    }

    let teacher = Teacher::new(email, full_name, hash_password(&input.password));
    repo.create_teacher(&teacher).await.map_err(|e| match e {
        RepositoryError::ValidationError { message, .. } => AuthError::Validation(message),
        other => AuthError::Store(other),
    })?;
    Ok(teacher)
}

/// Authenticate a teacher and issue a session.
pub async fn login(
    repo: &dyn FullRepository,
    email: &str,
    password: &str,
) -> Result<Session, AuthError> {
    let teacher = repo.find_teacher_by_email(email.trim()).await?;
    let Some(teacher) = teacher else {
        log::debug!("login attempt for unknown email");
        return Err(AuthError::InvalidCredentials);
    };
    if !verify_password(password, &teacher.password_hash) {
        return Err(AuthError::InvalidCredentials);
    }

    let session = Session::new(teacher.id);
    repo.insert_session(&session).await?;
    Ok(session)
}

/// Revoke a session. Revoking an unknown token is a no-op.
pub async fn logout(repo: &dyn FullRepository, token: SessionToken) -> Result<(), AuthError> {
    repo.delete_session(token).await?;
    Ok(())
}

/// Resolve a bearer token to the authenticated teacher.
pub async fn current_teacher(
    repo: &dyn FullRepository,
    token: SessionToken,
) -> Result<Teacher, AuthError> {
    let session = repo
        .find_session(token)
        .await?
        .ok_or(AuthError::NotAuthenticated)?;
    repo.get_teacher(session.teacher_id)
        .await
        .map_err(AuthError::from)
}
