//! Acting-identity extraction for Axum
//!
//! Authentication and authorization run in an upstream gateway, which
//! forwards the authenticated caller as `x-acting-user` (a UUID) and
//! `x-acting-role`. Handlers that need the caller pull an [`Actor`] out of
//! the request; routers that should only be reachable by registrar-level
//! callers wrap themselves in [`require_registrar`].

use axum::{
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};

use campanile_core::AppError;
use campanile_models::ids::UserId;
use campanile_models::status::UserRole;

pub const ACTING_USER_HEADER: &str = "x-acting-user";
pub const ACTING_ROLE_HEADER: &str = "x-acting-role";

/// The caller the gateway authenticated, as forwarded in request headers.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: UserId,
    pub role: UserRole,
}

impl Actor {
    pub fn is_registrar_level(&self) -> bool {
        matches!(self.role, UserRole::Administrator | UserRole::Registrar)
    }
}

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_header = parts
            .headers
            .get(ACTING_USER_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::unauthorized(anyhow::anyhow!("Missing {ACTING_USER_HEADER} header"))
            })?;

        let user_id: UserId = user_header.parse().map_err(|_| {
            AppError::unauthorized(anyhow::anyhow!(
                "Invalid {ACTING_USER_HEADER} header: expected a UUID"
            ))
        })?;

        let role_header = parts
            .headers
            .get(ACTING_ROLE_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::unauthorized(anyhow::anyhow!("Missing {ACTING_ROLE_HEADER} header"))
            })?;

        let role = parse_role(role_header)?;

        Ok(Actor { user_id, role })
    }
}

/// Middleware that rejects callers below registrar level with 403.
pub async fn require_registrar(req: Request, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    let actor = match Actor::from_request_parts(&mut parts, &()).await {
        Ok(actor) => actor,
        Err(err) => return err.into_response(),
    };

    if !actor.is_registrar_level() {
        return AppError::forbidden(anyhow::anyhow!(
            "Access denied. Registrar privileges required, but caller has role: {}",
            actor.role
        ))
        .into_response();
    }

    let req = Request::from_parts(parts, body);
    next.run(req).await
}

fn parse_role(role_str: &str) -> Result<UserRole, AppError> {
    match role_str {
        "ADMINISTRATOR" => Ok(UserRole::Administrator),
        "REGISTRAR" => Ok(UserRole::Registrar),
        "DEAN" => Ok(UserRole::Dean),
        "PROGRAM_CHAIR" => Ok(UserRole::ProgramChair),
        "PROFESSOR" => Ok(UserRole::Professor),
        "STUDENT" => Ok(UserRole::Student),
        _ => Err(AppError::unauthorized(anyhow::anyhow!(
            "Invalid {ACTING_ROLE_HEADER} header: {role_str}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role() {
        assert!(matches!(
            parse_role("REGISTRAR"),
            Ok(UserRole::Registrar)
        ));
        assert!(matches!(parse_role("STUDENT"), Ok(UserRole::Student)));
        assert!(parse_role("registrar").is_err());
        assert!(parse_role("janitor").is_err());
    }

    #[test]
    fn test_registrar_level() {
        let admin = Actor {
            user_id: UserId::new(),
            role: UserRole::Administrator,
        };
        let student = Actor {
            user_id: UserId::new(),
            role: UserRole::Student,
        };
        assert!(admin.is_registrar_level());
        assert!(!student.is_registrar_level());
    }
}
