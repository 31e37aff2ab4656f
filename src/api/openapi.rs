use utoipa::OpenApi;

use super::handlers::{
    me::MeUpdateRequest,
    token_refresh::{AccessResponse, RefreshRequest},
    user_login::{LoginRequest, TokenPairResponse},
    user_register::{RegisterRequest, UserResponse},
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "identeco",
        description = "Authentication and session lifecycle for user management"
    ),
    paths(
        crate::api::handlers::health::health,
        crate::api::handlers::user_register::register,
        crate::api::handlers::user_login::login,
        crate::api::handlers::token_refresh::refresh,
        crate::api::handlers::me::get_me,
        crate::api::handlers::me::update_me,
    ),
    components(schemas(
        RegisterRequest,
        UserResponse,
        LoginRequest,
        TokenPairResponse,
        RefreshRequest,
        AccessResponse,
        MeUpdateRequest,
    )),
    tags(
        (name = "users", description = "User creation and self-service"),
        (name = "token", description = "Token pair issuance and refresh"),
        (name = "health", description = "Service health"),
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = openapi();
        for path in ["/health", "/users", "/users/me", "/token", "/token/refresh"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
