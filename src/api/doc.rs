//! OpenAPI documentation.
//!
//! [`ApiDoc`] collects every handler's `#[utoipa::path]` into one
//! document. It is served by Swagger UI when the `swagger-ui` feature is
//! enabled.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::identity::USER_ID_HEADER;

/// Registers the caller-identity header as a security scheme.
struct UserIdHeader;

impl Modify for UserIdHeader {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            "user_id",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                USER_ID_HEADER,
                "Id of the authenticated user, as returned by POST /api/v1/users.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(Debug, OpenApi)]
#[openapi(
    modifiers(&UserIdHeader),
    info(
        title = "courtbook",
        description = "Pickleball court events: skill-gated joins, waitlists, and FIFO promotion."
    ),
    paths(
        super::handlers::events::create_event,
        super::handlers::events::list_events,
        super::handlers::events::get_event,
        super::handlers::events::get_waitlist,
        super::handlers::membership::join_event,
        super::handlers::membership::leave_event,
        super::handlers::membership::join_waitlist,
        super::handlers::membership::leave_waitlist,
        super::handlers::users::create_user,
        super::handlers::users::me,
        super::handlers::system::health_handler,
        super::handlers::system::skill_levels_handler,
    ),
    components(schemas(crate::error::ErrorResponse, crate::domain::SkillLevel)),
    tags(
        (name = "Events", description = "Scheduling and browsing events"),
        (name = "Membership", description = "Joining and leaving events"),
        (name = "Waitlist", description = "Queueing for full events"),
        (name = "Users", description = "Player profiles"),
        (name = "System", description = "Health and reference data")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_membership_routes() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/events/{id}/join",
            "/api/v1/events/{id}/leave",
            "/api/v1/events/{id}/waitlist/join",
            "/api/v1/events/{id}/waitlist/leave",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn user_id_header_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let has_scheme = doc
            .components
            .as_ref()
            .is_some_and(|c| c.security_schemes.contains_key("user_id"));
        assert!(has_scheme);
    }
}
