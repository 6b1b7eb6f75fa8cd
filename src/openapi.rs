use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::Modify;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shift Intake API",
        version = "0.1.0",
        description = "Submission and lookup of worker shifts"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        crate::handlers::health::health_check,
        crate::handlers::shifts_handler::create_shift,
        crate::handlers::shifts_handler::list_shifts,
        crate::handlers::shifts_handler::get_shift,
    ),
    components(
        schemas(
            crate::models::CreateShiftInput,
            crate::models::ShiftRepresentation,
            crate::models::ShiftPeriod,
        )
    ),
    tags(
        (name = "health", description = "Health check"),
        (name = "shifts", description = "Shift submission"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("__session"))),
            )
        }
    }
}
