use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(crate::api::health::healthz),
    components(
        schemas(axum_helpers::ErrorResponse),
        responses(axum_helpers::errors::responses::ServiceUnavailableResponse)
    ),
    info(
        title = "Shopping List API",
        version = "0.1.0",
        description = "Add, list and remove shopping list items"
    ),
    tags((name = "Health", description = "Readiness probe"))
)]
struct ServiceDoc;

/// Full API document: service-level paths plus every domain's paths.
///
/// Domain routes are absolute, so documents are merged rather than nested.
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        let mut doc = ServiceDoc::openapi();
        doc.merge(domain_items::ApiDoc::openapi());
        doc
    }
}
