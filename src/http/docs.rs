//! OpenAPI document and documentation pages.

use axum::Router;
use utoipa::openapi::{Contact, License, OpenApi as OpenApiDoc, Server};
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::V1Api;
use crate::config::AppConfig;
use crate::http::response::{
    CheckStatus, ErrorResponse, HealthResponse, ReadyResponse, ReadyStatus, RootResponse,
};

pub const DOCS_URL: &str = "/docs";
pub const REDOC_URL: &str = "/redoc";

/// Unprefixed routes.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::http::server::root,
        crate::http::server::metrics,
        crate::health::handlers::liveness,
        crate::health::handlers::readiness,
    ),
    components(schemas(
        RootResponse,
        HealthResponse,
        ReadyResponse,
        ReadyStatus,
        CheckStatus,
        ErrorResponse
    )),
    tags((name = "health", description = "Liveness and readiness probes"))
)]
struct BaseApi;

/// Assemble the full document for a configuration.
pub fn build_openapi(config: &AppConfig) -> OpenApiDoc {
    let mut doc = BaseApi::openapi().nest(config.api.prefix.clone(), V1Api::openapi());

    let project = &config.project;
    doc.info.title = project.name.clone();
    doc.info.version = project.version.clone();
    doc.info.description = Some(project.description.clone());
    doc.info.terms_of_service = project.terms_of_service.clone();
    // The derive fills these from Cargo metadata; only configured values count.
    doc.info.contact = None;
    doc.info.license = None;

    if project.has_contact() {
        let mut contact = Contact::new();
        contact.name = project.contact_name.clone();
        contact.email = project.contact_email.clone();
        contact.url = project.contact_url.clone();
        doc.info.contact = Some(contact);
    }

    if let Some(name) = project.license_name.as_deref().filter(|n| !n.trim().is_empty()) {
        let mut license = License::new(name);
        license.url = project.license_url.clone();
        doc.info.license = Some(license);
    }

    doc.servers = Some(
        config
            .servers()
            .into_iter()
            .map(|entry| {
                let mut server = Server::new(entry.url);
                server.description = Some(entry.description);
                server
            })
            .collect(),
    );

    doc
}

/// Swagger UI under `/docs` and ReDoc under `/redoc`. Swagger UI also serves
/// the document itself at the configured OpenAPI URL.
pub fn router<S>(config: &AppConfig, doc: OpenApiDoc) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .merge(SwaggerUi::new(DOCS_URL).url(config.api.openapi_url(), doc.clone()))
        .merge(Redoc::with_url(REDOC_URL, doc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;

    #[test]
    fn document_reflects_project_metadata() {
        let mut config = AppConfig::default();
        config.project.name = "Greeter".into();
        config.project.version = "1.2.3".into();

        let doc = serde_json::to_value(build_openapi(&config)).unwrap();
        assert_eq!(doc["info"]["title"], "Greeter");
        assert_eq!(doc["info"]["version"], "1.2.3");
        assert!(doc["info"].get("contact").is_none());
        assert!(doc["info"].get("license").is_none());
        assert_eq!(doc["servers"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn license_requires_a_name() {
        let mut config = AppConfig::default();
        config.project.license_url = Some("https://opensource.org/licenses/MIT".into());

        let doc = build_openapi(&config);
        assert!(doc.info.license.is_none());
        assert!(doc.info.contact.is_none());
        let json = serde_json::to_string(&doc).unwrap();
        assert!(!json.contains("\"license\""));

        config.project.license_name = Some("  ".into());
        assert!(build_openapi(&config).info.license.is_none());
    }

    #[test]
    fn hello_route_is_nested_under_prefix() {
        let mut config = AppConfig::default();
        config.api.prefix = "/api/v2".into();

        let doc = serde_json::to_value(build_openapi(&config)).unwrap();
        let paths = doc["paths"].as_object().unwrap();
        assert!(paths.contains_key("/api/v2/hello/world"));
        assert!(paths.contains_key("/health/ready"));
    }

    #[test]
    fn contact_license_and_production_servers() {
        let mut config = AppConfig::default();
        config.environment = Environment::Production;
        config.project.contact_email = Some("ops@example.com".into());
        config.project.license_name = Some("MIT".into());
        config.project.license_url = Some("https://opensource.org/licenses/MIT".into());
        config.project.terms_of_service = Some("https://example.com/terms".into());

        let doc = serde_json::to_value(build_openapi(&config)).unwrap();
        assert_eq!(doc["info"]["contact"]["email"], "ops@example.com");
        assert_eq!(doc["info"]["license"]["name"], "MIT");
        assert_eq!(doc["info"]["termsOfService"], "https://example.com/terms");
        let servers = doc["servers"].as_array().unwrap();
        assert_eq!(servers.len(), 1);
        assert_eq!(servers[0]["description"], "Production server");
    }
}
