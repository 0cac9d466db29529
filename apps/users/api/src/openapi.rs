use domain_users::entity::USERS_URL;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Users API",
        version = "0.1.0",
        description = "Create, list, fetch, update and delete users"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = USERS_URL, api = domain_users::handlers::ApiDoc)
    )
)]
pub struct ApiDoc;
