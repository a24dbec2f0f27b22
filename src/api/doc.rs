use utoipa::OpenApi;

pub const ITEM_TAG: &str = "Items";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "pager-rs",
        description = "Paginated catalog API with page-number and cursor listings",
    ),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::pagination::OffsetMetadata,
            crate::pagination::CursorMetadata,
            crate::pagination::SortOrder,
        )
    ),
    tags(
        (name = ITEM_TAG, description = "Catalog item endpoints"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
