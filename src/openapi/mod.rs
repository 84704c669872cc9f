use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront API",
        version = "1.0.0",
        description = r#"
# Storefront API

Catalog browsing, a session-scoped cart and order placement.

## Sessions

Carts are keyed by an opaque session token chosen by the client. The token
carries no authorization: anyone presenting it can read and change the cart.

## Error Handling

Failures share one body shape:

```json
{
  "error": "Not Found",
  "message": "Not found: No products found for this category",
  "request_id": "6f1c2a3e-8d7b-4a57-9f3c-0b1d2e3f4a5b",
  "timestamp": "2024-01-01T00:00:00Z"
}
```

Amounts are exact decimal strings such as `"15.99"`.
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "catalog", description = "Categories and products"),
        (name = "cart", description = "Session cart lines"),
        (name = "orders", description = "Checkout")
    ),
    paths(
        crate::handlers::catalog::list_products,
        crate::handlers::catalog::list_products_by_category,
        crate::handlers::catalog::list_categories,
        crate::handlers::cart::list_cart,
        crate::handlers::cart::add_to_cart,
        crate::handlers::cart::update_cart_item,
        crate::handlers::cart::remove_cart_item,
        crate::handlers::orders::place_order,
    ),
    components(
        schemas(
            crate::entities::ProductModel,
            crate::entities::CategoryModel,
            crate::entities::CartItemModel,
            crate::entities::OrderModel,
            crate::handlers::cart::AddCartItemRequest,
            crate::handlers::cart::UpdateCartItemRequest,
            crate::services::orders::PlaceOrderInput,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
