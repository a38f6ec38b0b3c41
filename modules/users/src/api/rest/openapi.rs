use utoipa::OpenApi;

use crate::api::rest::{dto, handlers};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_users,
        handlers::get_user,
        handlers::create_user,
        handlers::update_user,
        handlers::delete_user,
    ),
    components(schemas(
        dto::UserDto,
        dto::UserReq,
        dto::UserResponse,
        dto::UserListResponse,
        dto::MessageResponse,
        dto::ErrorResponse,
    )),
    tags((name = "users", description = "User management"))
)]
pub struct UsersApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_user_route() {
        let doc = serde_json::to_value(UsersApiDoc::openapi()).unwrap();
        let paths = doc.pointer("/paths").unwrap();

        let collection = paths.get("/api/v1/users").unwrap();
        assert!(collection.get("get").is_some());
        assert!(collection.get("post").is_some());

        let item = paths.get("/api/v1/users/{id}").unwrap();
        for method in ["get", "put", "delete"] {
            assert!(item.get(method).is_some(), "missing {method}");
        }

        assert!(doc.pointer("/components/schemas/ErrorResponse").is_some());
    }
}
