use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Redirect, Response};
use serde::Serialize;
use crate::books::dto::BookDto;
use crate::core::auth::Principal;
use crate::core::command::CommandError;
use crate::core::controller::ServerError;

pub(crate) const HOME: &str = "/";
pub(crate) const BOOKS: &str = "/books";

// View is what a template needs to render a page. Rendering itself happens outside of the
// catalog so the directive is answered as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct View {
    pub view: &'static str,
    pub title: &'static str,
    pub user: Option<Principal>,
    #[serde(flatten)]
    pub model: ViewModel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub(crate) enum ViewModel {
    Books { books: Vec<BookDto> },
    Book { book: Option<BookDto> },
    Empty {},
}

impl View {
    pub fn index(books: Vec<BookDto>, user: Option<Principal>) -> Self {
        Self { view: "books/index", title: "Book List", user, model: ViewModel::Books { books } }
    }

    pub fn add(user: Option<Principal>) -> Self {
        Self { view: "books/add", title: "Book Details", user, model: ViewModel::Empty {} }
    }

    pub fn edit(book: Option<BookDto>, user: Option<Principal>) -> Self {
        Self { view: "books/edit", title: "Book Details", user, model: ViewModel::Book { book } }
    }

    pub fn error() -> Self {
        Self { view: "error", title: "Error", user: None, model: ViewModel::Empty {} }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PageResponse {
    Render(View),
    Redirect(String),
    // generic error page, the client never sees the cause
    ErrorView(StatusCode),
    // response ended with the raw error and no page
    Aborted(String),
}

impl PageResponse {
    pub fn render(view: View) -> Self {
        PageResponse::Render(view)
    }

    pub fn redirect(to: &str) -> Self {
        PageResponse::Redirect(to.to_string())
    }

    pub fn home() -> Self {
        Self::redirect(HOME)
    }

    pub fn books() -> Self {
        Self::redirect(BOOKS)
    }

    pub fn error_view(err: CommandError) -> Self {
        let (status, _) = ServerError::from(err);
        PageResponse::ErrorView(status)
    }

    pub fn aborted(err: &CommandError) -> Self {
        PageResponse::Aborted(format!("{:?}", err))
    }
}

impl IntoResponse for PageResponse {
    fn into_response(self) -> Response {
        match self {
            PageResponse::Render(view) => Json(view).into_response(),
            PageResponse::Redirect(to) => Redirect::to(to.as_str()).into_response(),
            PageResponse::ErrorView(status) => (status, Json(View::error())).into_response(),
            PageResponse::Aborted(message) => (StatusCode::INTERNAL_SERVER_ERROR, message).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::header::LOCATION;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use serde_json::json;
    use crate::catalog::views::{PageResponse, View};
    use crate::core::auth::Principal;
    use crate::core::command::CommandError;

    #[tokio::test]
    async fn test_should_serialize_views() {
        let index = serde_json::to_value(View::index(vec![], Some(Principal::new("admin")))).expect("should serialize");
        assert_eq!(json!({"view": "books/index", "title": "Book List", "user": {"username": "admin"}, "books": []}), index);

        let edit = serde_json::to_value(View::edit(None, None)).expect("should serialize");
        assert_eq!(json!({"view": "books/edit", "title": "Book Details", "user": null, "book": null}), edit);

        let add = serde_json::to_value(View::add(None)).expect("should serialize");
        assert_eq!(json!({"view": "books/add", "title": "Book Details", "user": null}), add);
    }

    #[tokio::test]
    async fn test_should_answer_redirect() {
        let res = PageResponse::books().into_response();
        assert!(res.status().is_redirection());
        assert_eq!(Some("/books"), res.headers().get(LOCATION).and_then(|v| v.to_str().ok()));
    }

    #[tokio::test]
    async fn test_should_hide_error_cause() {
        let page = PageResponse::error_view(CommandError::Database { message: "secret".to_string(), reason_code: None, retryable: false });
        assert_eq!(PageResponse::ErrorView(StatusCode::INTERNAL_SERVER_ERROR), page);
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, page.into_response().status());

        let aborted = PageResponse::aborted(&CommandError::Database { message: "boom".to_string(), reason_code: None, retryable: false });
        assert!(matches!(&aborted, PageResponse::Aborted(msg) if msg.contains("boom")));
        assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, aborted.into_response().status());
    }
}
