use async_trait::async_trait;
use axum::{
    body::{Bytes, HttpBody},
    extract::{DefaultBodyLimit, Extension, Form, FromRequest, Multipart, Path, State},
    http::{header::CONTENT_TYPE, HeaderMap, Request},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    BoxError, Router,
};
use tracing::error;
use crate::books::dto::BookForm;
use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest};
use crate::catalog::command::get_book_cmd::{GetBookCommand, GetBookCommandRequest};
use crate::catalog::command::list_books_cmd::{ListBooksCommand, ListBooksCommandRequest};
use crate::catalog::command::remove_book_cmd::{RemoveBookCommand, RemoveBookCommandRequest};
use crate::catalog::command::update_book_cmd::{UpdateBookCommand, UpdateBookCommandRequest};
use crate::catalog::views::{PageResponse, View};
use crate::core::auth::Principal;
use crate::core::command::{Command, CommandError};
use crate::core::controller::AppState;
use crate::core::library::{LibraryError, LibraryResult};
use crate::uploads::UploadedFile;

const FILE_FIELD: &str = "file";
const URL_ENCODED: &str = "application/x-www-form-urlencoded";

// generic over the request body so the same routes serve both hyper and Lambda requests
pub(crate) fn catalog_router<B>(state: AppState) -> Router<(), B>
    where B: HttpBody<Data = Bytes> + Send + 'static,
          B::Error: Into<BoxError> {
    let protected = Router::new()
        .route("/books/add", get(show_add_form).post(add_book))
        .route("/books/delete/:id", get(remove_book))
        .route("/books/:id", get(show_edit_form).post(update_book))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_login));

    Router::new()
        .route("/books", get(list_books))
        .merge(protected)
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .with_state(state)
}

// redirects home before anything else runs when the request is not logged in
async fn require_login<B>(
    State(state): State<AppState>,
    mut req: Request<B>,
    next: Next<B>) -> Response {
    match state.auth.authenticate(req.headers()) {
        Some(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        None => PageResponse::home().into_response(),
    }
}

// BookSubmission is the parsed add/edit form: text fields plus at most one image. Url-encoded
// forms carry no file and are accepted as a submission without upload.
#[derive(Debug, Default)]
pub(crate) struct BookSubmission {
    pub form: BookForm,
    pub upload: Option<UploadedFile>,
}

impl BookSubmission {
    pub fn new(form: BookForm, upload: Option<UploadedFile>) -> Self {
        Self {
            form,
            upload,
        }
    }

    async fn read(mut multipart: Multipart) -> LibraryResult<Self> {
        let mut submission = BookSubmission::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            if name != FILE_FIELD {
                let value = field.text().await?;
                submission.form.set(name.as_str(), value);
                continue;
            }
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await?;
            // an empty file input is sent without a filename
            if file_name.is_empty() {
                continue;
            }
            if submission.upload.is_some() {
                return Err(LibraryError::validation("only one file can be uploaded per book", Some(FILE_FIELD.to_string())));
            }
            submission.upload = Some(UploadedFile::new(file_name.as_str(), content_type.as_deref(), bytes.to_vec()));
        }
        Ok(submission)
    }
}

fn is_url_encoded(headers: &HeaderMap) -> bool {
    headers.get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map_or(false, |v| v.starts_with(URL_ENCODED))
}

#[async_trait]
impl<S, B> FromRequest<S, B> for BookSubmission
    where S: Send + Sync,
          B: HttpBody<Data = Bytes> + Send + 'static,
          B::Error: Into<BoxError> {
    type Rejection = PageResponse;

    async fn from_request(req: Request<B>, state: &S) -> Result<Self, Self::Rejection> {
        let res = if is_url_encoded(req.headers()) {
            match Form::<BookForm>::from_request(req, state).await {
                Ok(Form(form)) => Ok(BookSubmission::new(form, None)),
                Err(rejection) => Err(LibraryError::validation(
                    format!("malformed url-encoded form {}", rejection).as_str(), None)),
            }
        } else {
            match Multipart::from_request(req, state).await {
                Ok(multipart) => BookSubmission::read(multipart).await,
                Err(rejection) => Err(LibraryError::validation(
                    format!("expected a multipart form {}", rejection).as_str(), None)),
            }
        };
        res.map_err(|err| {
            error!("failed to read book form {}", err);
            PageResponse::error_view(CommandError::from(err))
        })
    }
}

pub(crate) async fn list_books(
    State(state): State<AppState>,
    headers: HeaderMap) -> PageResponse {
    let user = state.auth.authenticate(&headers);
    index(&state, user).await
}

pub(crate) async fn show_add_form(
    Extension(user): Extension<Principal>) -> PageResponse {
    PageResponse::render(View::add(Some(user)))
}

pub(crate) async fn add_book(
    State(state): State<AppState>,
    submission: BookSubmission) -> PageResponse {
    create(&state, submission).await
}

pub(crate) async fn remove_book(
    State(state): State<AppState>,
    Path(book_id): Path<String>) -> PageResponse {
    delete(&state, book_id).await
}

pub(crate) async fn show_edit_form(
    State(state): State<AppState>,
    Extension(user): Extension<Principal>,
    Path(book_id): Path<String>) -> PageResponse {
    edit(&state, Some(user), book_id).await
}

pub(crate) async fn update_book(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
    submission: BookSubmission) -> PageResponse {
    update(&state, book_id, submission).await
}

// list failures end the response with the raw error instead of the error page
pub(crate) async fn index(state: &AppState, user: Option<Principal>) -> PageResponse {
    match ListBooksCommand::new(state.catalog.clone()).execute(ListBooksCommandRequest::new()).await {
        Ok(res) => PageResponse::render(View::index(res.books, user)),
        Err(err) => {
            error!("failed to list books {:?}", err);
            PageResponse::aborted(&err)
        }
    }
}

pub(crate) async fn create(state: &AppState, submission: BookSubmission) -> PageResponse {
    let cmd = AddBookCommand::new(state.catalog.clone(), state.uploads.clone());
    match cmd.execute(AddBookCommandRequest::new(submission.form, submission.upload)).await {
        Ok(_) => PageResponse::books(),
        Err(err) => {
            error!("failed to add book {:?}", err);
            PageResponse::error_view(err)
        }
    }
}

pub(crate) async fn delete(state: &AppState, book_id: String) -> PageResponse {
    match RemoveBookCommand::new(state.catalog.clone()).execute(RemoveBookCommandRequest::new(book_id)).await {
        Ok(_) => PageResponse::books(),
        Err(err) => {
            error!("failed to remove book {:?}", err);
            PageResponse::error_view(err)
        }
    }
}

pub(crate) async fn edit(state: &AppState, user: Option<Principal>, book_id: String) -> PageResponse {
    match GetBookCommand::new(state.catalog.clone()).execute(GetBookCommandRequest::new(book_id)).await {
        Ok(res) => PageResponse::render(View::edit(res.book, user)),
        Err(err) => {
            error!("failed to find book {:?}", err);
            PageResponse::error_view(err)
        }
    }
}

pub(crate) async fn update(state: &AppState, book_id: String, submission: BookSubmission) -> PageResponse {
    let cmd = UpdateBookCommand::new(state.catalog.clone(), state.uploads.clone());
    let req = UpdateBookCommandRequest::new(book_id.as_str(), submission.form, submission.upload);
    match cmd.execute(req).await {
        Ok(_) => PageResponse::books(),
        Err(err) => {
            error!("failed to update book {} {:?}", book_id, err);
            PageResponse::error_view(err)
        }
    }
}
