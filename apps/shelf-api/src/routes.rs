use axum::{
	Json, Router,
	body::Bytes,
	extract::{DefaultBodyLimit, Path, Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use shelf_domain::catalog::{Product, Tag};
use shelf_service::{
	CombinedSearchRequest, CombinedSearchResponse, Error, ImageSearchResponse, ProductDraft,
	RebuildReport, SearchRequest, SearchResponse, VectorSearchRequest, VectorSearchResponse,
};

#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
	pub tag_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct AddTagRequest {
	pub name: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteProductResponse {
	pub product_id: i32,
	pub deleted: bool,
}

pub fn router(state: AppState) -> Router {
	let max_image_bytes = state.service.cfg.search.max_image_bytes;

	Router::new()
		.route("/health", get(health))
		.route("/v1/search", post(search))
		.route("/v1/search/vector", post(search_vector))
		.route("/v1/search/combined", post(search_combined))
		.route(
			"/v1/search/image",
			post(search_image).layer(DefaultBodyLimit::max(max_image_bytes)),
		)
		.route("/v1/products", get(list_products).post(add_product))
		.route(
			"/v1/products/{product_id}",
			get(get_product).put(update_product).delete(delete_product),
		)
		.route("/v1/tags", get(list_tags).post(add_tag))
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new().route("/v1/admin/rebuild_index", post(rebuild_index)).with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search(
	State(state): State<AppState>,
	Json(payload): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
	let response = state.service.search(payload).await?;

	Ok(Json(response))
}

async fn search_vector(
	State(state): State<AppState>,
	Json(payload): Json<VectorSearchRequest>,
) -> Result<Json<VectorSearchResponse>, ApiError> {
	let response = state.service.search_vector(payload).await?;

	Ok(Json(response))
}

async fn search_combined(
	State(state): State<AppState>,
	Json(payload): Json<CombinedSearchRequest>,
) -> Result<Json<CombinedSearchResponse>, ApiError> {
	let response = state.service.search_combined(payload).await?;

	Ok(Json(response))
}

async fn search_image(
	State(state): State<AppState>,
	body: Bytes,
) -> Result<Json<ImageSearchResponse>, ApiError> {
	let response = state.service.search_image(&body).await?;

	Ok(Json(response))
}

async fn list_products(
	State(state): State<AppState>,
	Query(query): Query<ListProductsQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
	let response = state.service.list_products_by_tag(query.tag_id).await?;

	Ok(Json(response))
}

async fn get_product(
	State(state): State<AppState>,
	Path(product_id): Path<i32>,
) -> Result<Json<Product>, ApiError> {
	let response = state.service.get_product(product_id).await?;

	Ok(Json(response))
}

async fn add_product(
	State(state): State<AppState>,
	Json(payload): Json<ProductDraft>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
	let response = state.service.add_product(payload).await?;

	Ok((StatusCode::CREATED, Json(response)))
}

async fn update_product(
	State(state): State<AppState>,
	Path(product_id): Path<i32>,
	Json(payload): Json<ProductDraft>,
) -> Result<Json<Product>, ApiError> {
	let response = state.service.update_product(product_id, payload).await?;

	Ok(Json(response))
}

async fn delete_product(
	State(state): State<AppState>,
	Path(product_id): Path<i32>,
) -> Result<Json<DeleteProductResponse>, ApiError> {
	let deleted = state.service.delete_product(product_id).await?;

	Ok(Json(DeleteProductResponse { product_id, deleted }))
}

async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, ApiError> {
	let response = state.service.list_tags().await?;

	Ok(Json(response))
}

async fn add_tag(
	State(state): State<AppState>,
	Json(payload): Json<AddTagRequest>,
) -> Result<(StatusCode, Json<Tag>), ApiError> {
	let response = state.service.add_tag(&payload.name).await?;

	Ok((StatusCode::CREATED, Json(response)))
}

async fn rebuild_index(State(state): State<AppState>) -> Result<Json<RebuildReport>, ApiError> {
	let response = state.service.rebuild_index().await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message } =>
				Self::new(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message),
			Error::NotFound { message } => Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message),
			Error::Provider { message } => {
				tracing::error!(error = %message, "Provider failure.");

				Self::new(StatusCode::BAD_GATEWAY, "PROVIDER_ERROR", "Upstream provider failed.")
			},
			Error::Storage { message } => {
				tracing::error!(error = %message, "Storage failure.");

				Self::new(
					StatusCode::INTERNAL_SERVER_ERROR,
					"STORAGE_ERROR",
					"Catalog storage failed.",
				)
			},
			Error::VectorIndex { message } => {
				tracing::error!(error = %message, "Vector index failure.");

				Self::new(
					StatusCode::SERVICE_UNAVAILABLE,
					"VECTOR_INDEX_ERROR",
					"Vector index failed.",
				)
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
