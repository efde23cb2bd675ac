use crate::domain::{DeviceInfo, DeviceUpdate, NewDevice};
use crate::{Catalog, CatalogError};
use axum::Json;
use axum::extract::{Multipart, Query, State};
use axum::http::header;
use devreg_derive::{api_handler, api_model};
use devreg_domain::constants::CATALOG_TAG;
use devreg_domain::models::{RegistryDocument, lenient};
use devreg_kernel::server::{ApiError, ApiResult, ApiState, ErrorBody, MessageBody, Payload};
use serde::Serialize;
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::DeviceNotFound { .. } => Self::not_found("Device not found"),
            CatalogError::MissingField { field, .. } => {
                Self::bad_request(format!("Missing required field '{field}'"))
            },
            CatalogError::InvalidFilename { filename, .. } => {
                Self::bad_request(format!("Invalid photo file name '{filename}'"))
            },
            CatalogError::Photo { source, context } => Self::Internal {
                message: source.to_string().into(),
                context: Some(context.unwrap_or_else(|| "Photo storage".into())),
            },
            CatalogError::Store { source, context } => Self::Store { source, context },
        }
    }
}

/// Edit and delete answer unknown identifiers in product terms.
fn product_error(err: CatalogError) -> ApiError {
    match err {
        CatalogError::DeviceNotFound { .. } => ApiError::not_found("Product not found"),
        other => other.into(),
    }
}

/// Device lookup; `id` is accepted as an alias of `identifier`.
#[api_model(deny_unknown_fields = false)]
pub struct IdentifierQuery {
    #[serde(default, alias = "id")]
    pub identifier: Option<String>,
}

impl IdentifierQuery {
    fn identifier(self) -> Option<String> {
        self.identifier.filter(|id| !id.trim().is_empty())
    }
}

/// One device when an identifier was given, every device otherwise.
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum PhotoInfo {
    One(DeviceInfo),
    All(Vec<DeviceInfo>),
}

/// Multipart body of `/upload`, documented for the API reference only.
#[api_model]
pub struct UploadForm {
    pub identifier: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub serial_number: Option<String>,
    pub manufacturer: Option<String>,
    #[cfg_attr(feature = "server", schema(value_type = String, format = Binary))]
    pub photo: String,
}

/// Partial device edit. Absent fields keep their value; `null` clears it.
#[api_model(deny_unknown_fields = false)]
#[serde(default)]
#[derive(Default)]
pub struct EditProductRequest {
    #[serde(deserialize_with = "lenient::optional_text")]
    pub identifier: Option<String>,
    #[serde(deserialize_with = "lenient::patch_text")]
    #[cfg_attr(feature = "server", schema(value_type = Option<String>))]
    pub name: Option<Option<String>>,
    #[serde(deserialize_with = "lenient::patch_text")]
    #[cfg_attr(feature = "server", schema(value_type = Option<String>))]
    pub description: Option<Option<String>>,
    #[serde(deserialize_with = "lenient::patch_text")]
    #[cfg_attr(feature = "server", schema(value_type = Option<String>))]
    pub serial_number: Option<Option<String>>,
    #[serde(deserialize_with = "lenient::patch_text")]
    #[cfg_attr(feature = "server", schema(value_type = Option<String>))]
    pub manufacturer: Option<Option<String>>,
}

#[api_handler(
    get,
    path = "/photo-info",
    params(("identifier" = Option<String>, Query, description = "Device identifier, alias `id`")),
    responses(
        (status = OK, description = "Device info, or all devices without an identifier", body = PhotoInfo),
        (status = NOT_FOUND, description = "Device not found", body = ErrorBody),
    ),
    tag = CATALOG_TAG,
)]
async fn photo_info_handler(
    State(state): State<ApiState>,
    Query(query): Query<IdentifierQuery>,
) -> ApiResult<Json<PhotoInfo>> {
    let catalog = state.try_get_slice::<Catalog>()?;

    let info = match query.identifier() {
        Some(identifier) => PhotoInfo::One(catalog.info(&identifier).await?),
        None => PhotoInfo::All(catalog.all_info().await),
    };

    Ok(Json(info))
}

#[api_handler(
    get,
    path = "/show_photo",
    params(("identifier" = String, Query, description = "Device identifier, alias `id`")),
    responses(
        (status = OK, description = "Photo bytes", content_type = "image/jpeg"),
        (status = BAD_REQUEST, description = "No identifier", body = ErrorBody),
        (status = NOT_FOUND, description = "Device not found", body = ErrorBody),
    ),
    tag = CATALOG_TAG,
)]
async fn show_photo_handler(
    State(state): State<ApiState>,
    Query(query): Query<IdentifierQuery>,
) -> ApiResult<([(header::HeaderName, &'static str); 1], Vec<u8>)> {
    let identifier = query
        .identifier()
        .ok_or_else(|| ApiError::bad_request("Identifier not provided in the query parameters"))?;

    let bytes = state.try_get_slice::<Catalog>()?.photo(&identifier).await?;

    Ok(([(header::CONTENT_TYPE, "image/jpeg")], bytes))
}

#[api_handler(
    post,
    path = "/upload",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = OK, description = "Device registered", body = MessageBody),
        (status = BAD_REQUEST, description = "Missing identifier or photo", body = ErrorBody),
    ),
    tag = CATALOG_TAG,
)]
async fn upload_handler(
    State(state): State<ApiState>,
    mut multipart: Multipart,
) -> ApiResult<Json<MessageBody>> {
    let mut device = NewDevice::default();
    let mut photo: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_owned();

        if name == "photo" {
            let filename = field.file_name().unwrap_or_default().to_owned();
            let bytes = field.bytes().await.map_err(multipart_error)?;
            photo = Some((filename, bytes.to_vec()));
            continue;
        }

        let value = field.text().await.map_err(multipart_error)?;
        let slot = match name.as_str() {
            "identifier" => &mut device.identifier,
            "name" => &mut device.name,
            "description" => &mut device.description,
            "serialNumber" => &mut device.serial_number,
            "manufacturer" => &mut device.manufacturer,
            _ => continue,
        };
        *slot = Some(value);
    }

    let (filename, bytes) = photo.ok_or_else(|| ApiError::bad_request("No photo uploaded"))?;
    state.try_get_slice::<Catalog>()?.upload(device, &filename, &bytes).await?;

    Ok(Json(MessageBody::new("The photo uploaded successfully")))
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::bad_request(format!("Malformed multipart body: {}", err.body_text()))
}

#[api_handler(
    get,
    path = "/get_all",
    responses((status = OK, description = "The whole registry document", body = RegistryDocument)),
    tag = CATALOG_TAG,
)]
async fn get_all_handler(State(state): State<ApiState>) -> ApiResult<Json<RegistryDocument>> {
    Ok(Json(state.try_get_slice::<Catalog>()?.document().await))
}

#[api_handler(
    put,
    path = "/edit_product",
    request_body(content(
        (EditProductRequest = "application/json"),
        (EditProductRequest = "application/x-www-form-urlencoded"),
    )),
    responses(
        (status = OK, description = "Device updated", body = MessageBody),
        (status = BAD_REQUEST, description = "No identifier", body = ErrorBody),
        (status = NOT_FOUND, description = "Product not found", body = ErrorBody),
    ),
    tag = CATALOG_TAG,
)]
async fn edit_product_handler(
    State(state): State<ApiState>,
    Payload(req): Payload<EditProductRequest>,
) -> ApiResult<Json<MessageBody>> {
    let identifier = req
        .identifier
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing required field 'identifier'"))?;

    let update = DeviceUpdate {
        identifier,
        name: req.name,
        description: req.description,
        serial_number: req.serial_number,
        manufacturer: req.manufacturer,
    };
    state.try_get_slice::<Catalog>()?.update(update).await.map_err(product_error)?;

    Ok(Json(MessageBody::new("The product edited successfully")))
}

#[api_handler(
    delete,
    path = "/delete_product",
    params(("identifier" = String, Query, description = "Device identifier")),
    responses(
        (status = OK, description = "Device deleted", body = MessageBody),
        (status = BAD_REQUEST, description = "No identifier", body = ErrorBody),
        (status = NOT_FOUND, description = "Product not found", body = ErrorBody),
    ),
    tag = CATALOG_TAG,
)]
async fn delete_product_handler(
    State(state): State<ApiState>,
    Query(query): Query<IdentifierQuery>,
) -> ApiResult<Json<MessageBody>> {
    let identifier = query
        .identifier()
        .ok_or_else(|| ApiError::bad_request("Missing required field 'identifier'"))?;

    state.try_get_slice::<Catalog>()?.delete(&identifier).await.map_err(product_error)?;

    Ok(Json(MessageBody::new("The product deleted successfully")))
}

/// Routes of the catalog slice.
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(photo_info_handler))
        .routes(routes!(show_photo_handler))
        .routes(routes!(upload_handler))
        .routes(routes!(get_all_handler))
        .routes(routes!(edit_product_handler))
        .routes(routes!(delete_product_handler))
}
