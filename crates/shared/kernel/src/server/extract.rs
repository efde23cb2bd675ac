use super::error::ApiError;
use axum::extract::{Form, FromRequest, Json, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// A request body accepted as JSON, URL-encoded form or multipart text fields.
///
/// The `Content-Type` header picks the decoder. Every rejection becomes
/// [`ApiError::BadRequest`], so clients always get the `{"error": ...}` shape.
#[derive(Debug, Clone)]
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_ascii_lowercase())
            .unwrap_or_default();

        if content_type.starts_with("application/json") {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
            return Ok(Self(value));
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
            return Ok(Self(value));
        }

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
            return multipart_fields(multipart).await.map(Self);
        }

        Err(ApiError::bad_request(format!("Unsupported content type '{content_type}'")))
    }
}

/// Collects the text fields of a multipart body and decodes them like a form.
async fn multipart_fields<T: DeserializeOwned>(mut multipart: Multipart) -> Result<T, ApiError> {
    let mut fields = Map::new();

    while let Some(field) =
        multipart.next_field().await.map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        let Some(name) = field.name().map(ToOwned::to_owned) else {
            continue;
        };
        if field.file_name().is_some() {
            continue;
        }
        let text = field.text().await.map_err(|e| ApiError::bad_request(e.body_text()))?;
        fields.insert(name, Value::String(text));
    }

    serde_json::from_value(Value::Object(fields))
        .map_err(|e| ApiError::bad_request(format!("Failed to deserialize form: {e}")))
}
