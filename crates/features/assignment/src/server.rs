use crate::domain::{NewUser, required};
use crate::{Assignment, AssignmentError};
use axum::Json;
use axum::extract::{Query, State};
use devreg_derive::{api_handler, api_model};
use devreg_domain::constants::ASSIGNMENT_TAG;
use devreg_domain::models::{UserDevice, lenient};
use devreg_kernel::server::{ApiError, ApiResult, ApiState, ErrorBody, MessageBody, Payload};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

impl From<AssignmentError> for ApiError {
    fn from(err: AssignmentError) -> Self {
        match err {
            AssignmentError::UserNotFound { .. } => Self::not_found("User not found"),
            AssignmentError::DeviceNotFound { .. } => Self::not_found("Device not found"),
            AssignmentError::DeviceAlreadyAssigned { .. } => {
                Self::conflict("Device is already in use")
            },
            AssignmentError::DeviceNotInUserList { .. } => {
                Self::not_found("Device not found in the user's devices")
            },
            AssignmentError::LoginTaken { .. } => {
                Self::conflict("User with the login already exists")
            },
            AssignmentError::MissingField { field, .. } => {
                Self::bad_request(format!("Missing required field '{field}'"))
            },
            AssignmentError::Store { source, context } => Self::Store { source, context },
        }
    }
}

/// New user; every field is required.
#[api_model(deny_unknown_fields = false)]
#[serde(default)]
#[derive(Default)]
pub struct AddUserRequest {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub login: Option<String>,
    pub password: Option<String>,
}

/// A device/user pair for assign and release.
#[api_model(deny_unknown_fields = false)]
pub struct AssignmentRequest {
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub device_identifier: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

#[api_model(deny_unknown_fields = false)]
pub struct UserDevicesQuery {
    #[serde(default)]
    pub username: Option<String>,
}

#[api_model]
pub struct UserDevicesResponse {
    pub username: String,
    pub devices: Vec<UserDevice>,
}

impl AssignmentRequest {
    fn into_pair(self) -> Result<(String, String), AssignmentError> {
        Ok((required(self.device_identifier, "deviceIdentifier")?, required(self.username, "username")?))
    }
}

#[api_handler(
    post,
    path = "/add_user",
    request_body(content(
        (AddUserRequest = "application/x-www-form-urlencoded"),
        (AddUserRequest = "application/json"),
    )),
    responses(
        (status = OK, description = "User added", body = MessageBody),
        (status = BAD_REQUEST, description = "A field is missing", body = ErrorBody),
        (status = CONFLICT, description = "Login already taken", body = ErrorBody),
    ),
    tag = ASSIGNMENT_TAG,
)]
async fn add_user_handler(
    State(state): State<ApiState>,
    Payload(req): Payload<AddUserRequest>,
) -> ApiResult<Json<MessageBody>> {
    let assignment = state.try_get_slice::<Assignment>()?;
    assignment
        .add_user(NewUser {
            name: req.name,
            surname: req.surname,
            login: req.login,
            password: req.password,
        })
        .await?;

    Ok(Json(MessageBody::new("User added successfully")))
}

#[api_handler(
    post,
    path = "/add_device_to_user",
    request_body(content(
        (AssignmentRequest = "application/x-www-form-urlencoded"),
        (AssignmentRequest = "application/json"),
    )),
    responses(
        (status = OK, description = "Device assigned", body = MessageBody),
        (status = NOT_FOUND, description = "User or device not found", body = ErrorBody),
        (status = CONFLICT, description = "Device already in use", body = ErrorBody),
    ),
    tag = ASSIGNMENT_TAG,
)]
async fn add_device_to_user_handler(
    State(state): State<ApiState>,
    Payload(req): Payload<AssignmentRequest>,
) -> ApiResult<Json<MessageBody>> {
    let (identifier, username) = req.into_pair()?;
    state.try_get_slice::<Assignment>()?.assign(&identifier, &username).await?;

    Ok(Json(MessageBody::new("Device added to the user successfully")))
}

#[api_handler(
    post,
    path = "/remove_device_from_user",
    request_body(content(
        (AssignmentRequest = "application/x-www-form-urlencoded"),
        (AssignmentRequest = "application/json"),
    )),
    responses(
        (status = OK, description = "Device released", body = MessageBody),
        (status = NOT_FOUND, description = "User not found or device not in their list", body = ErrorBody),
    ),
    tag = ASSIGNMENT_TAG,
)]
async fn remove_device_from_user_handler(
    State(state): State<ApiState>,
    Payload(req): Payload<AssignmentRequest>,
) -> ApiResult<Json<MessageBody>> {
    let (identifier, username) = req.into_pair()?;
    state.try_get_slice::<Assignment>()?.release(&identifier, &username).await?;

    Ok(Json(MessageBody::new("The device removed from user successfully")))
}

#[api_handler(
    get,
    path = "/user_devices",
    params(("username" = String, Query, description = "Name of the user")),
    responses(
        (status = OK, description = "The user's device list", body = UserDevicesResponse),
        (status = NOT_FOUND, description = "User not found", body = ErrorBody),
    ),
    tag = ASSIGNMENT_TAG,
)]
async fn user_devices_handler(
    State(state): State<ApiState>,
    Query(query): Query<UserDevicesQuery>,
) -> ApiResult<Json<UserDevicesResponse>> {
    let username = required(query.username, "username")?;
    let devices = state.try_get_slice::<Assignment>()?.devices_of(&username).await?;

    Ok(Json(UserDevicesResponse { username, devices }))
}

/// Routes of the assignment slice.
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(add_user_handler))
        .routes(routes!(add_device_to_user_handler))
        .routes(routes!(remove_device_from_user_handler))
        .routes(routes!(user_devices_handler))
}
