use std::borrow::Cow;

/// A specialized [`AssignmentError`] enum of this crate.
#[devreg_derive::app_error]
pub enum AssignmentError {
    #[error("User not found{}: {username}", format_context(.context))]
    UserNotFound { username: String, context: Option<Cow<'static, str>> },

    #[error("Device not found{}: {identifier}", format_context(.context))]
    DeviceNotFound { identifier: String, context: Option<Cow<'static, str>> },

    /// Also raised when the device is already held by the requesting user.
    #[error("Device {identifier} is already in use by {holder}{}", format_context(.context))]
    DeviceAlreadyAssigned {
        identifier: String,
        holder: String,
        context: Option<Cow<'static, str>>,
    },

    #[error("Device {identifier} is not listed for {username}{}", format_context(.context))]
    DeviceNotInUserList {
        identifier: String,
        username: String,
        context: Option<Cow<'static, str>>,
    },

    #[error("Login already taken{}: {login}", format_context(.context))]
    LoginTaken { login: String, context: Option<Cow<'static, str>> },

    #[error("Missing required field{}: {field}", format_context(.context))]
    MissingField { field: &'static str, context: Option<Cow<'static, str>> },

    #[error("Registry store error{}: {source}", format_context(.context))]
    Store { source: devreg_store::StoreError, context: Option<Cow<'static, str>> },
}
