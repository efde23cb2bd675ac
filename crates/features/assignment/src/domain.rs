//! Assignment rules over the registry document.
//!
//! Each operation validates everything before touching the document, so an error leaves it
//! exactly as it was.

use crate::error::AssignmentError;
use devreg_domain::models::{Holder, RegistryDocument, Usage, User, UserDevice};
use tracing::warn;

/// Fields of a user to be created. `None` or blank means the field was not supplied.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub login: Option<String>,
    pub password: Option<String>,
}

/// Outcome of [`release_device`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Released {
    /// The entry removed from the user's list.
    pub entry: UserDevice,
    /// `false` when the list entry pointed at a device that no longer exists.
    pub device_reset: bool,
}

pub(crate) fn required(value: Option<String>, field: &'static str) -> Result<String, AssignmentError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(AssignmentError::MissingField { field, context: None })
}

fn user_index(doc: &RegistryDocument, username: &str) -> Result<usize, AssignmentError> {
    doc.users.iter().position(|user| user.name == username).ok_or_else(|| {
        AssignmentError::UserNotFound { username: username.to_owned(), context: None }
    })
}

/// Appends a user with an empty device list.
///
/// # Errors
/// [`AssignmentError::MissingField`] for an absent field, [`AssignmentError::LoginTaken`] if
/// another user already has the login.
pub fn add_user(doc: &mut RegistryDocument, new: NewUser) -> Result<User, AssignmentError> {
    let user = User {
        name: required(new.name, "name")?,
        surname: required(new.surname, "surname")?,
        login: required(new.login, "login")?,
        password: required(new.password, "password")?,
        ..User::default()
    };

    if doc.login_taken(&user.login) {
        return Err(AssignmentError::LoginTaken { login: user.login, context: None });
    }

    doc.users.push(user.clone());
    Ok(user)
}

/// Hands a free device to a user.
///
/// The device becomes `"is use"` and names `username` as its holder, and the user's list
/// gains `{identifier, "is use"}`.
///
/// # Errors
/// Checked in order: [`AssignmentError::UserNotFound`], [`AssignmentError::DeviceNotFound`],
/// [`AssignmentError::DeviceAlreadyAssigned`] (whoever holds it, the same user included).
pub fn assign_device(
    doc: &mut RegistryDocument,
    identifier: &str,
    username: &str,
) -> Result<UserDevice, AssignmentError> {
    let user = user_index(doc, username)?;

    let device = doc.device_mut(identifier).ok_or_else(|| AssignmentError::DeviceNotFound {
        identifier: identifier.to_owned(),
        context: None,
    })?;

    if device.usage.is_in_use() {
        return Err(AssignmentError::DeviceAlreadyAssigned {
            identifier: identifier.to_owned(),
            holder: device.user.to_string(),
            context: None,
        });
    }

    device.usage = Usage::InUse;
    device.user = Holder::User(username.to_owned());

    let entry = UserDevice::in_use(device.identifier.clone());
    doc.users[user].devices.push(entry.clone());
    Ok(entry)
}

/// Takes a device back from a user.
///
/// The user's list is the source of truth: the first matching entry is removed even when
/// the device itself is gone from the catalog. If the device still exists it returns to
/// `"no used"` / `"available"`.
///
/// # Errors
/// [`AssignmentError::UserNotFound`], then [`AssignmentError::DeviceNotInUserList`].
pub fn release_device(
    doc: &mut RegistryDocument,
    identifier: &str,
    username: &str,
) -> Result<Released, AssignmentError> {
    let user = user_index(doc, username)?;

    let position = doc.users[user].device_position(identifier).ok_or_else(|| {
        AssignmentError::DeviceNotInUserList {
            identifier: identifier.to_owned(),
            username: username.to_owned(),
            context: None,
        }
    })?;
    let entry = doc.users[user].devices.remove(position);

    let device_reset = match doc.device_mut(identifier) {
        Some(device) => {
            device.release();
            true
        },
        None => {
            warn!(device = %identifier, user = %username, "Released a device missing from the catalog");
            false
        },
    };

    Ok(Released { entry, device_reset })
}

/// The user's device list as stored, stale entries included.
///
/// # Errors
/// [`AssignmentError::UserNotFound`].
pub fn user_devices(
    doc: &RegistryDocument,
    username: &str,
) -> Result<Vec<UserDevice>, AssignmentError> {
    doc.user(username).map(|user| user.devices.clone()).ok_or_else(|| {
        AssignmentError::UserNotFound { username: username.to_owned(), context: None }
    })
}
