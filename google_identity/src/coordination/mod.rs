mod errors;
mod login;
mod user;

pub use errors::CoordinationError;
pub use login::{authenticate_request, federated_login, resolve_or_create, verify_bearer};
pub use user::{ProfileUpdate, lookup_email_by_username, register, update_profile};
