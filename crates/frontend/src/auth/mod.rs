//! Authentication UI and session context

pub mod context;
pub mod login_form;
pub mod register_form;
pub mod screen;

pub use context::{
    use_auth, use_auth_user, use_is_authenticated, use_session, AuthAction, AuthContext,
    AuthProvider, SessionHandle,
};
pub use login_form::LoginForm;
pub use register_form::RegisterForm;
pub use screen::AuthScreen;

use shopdeck_core::validation::FieldError;
use shopdeck_core::ValidationError;
use shopdeck_http::{ApiError, SessionError};

/// Map server-side field errors onto the form so they render inline next
/// to the offending input instead of only as a toast.
pub(crate) fn server_field_errors(error: &SessionError) -> Option<ValidationError> {
    if let SessionError::Api(ApiError::Http { field_errors, .. }) = error {
        if !field_errors.is_empty() {
            return Some(ValidationError(
                field_errors
                    .iter()
                    .map(|err| FieldError::new(err.field.clone(), err.message.clone()))
                    .collect(),
            ));
        }
    }
    None
}
