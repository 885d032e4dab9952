//! Login form

use super::context::{use_auth, use_session, AuthAction};
use super::server_field_errors;
use crate::components::toast::use_toast;
use shopdeck_core::validation::validate_login;
use shopdeck_core::ValidationError;
use shopdeck_http::types::LoginRequest;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[function_component(LoginForm)]
pub fn login_form() -> Html {
    let auth = use_auth();
    let session = use_session();
    let toast = use_toast();

    let email = use_state(String::new);
    let password = use_state(String::new);
    let errors = use_state(|| None::<ValidationError>);
    let submitting = use_state(|| false);

    let on_email = {
        let email = email.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                email.set(input.value());
            }
        })
    };

    let on_password = {
        let password = password.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                password.set(input.value());
            }
        })
    };

    let on_submit = {
        let auth = auth.clone();
        let session = session.clone();
        let toast = toast.clone();
        let email = email.clone();
        let password = password.clone();
        let errors = errors.clone();
        let submitting = submitting.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if let Err(failed) = validate_login(&email, &password) {
                errors.set(Some(failed));
                return;
            }
            errors.set(None);
            submitting.set(true);

            let request = LoginRequest {
                email: (*email).clone(),
                password: (*password).clone(),
            };
            let auth = auth.clone();
            let session = session.clone();
            let toast = toast.clone();
            let errors = errors.clone();
            let submitting = submitting.clone();
            spawn_local(async move {
                match session.controller().login(&request).await {
                    Ok(new_session) => {
                        toast.success("Login Successful", "Welcome back!");
                        auth.dispatch(AuthAction::LoggedIn(new_session));
                    }
                    Err(err) => {
                        errors.set(server_field_errors(&err));
                        toast.error("Login Failed", err.user_message());
                    }
                }
                submitting.set(false);
            });
        })
    };

    let field_message = |name: &str| -> Html {
        match errors.as_ref().and_then(|failed| failed.field(name)) {
            Some(message) => html! { <p class="text-sm text-red-500 mt-1">{message}</p> },
            None => html! {},
        }
    };

    html! {
        <form onsubmit={on_submit} class="space-y-4">
            <div>
                <label class="block text-sm font-medium text-gray-700 dark:text-gray-300 mb-1">
                    {"Email"}
                </label>
                <input
                    type="email"
                    value={(*email).clone()}
                    oninput={on_email}
                    placeholder="you@example.com"
                    class="w-full px-3 py-2 border border-gray-300 dark:border-gray-600 rounded-lg bg-white dark:bg-gray-800 text-gray-900 dark:text-gray-100 focus:outline-none focus:ring-2 focus:ring-blue-500"
                />
                { field_message("email") }
            </div>
            <div>
                <label class="block text-sm font-medium text-gray-700 dark:text-gray-300 mb-1">
                    {"Password"}
                </label>
                <input
                    type="password"
                    value={(*password).clone()}
                    oninput={on_password}
                    class="w-full px-3 py-2 border border-gray-300 dark:border-gray-600 rounded-lg bg-white dark:bg-gray-800 text-gray-900 dark:text-gray-100 focus:outline-none focus:ring-2 focus:ring-blue-500"
                />
                { field_message("password") }
            </div>
            <button
                type="submit"
                disabled={*submitting}
                class="w-full py-2 px-4 bg-blue-600 hover:bg-blue-700 disabled:opacity-50 text-white font-medium rounded-lg transition-colors"
            >
                { if *submitting { "Signing in..." } else { "Sign In" } }
            </button>
        </form>
    }
}
