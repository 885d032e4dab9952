//! Registration form

use super::context::{use_auth, use_session, AuthAction};
use super::server_field_errors;
use crate::components::toast::use_toast;
use shopdeck_core::validation::validate_registration;
use shopdeck_core::ValidationError;
use shopdeck_http::types::RegisterRequest;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

/// 0..=5, one point per satisfied password rule.
fn password_strength(password: &str) -> usize {
    let mut strength = 0;
    if password.len() >= 8 {
        strength += 1;
    }
    if password.chars().any(|c| c.is_ascii_uppercase()) {
        strength += 1;
    }
    if password.chars().any(|c| c.is_ascii_lowercase()) {
        strength += 1;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        strength += 1;
    }
    if password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        strength += 1;
    }
    strength
}

fn strength_color(strength: usize) -> &'static str {
    if strength < 2 {
        "bg-red-500"
    } else if strength < 4 {
        "bg-yellow-500"
    } else {
        "bg-green-500"
    }
}

#[function_component(RegisterForm)]
pub fn register_form() -> Html {
    let auth = use_auth();
    let session = use_session();
    let toast = use_toast();

    let first_name = use_state(String::new);
    let last_name = use_state(String::new);
    let email = use_state(String::new);
    let password = use_state(String::new);
    let confirm_password = use_state(String::new);
    let errors = use_state(|| None::<ValidationError>);
    let submitting = use_state(|| false);

    let bind = |state: &UseStateHandle<String>| {
        let state = state.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                state.set(input.value());
            }
        })
    };

    let on_submit = {
        let auth = auth.clone();
        let session = session.clone();
        let toast = toast.clone();
        let first_name = first_name.clone();
        let last_name = last_name.clone();
        let email = email.clone();
        let password = password.clone();
        let confirm_password = confirm_password.clone();
        let errors = errors.clone();
        let submitting = submitting.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if let Err(failed) = validate_registration(
                &email,
                &password,
                &confirm_password,
                &first_name,
                &last_name,
            ) {
                errors.set(Some(failed));
                return;
            }
            errors.set(None);
            submitting.set(true);

            let request = RegisterRequest {
                email: (*email).clone(),
                password: (*password).clone(),
                first_name: (*first_name).clone(),
                last_name: (*last_name).clone(),
            };
            let auth = auth.clone();
            let session = session.clone();
            let toast = toast.clone();
            let errors = errors.clone();
            let submitting = submitting.clone();
            spawn_local(async move {
                match session.controller().register(&request).await {
                    Ok(new_session) => {
                        toast.success("Registration Successful", "Welcome to Shopdeck!");
                        auth.dispatch(AuthAction::LoggedIn(new_session));
                    }
                    Err(err) => {
                        errors.set(server_field_errors(&err));
                        toast.error("Registration Failed", err.user_message());
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

    let strength = password_strength(&password);
    let input_class = "w-full px-3 py-2 border border-gray-300 dark:border-gray-600 rounded-lg bg-white dark:bg-gray-800 text-gray-900 dark:text-gray-100 focus:outline-none focus:ring-2 focus:ring-blue-500";

    html! {
        <form onsubmit={on_submit} class="space-y-4">
            <div class="grid grid-cols-2 gap-3">
                <div>
                    <label class="block text-sm font-medium text-gray-700 dark:text-gray-300 mb-1">
                        {"First name"}
                    </label>
                    <input value={(*first_name).clone()} oninput={bind(&first_name)} class={input_class} />
                    { field_message("firstName") }
                </div>
                <div>
                    <label class="block text-sm font-medium text-gray-700 dark:text-gray-300 mb-1">
                        {"Last name"}
                    </label>
                    <input value={(*last_name).clone()} oninput={bind(&last_name)} class={input_class} />
                    { field_message("lastName") }
                </div>
            </div>
            <div>
                <label class="block text-sm font-medium text-gray-700 dark:text-gray-300 mb-1">
                    {"Email"}
                </label>
                <input type="email" value={(*email).clone()} oninput={bind(&email)} class={input_class} />
                { field_message("email") }
            </div>
            <div>
                <label class="block text-sm font-medium text-gray-700 dark:text-gray-300 mb-1">
                    {"Password"}
                </label>
                <input type="password" value={(*password).clone()} oninput={bind(&password)} class={input_class} />
                if !password.is_empty() {
                    <div class="flex gap-1 mt-2">
                        { for (0..5).map(|step| {
                            let filled = step < strength;
                            let color = if filled { strength_color(strength) } else { "bg-gray-200 dark:bg-gray-700" };
                            html! { <div class={format!("h-1 flex-1 rounded {color}")}></div> }
                        })}
                    </div>
                }
                { field_message("password") }
            </div>
            <div>
                <label class="block text-sm font-medium text-gray-700 dark:text-gray-300 mb-1">
                    {"Confirm password"}
                </label>
                <input type="password" value={(*confirm_password).clone()} oninput={bind(&confirm_password)} class={input_class} />
                { field_message("confirmPassword") }
            </div>
            <button
                type="submit"
                disabled={*submitting}
                class="w-full py-2 px-4 bg-blue-600 hover:bg-blue-700 disabled:opacity-50 text-white font-medium rounded-lg transition-colors"
            >
                { if *submitting { "Creating account..." } else { "Create Account" } }
            </button>
        </form>
    }
}
