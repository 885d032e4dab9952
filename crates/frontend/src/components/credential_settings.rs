//! Marketplace credential settings

use crate::auth::use_session;
use crate::components::toast::use_toast;
use crate::components::LoadingSpinner;
use shopdeck_http::types::{MarketplaceCredential, SaveCredentialRequest};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[function_component(CredentialSettings)]
pub fn credential_settings() -> Html {
    let session = use_session();
    let toast = use_toast();
    let credentials = use_state(Vec::<MarketplaceCredential>::new);
    let loading = use_state(|| true);
    let marketplace = use_state(String::new);
    let api_key = use_state(String::new);
    let secret_key = use_state(String::new);
    let saving = use_state(|| false);

    {
        let session = session.clone();
        let credentials = credentials.clone();
        let loading = loading.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                // A seller without keys gets an empty list, not an error.
                if let Ok(stored) = session.client().marketplace_credentials().await {
                    credentials.set(stored);
                }
                loading.set(false);
            });
            || ()
        });
    }

    let bind = |state: &UseStateHandle<String>| {
        let state = state.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                state.set(input.value());
            }
        })
    };

    let on_save = {
        let session = session.clone();
        let toast = toast.clone();
        let credentials = credentials.clone();
        let marketplace = marketplace.clone();
        let api_key = api_key.clone();
        let secret_key = secret_key.clone();
        let saving = saving.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if marketplace.trim().is_empty() || api_key.trim().is_empty() {
                toast.error("Missing Fields", "Marketplace and API key are required.");
                return;
            }
            saving.set(true);

            let request = SaveCredentialRequest {
                marketplace: marketplace.trim().to_string(),
                api_key: api_key.trim().to_string(),
                secret_key: (!secret_key.trim().is_empty())
                    .then(|| secret_key.trim().to_string()),
                additional_fields: None,
            };
            let session = session.clone();
            let toast = toast.clone();
            let credentials = credentials.clone();
            let marketplace = marketplace.clone();
            let api_key = api_key.clone();
            let secret_key = secret_key.clone();
            let saving = saving.clone();
            spawn_local(async move {
                match session.client().save_marketplace_credential(&request).await {
                    Ok(saved) => {
                        let mut updated = (*credentials).clone();
                        updated.push(saved);
                        credentials.set(updated);
                        marketplace.set(String::new());
                        api_key.set(String::new());
                        secret_key.set(String::new());
                        toast.success("Credential Saved", "The marketplace key is ready to use.");
                    }
                    Err(err) => toast.error("Save Failed", err.user_message()),
                }
                saving.set(false);
            });
        })
    };

    let on_delete = {
        let session = session.clone();
        let toast = toast.clone();
        let credentials = credentials.clone();
        Callback::from(move |id: String| {
            let session = session.clone();
            let toast = toast.clone();
            let credentials = credentials.clone();
            spawn_local(async move {
                match session.client().delete_marketplace_credential(&id).await {
                    Ok(()) => credentials.set(
                        credentials
                            .iter()
                            .filter(|credential| credential.id != id)
                            .cloned()
                            .collect(),
                    ),
                    Err(err) => toast.error("Delete Failed", err.user_message()),
                }
            });
        })
    };

    let input_class = "w-full px-3 py-2 border border-gray-300 dark:border-gray-600 rounded-lg bg-white dark:bg-gray-800 text-gray-900 dark:text-gray-100 focus:outline-none focus:ring-2 focus:ring-blue-500";

    html! {
        <div class="p-6 max-w-2xl mx-auto space-y-8 overflow-y-auto h-full">
            <form onsubmit={on_save} class="space-y-4 bg-gray-50 dark:bg-gray-800 rounded-xl p-6 border border-gray-200 dark:border-gray-700">
                <h2 class="text-lg font-semibold text-gray-900 dark:text-gray-100">
                    {"Connect a marketplace"}
                </h2>
                <div>
                    <label class="block text-sm font-medium text-gray-700 dark:text-gray-300 mb-1">
                        {"Marketplace"}
                    </label>
                    <input value={(*marketplace).clone()} oninput={bind(&marketplace)} placeholder="mockmarket" class={input_class} />
                </div>
                <div>
                    <label class="block text-sm font-medium text-gray-700 dark:text-gray-300 mb-1">
                        {"API key"}
                    </label>
                    <input value={(*api_key).clone()} oninput={bind(&api_key)} class={input_class} />
                </div>
                <div>
                    <label class="block text-sm font-medium text-gray-700 dark:text-gray-300 mb-1">
                        {"Secret key (optional)"}
                    </label>
                    <input type="password" value={(*secret_key).clone()} oninput={bind(&secret_key)} class={input_class} />
                </div>
                <button
                    type="submit"
                    disabled={*saving}
                    class="py-2 px-4 bg-blue-600 hover:bg-blue-700 disabled:opacity-50 text-white font-medium rounded-lg"
                >
                    { if *saving { "Saving..." } else { "Save Credential" } }
                </button>
            </form>

            if *loading {
                <LoadingSpinner text="Loading credentials..." />
            } else if credentials.is_empty() {
                <p class="text-center text-gray-500 dark:text-gray-400">
                    {"No marketplace keys configured yet."}
                </p>
            } else {
                <div class="space-y-2">
                    { for credentials.iter().map(|credential| {
                        let on_delete = on_delete.clone();
                        let id = credential.id.clone();
                        // Only the key's tail is ever rendered.
                        let masked = format!(
                            "••••{}",
                            &credential.api_key[credential.api_key.len().saturating_sub(4)..]
                        );
                        html! {
                            <div key={credential.id.clone()} class="flex items-center justify-between bg-white dark:bg-gray-800 border border-gray-200 dark:border-gray-700 rounded-lg px-4 py-3">
                                <div>
                                    <p class="font-medium text-gray-900 dark:text-gray-100">
                                        {&credential.marketplace}
                                    </p>
                                    <p class="text-sm text-gray-500 dark:text-gray-400">{masked}</p>
                                </div>
                                <button
                                    onclick={Callback::from(move |_| on_delete.emit(id.clone()))}
                                    class="text-sm text-red-600 hover:text-red-700"
                                >
                                    {"Remove"}
                                </button>
                            </div>
                        }
                    })}
                </div>
            }
        </div>
    }
}
