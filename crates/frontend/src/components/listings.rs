//! Marketplace listings panel
//!
//! Shows the seller's products on the connected marketplace, fetched with
//! the per-marketplace key from Settings.

use crate::auth::use_session;
use crate::components::toast::use_toast;
use crate::components::LoadingSpinner;
use crate::config::ApiConfig;
use shopdeck_http::types::MarketplaceProduct;
use shopdeck_http::MarketplaceApiClient;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(Clone, PartialEq)]
enum Listings {
    Loading,
    NotConnected,
    Loaded(Vec<MarketplaceProduct>),
}

#[function_component(ListingsPanel)]
pub fn listings_panel() -> Html {
    let session = use_session();
    let toast = use_toast();
    let listings = use_state(|| Listings::Loading);

    {
        let session = session.clone();
        let toast = toast.clone();
        let listings = listings.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                let credentials = session
                    .client()
                    .marketplace_credentials()
                    .await
                    .unwrap_or_default();
                let Some(credential) = credentials
                    .iter()
                    .find(|credential| credential.marketplace == ApiConfig::DEFAULT_MARKETPLACE)
                else {
                    listings.set(Listings::NotConnected);
                    return;
                };

                let marketplace = match MarketplaceApiClient::from_credential(
                    ApiConfig::MARKETPLACE_API_URL,
                    credential,
                ) {
                    Ok(marketplace) => marketplace,
                    Err(err) => {
                        toast.error("Marketplace Unavailable", err.user_message());
                        listings.set(Listings::NotConnected);
                        return;
                    }
                };

                match marketplace.my_products().await {
                    Ok(response) => listings.set(Listings::Loaded(response.data)),
                    Err(err) => {
                        toast.error("Could Not Load Listings", err.user_message());
                        listings.set(Listings::Loaded(Vec::new()));
                    }
                }
            });
            || ()
        });
    }

    match &*listings {
        Listings::Loading => html! { <LoadingSpinner text="Loading listings..." /> },
        Listings::NotConnected => html! {
            <div class="p-10 text-center text-gray-500 dark:text-gray-400">
                <p class="font-medium text-gray-700 dark:text-gray-300 mb-1">
                    {"No marketplace connected"}
                </p>
                <p class="text-sm">
                    {"Add your marketplace API key under Settings to see your listings here."}
                </p>
            </div>
        },
        Listings::Loaded(products) if products.is_empty() => html! {
            <p class="text-center text-gray-500 dark:text-gray-400 py-10">
                {"No listings published yet."}
            </p>
        },
        Listings::Loaded(products) => html! {
            <div class="p-6 overflow-y-auto h-full">
                <table class="w-full text-left text-sm">
                    <thead>
                        <tr class="text-gray-500 dark:text-gray-400 border-b border-gray-200 dark:border-gray-700">
                            <th class="py-2 pr-4">{"Title"}</th>
                            <th class="py-2 pr-4">{"Price"}</th>
                            <th class="py-2 pr-4">{"Stock"}</th>
                            <th class="py-2">{"Status"}</th>
                        </tr>
                    </thead>
                    <tbody>
                        { for products.iter().map(|product| html! {
                            <tr key={product.id.clone()} class="border-b border-gray-100 dark:border-gray-800">
                                <td class="py-3 pr-4 text-gray-900 dark:text-gray-100">
                                    {product.display_name()}
                                </td>
                                <td class="py-3 pr-4 text-gray-700 dark:text-gray-300">
                                    { format!("${:.2}", product.price) }
                                </td>
                                <td class="py-3 pr-4 text-gray-700 dark:text-gray-300">
                                    { product.stock.map_or("—".to_string(), |stock| stock.to_string()) }
                                </td>
                                <td class="py-3">
                                    if product.is_active.unwrap_or(true) {
                                        <span class="text-green-600 dark:text-green-400">{"Active"}</span>
                                    } else {
                                        <span class="text-gray-400">{"Inactive"}</span>
                                    }
                                </td>
                            </tr>
                        })}
                    </tbody>
                </table>
            </div>
        },
    }
}
