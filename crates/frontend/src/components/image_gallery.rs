//! Image gallery panel
//!
//! Lists the seller's uploads with the upload zone on top. Deletes are
//! optimistic: the tile disappears immediately and is restored if the
//! server refuses.

use crate::auth::use_session;
use crate::components::toast::use_toast;
use crate::components::upload_zone::UploadZone;
use crate::components::LoadingSpinner;
use crate::services::ImageService;
use shopdeck_http::types::{ImageMetadata, ImageUploadResponse};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

const PAGE_SIZE: u32 = 24;

#[function_component(ImageGallery)]
pub fn image_gallery() -> Html {
    let session = use_session();
    let toast = use_toast();
    let images = use_state(Vec::<ImageMetadata>::new);
    let total = use_state(|| 0u64);
    let loading = use_state(|| true);

    let reload = {
        let session = session.clone();
        let toast = toast.clone();
        let images = images.clone();
        let total = total.clone();
        let loading = loading.clone();
        Callback::from(move |_: ()| {
            let service = ImageService::new(session.client().clone());
            let toast = toast.clone();
            let images = images.clone();
            let total = total.clone();
            let loading = loading.clone();
            loading.set(true);
            spawn_local(async move {
                match service.list(1, PAGE_SIZE).await {
                    Ok(response) => {
                        images.set(response.images);
                        total.set(response.total_count);
                    }
                    Err(err) => toast.error("Could Not Load Images", err.user_message()),
                }
                loading.set(false);
            });
        })
    };

    {
        let reload = reload.clone();
        use_effect_with((), move |_| {
            reload.emit(());
            || ()
        });
    }

    let on_uploaded = {
        let reload = reload.clone();
        // Reload rather than patching local state: the server attaches
        // metadata (CDN URL, enhancement) the upload response may lack.
        Callback::from(move |_: ImageUploadResponse| reload.emit(()))
    };

    let on_delete = {
        let session = session.clone();
        let toast = toast.clone();
        let images = images.clone();
        Callback::from(move |image_id: String| {
            let previous = (*images).clone();
            images.set(
                previous
                    .iter()
                    .filter(|image| image.image_id != image_id)
                    .cloned()
                    .collect(),
            );

            let service = ImageService::new(session.client().clone());
            let toast = toast.clone();
            let images = images.clone();
            spawn_local(async move {
                if let Err(err) = service.delete(&image_id).await {
                    toast.error("Delete Failed", err.user_message());
                    images.set(previous);
                }
            });
        })
    };

    html! {
        <div class="p-6 space-y-6 overflow-y-auto h-full">
            <UploadZone on_uploaded={on_uploaded} />
            if *loading {
                <LoadingSpinner text="Loading images..." />
            } else if images.is_empty() {
                <p class="text-center text-gray-500 dark:text-gray-400 py-10">
                    {"No images yet. Upload your first product photo above."}
                </p>
            } else {
                <>
                    <p class="text-sm text-gray-500 dark:text-gray-400">
                        { format!("{} image(s)", *total) }
                    </p>
                    <div class="grid grid-cols-2 sm:grid-cols-3 lg:grid-cols-4 gap-4">
                        { for images.iter().map(|image| {
                            let on_delete = on_delete.clone();
                            let image_id = image.image_id.clone();
                            html! {
                                <div key={image.image_id.clone()} class="group relative rounded-lg overflow-hidden border border-gray-200 dark:border-gray-700">
                                    <img
                                        src={image.cloud_front_url.clone()}
                                        alt={image.original_name.clone()}
                                        class="w-full h-36 object-cover"
                                    />
                                    <div class="p-2">
                                        <p class="text-xs text-gray-600 dark:text-gray-300 truncate">
                                            {&image.original_name}
                                        </p>
                                    </div>
                                    <button
                                        onclick={Callback::from(move |_| on_delete.emit(image_id.clone()))}
                                        class="absolute top-2 right-2 hidden group-hover:block bg-red-600 hover:bg-red-700 text-white text-xs px-2 py-1 rounded"
                                    >
                                        {"Delete"}
                                    </button>
                                </div>
                            }
                        })}
                    </div>
                </>
            }
        </div>
    }
}
