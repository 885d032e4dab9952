//! Image upload widget

use crate::auth::use_session;
use crate::components::toast::use_toast;
use crate::services::ImageService;
use shopdeck_http::client::images::UploadImage;
use shopdeck_http::types::ImageUploadResponse;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct UploadZoneProps {
    /// Fired once per image the server accepted.
    pub on_uploaded: Callback<ImageUploadResponse>,
}

#[function_component(UploadZone)]
pub fn upload_zone(props: &UploadZoneProps) -> Html {
    let session = use_session();
    let toast = use_toast();
    let busy = use_state(|| false);

    let on_change = {
        let session = session.clone();
        let toast = toast.clone();
        let busy = busy.clone();
        let on_uploaded = props.on_uploaded.clone();
        Callback::from(move |e: Event| {
            let Some(input) = e.target_dyn_into::<HtmlInputElement>() else {
                return;
            };
            let Some(file_list) = input.files() else {
                return;
            };
            let files: Vec<web_sys::File> =
                (0..file_list.length()).filter_map(|i| file_list.item(i)).collect();
            input.set_value("");
            if files.is_empty() {
                return;
            }
            busy.set(true);

            let service = ImageService::new(session.client().clone());
            let toast = toast.clone();
            let busy = busy.clone();
            let on_uploaded = on_uploaded.clone();
            spawn_local(async move {
                let mut uploads = Vec::new();
                for file in files {
                    let name = file.name();
                    let content_type = file.type_();
                    let size = file.size() as u64;
                    if let Err(message) = ImageService::validate_file(&name, &content_type, size)
                    {
                        toast.error("Upload Rejected", message);
                        continue;
                    }
                    match gloo_file::futures::read_as_bytes(&gloo_file::File::from(file)).await {
                        Ok(bytes) => uploads.push(UploadImage {
                            file_name: name,
                            content_type,
                            bytes,
                            tags: Vec::new(),
                        }),
                        Err(err) => toast.error("Upload Failed", format!("{name}: {err}")),
                    }
                }

                let (succeeded, failed) = service.upload_many(uploads).await;
                for response in succeeded {
                    on_uploaded.emit(response);
                }
                if !failed.is_empty() {
                    toast.error(
                        "Upload Failed",
                        format!("Could not upload {}", failed.join(", ")),
                    );
                }
                busy.set(false);
            });
        })
    };

    html! {
        <label class="block border-2 border-dashed border-gray-300 dark:border-gray-600 rounded-xl p-8 text-center cursor-pointer hover:border-blue-400 transition-colors">
            <input
                type="file"
                accept="image/jpeg,image/png,image/webp"
                multiple=true
                onchange={on_change}
                class="hidden"
                disabled={*busy}
            />
            if *busy {
                <p class="text-gray-500 dark:text-gray-400">{"Uploading..."}</p>
            } else {
                <p class="text-gray-700 dark:text-gray-300 font-medium">
                    {"Click to upload product photos"}
                </p>
                <p class="text-sm text-gray-500 dark:text-gray-400 mt-1">
                    {"JPG, PNG or WebP, up to 10 MB each"}
                </p>
            }
        </label>
    }
}
