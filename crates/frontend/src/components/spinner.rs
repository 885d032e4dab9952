//! Loading spinner component

use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct SpinnerProps {
    #[prop_or_default]
    pub text: Option<String>,
    /// Render a compact inline spinner instead of the padded block.
    #[prop_or_default]
    pub inline: bool,
}

#[function_component(LoadingSpinner)]
pub fn loading_spinner(props: &SpinnerProps) -> Html {
    let wheel = "border-4 border-gray-200 dark:border-gray-700 border-t-blue-600 dark:border-t-blue-400 rounded-full animate-spin";

    if props.inline {
        return html! {
            <span class={format!("inline-block w-4 h-4 align-middle {wheel}")}></span>
        };
    }

    html! {
        <div class="flex flex-col items-center justify-center p-10 gap-4">
            <div class={format!("w-10 h-10 {wheel}")}></div>
            if let Some(text) = &props.text {
                <p class="text-gray-600 dark:text-gray-400 text-sm">{text}</p>
            }
        </div>
    }
}
