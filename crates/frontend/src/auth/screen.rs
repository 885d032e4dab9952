//! Combined login/register screen

use super::{LoginForm, RegisterForm};
use yew::prelude::*;

#[derive(Clone, Copy, PartialEq)]
enum Mode {
    Login,
    Register,
}

#[function_component(AuthScreen)]
pub fn auth_screen() -> Html {
    let mode = use_state(|| Mode::Login);

    let switch = |target: Mode| {
        let mode = mode.clone();
        Callback::from(move |_: MouseEvent| mode.set(target))
    };

    let tab_class = |active: bool| {
        if active {
            "flex-1 py-2 text-sm font-medium text-blue-600 dark:text-blue-400 border-b-2 border-blue-600 dark:border-blue-400"
        } else {
            "flex-1 py-2 text-sm font-medium text-gray-500 dark:text-gray-400 hover:text-gray-900 dark:hover:text-gray-100"
        }
    };

    html! {
        <div class="max-w-md w-full mx-auto">
            <div class="text-center mb-8">
                <h1 class="text-3xl font-bold text-gray-900 dark:text-white mb-2">
                    {"Shopdeck"}
                </h1>
                <p class="text-gray-500 dark:text-gray-400">
                    {"Publish your listings everywhere"}
                </p>
            </div>
            <div class="bg-white dark:bg-gray-800 rounded-2xl shadow-xl p-8 border border-gray-200 dark:border-gray-700">
                <div class="flex mb-6">
                    <button class={tab_class(*mode == Mode::Login)} onclick={switch(Mode::Login)}>
                        {"Sign In"}
                    </button>
                    <button class={tab_class(*mode == Mode::Register)} onclick={switch(Mode::Register)}>
                        {"Register"}
                    </button>
                </div>
                {
                    match *mode {
                        Mode::Login => html! { <LoginForm /> },
                        Mode::Register => html! { <RegisterForm /> },
                    }
                }
            </div>
        </div>
    }
}
