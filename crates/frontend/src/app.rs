//! Application shell

use crate::auth::{use_auth, use_session, AuthAction, AuthProvider, AuthScreen};
use crate::components::toast::use_toast;
use crate::components::{
    ChatPanel, CredentialSettings, ImageGallery, ListingsPanel, LoadingSpinner, ToastProvider,
};
use shopdeck_http::SessionPhase;
use yew::prelude::*;

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <ToastProvider>
            <AuthProvider>
                <AppContent />
            </AuthProvider>
        </ToastProvider>
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Tab {
    Listings,
    Images,
    Assistant,
    Settings,
}

impl Tab {
    fn label(self) -> &'static str {
        match self {
            Self::Listings => "Listings",
            Self::Images => "Images",
            Self::Assistant => "Assistant",
            Self::Settings => "Settings",
        }
    }
}

const TABS: [Tab; 4] = [Tab::Listings, Tab::Images, Tab::Assistant, Tab::Settings];

#[function_component(AppContent)]
fn app_content() -> Html {
    let auth = use_auth();
    let session = use_session();
    let toast = use_toast();
    let active_tab = use_state(|| Tab::Listings);

    let on_logout = {
        let auth = auth.clone();
        let session = session.clone();
        let toast = toast.clone();
        Callback::from(move |_| {
            session.controller().logout();
            auth.dispatch(AuthAction::LoggedOut);
            toast.success("Logged Out", "You have been successfully logged out.");
        })
    };

    match auth.phase {
        SessionPhase::Uninitialized | SessionPhase::Initializing => html! {
            <div class="min-h-screen bg-gray-100 dark:bg-gray-900 flex items-center justify-center">
                <LoadingSpinner text="Restoring your session..." />
            </div>
        },
        SessionPhase::Unauthenticated => html! {
            <div class="min-h-screen bg-gray-100 dark:bg-gray-900 flex items-center justify-center px-4">
                <AuthScreen />
            </div>
        },
        SessionPhase::Authenticated => {
            let greeting = auth
                .user
                .as_ref()
                .map(|user| format!("{} {}", user.first_name, user.last_name));
            html! {
                <div class="h-screen flex flex-col bg-white dark:bg-gray-900">
                    <div class="bg-gray-50 dark:bg-gray-800 border-b border-gray-200 dark:border-gray-700">
                        <div class="p-4 flex justify-between items-center">
                            <div class="flex items-center gap-3">
                                <h1 class="text-xl font-bold bg-gradient-to-r from-blue-600 to-purple-600 bg-clip-text text-transparent">
                                    {"Shopdeck"}
                                </h1>
                                <span class="text-sm text-gray-500 dark:text-gray-400">
                                    {"Seller Dashboard"}
                                </span>
                            </div>
                            <div class="flex items-center gap-3">
                                if let Some(greeting) = greeting {
                                    <span class="text-sm text-gray-600 dark:text-gray-300">
                                        {greeting}
                                    </span>
                                }
                                <button
                                    onclick={on_logout}
                                    class="px-4 py-2 text-sm font-medium text-gray-700 dark:text-gray-300 bg-gray-100 dark:bg-gray-700 hover:bg-gray-200 dark:hover:bg-gray-600 rounded-lg transition-colors"
                                >
                                    {"Logout"}
                                </button>
                            </div>
                        </div>
                        <div class="flex">
                            { for TABS.iter().map(|tab| {
                                let active_tab = active_tab.clone();
                                let tab = *tab;
                                let class = if *active_tab == tab {
                                    "px-6 py-3 text-sm font-medium text-blue-600 dark:text-blue-400 border-b-2 border-blue-600 dark:border-blue-400"
                                } else {
                                    "px-6 py-3 text-sm font-medium text-gray-600 dark:text-gray-400 hover:text-gray-900 dark:hover:text-gray-100"
                                };
                                html! {
                                    <button {class} onclick={Callback::from(move |_| active_tab.set(tab))}>
                                        {tab.label()}
                                    </button>
                                }
                            })}
                        </div>
                    </div>
                    <div class="flex-1 overflow-hidden">
                        {
                            match *active_tab {
                                Tab::Listings => html! { <ListingsPanel /> },
                                Tab::Images => html! { <ImageGallery /> },
                                Tab::Assistant => html! { <ChatPanel /> },
                                Tab::Settings => html! { <CredentialSettings /> },
                            }
                        }
                    </div>
                </div>
            }
        }
    }
}
