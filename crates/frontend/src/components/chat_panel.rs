//! AI assistant chat panel
//!
//! The user's turn is appended optimistically; if the send fails, that
//! turn is rolled back and the draft restored so nothing is silently
//! lost.

use crate::auth::use_session;
use crate::components::toast::use_toast;
use crate::services::AiService;
use shopdeck_http::types::{ChatRole, ChatTurn};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlTextAreaElement;
use yew::prelude::*;

#[derive(Clone, PartialEq)]
struct Entry {
    id: u32,
    turn: ChatTurn,
}

#[function_component(ChatPanel)]
pub fn chat_panel() -> Html {
    let session = use_session();
    let toast = use_toast();
    let entries = use_state(Vec::<Entry>::new);
    let next_id = use_state(|| 0u32);
    let draft = use_state(String::new);
    let conversation_id = use_state(|| None::<String>);
    let sending = use_state(|| false);

    let send = {
        let session = session.clone();
        let toast = toast.clone();
        let entries = entries.clone();
        let next_id = next_id.clone();
        let draft = draft.clone();
        let conversation_id = conversation_id.clone();
        let sending = sending.clone();
        Callback::from(move |_: ()| {
            let message = draft.trim().to_string();
            if message.is_empty() || *sending {
                return;
            }

            let history: Vec<ChatTurn> =
                entries.iter().map(|entry| entry.turn.clone()).collect();
            let user_entry_id = *next_id;

            // Optimistic append of the user's turn. Both the pre-append
            // list (for rollback) and the appended one (for the reply) are
            // carried into the async block; the state handle's own view is
            // a stale snapshot by the time the response lands.
            let before_send = (*entries).clone();
            let mut with_user_turn = before_send.clone();
            with_user_turn.push(Entry {
                id: user_entry_id,
                turn: ChatTurn {
                    role: ChatRole::User,
                    content: message.clone(),
                },
            });
            entries.set(with_user_turn.clone());
            next_id.set(user_entry_id + 2);
            draft.set(String::new());
            sending.set(true);

            let service = AiService::new(session.client().clone());
            let toast = toast.clone();
            let entries = entries.clone();
            let draft = draft.clone();
            let conversation_id = conversation_id.clone();
            let sending = sending.clone();
            spawn_local(async move {
                match service
                    .send_message(&message, (*conversation_id).clone(), history)
                    .await
                {
                    Ok(response) => {
                        if response.conversation_id.is_some() {
                            conversation_id.set(response.conversation_id);
                        }
                        let mut updated = with_user_turn;
                        updated.push(Entry {
                            id: user_entry_id + 1,
                            turn: ChatTurn {
                                role: ChatRole::Assistant,
                                content: response.response,
                            },
                        });
                        entries.set(updated);
                    }
                    Err(err) => {
                        // Roll back the optimistic turn and give the text
                        // back to the composer.
                        entries.set(before_send);
                        draft.set(message);
                        toast.error("Message Failed", err.user_message());
                    }
                }
                sending.set(false);
            });
        })
    };

    let on_input = {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(area) = e.target_dyn_into::<HtmlTextAreaElement>() {
                draft.set(area.value());
            }
        })
    };

    let on_keydown = {
        let send = send.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" && !e.shift_key() {
                e.prevent_default();
                send.emit(());
            }
        })
    };

    let on_click = {
        let send = send.clone();
        Callback::from(move |_: MouseEvent| send.emit(()))
    };

    html! {
        <div class="flex flex-col h-full">
            <div class="flex-1 overflow-y-auto p-6 space-y-4">
                if entries.is_empty() {
                    <p class="text-center text-gray-500 dark:text-gray-400 py-10">
                        {"Ask for listing titles, descriptions or SEO keywords."}
                    </p>
                }
                { for entries.iter().map(|entry| {
                    let (wrapper, bubble) = match entry.turn.role {
                        ChatRole::User => (
                            "flex justify-end",
                            "bg-blue-600 text-white rounded-2xl rounded-br-sm px-4 py-2 max-w-[80%]",
                        ),
                        ChatRole::Assistant => (
                            "flex justify-start",
                            "bg-gray-100 dark:bg-gray-700 text-gray-900 dark:text-gray-100 rounded-2xl rounded-bl-sm px-4 py-2 max-w-[80%]",
                        ),
                    };
                    html! {
                        <div key={entry.id} class={wrapper}>
                            <div class={bubble}>
                                <p class="whitespace-pre-wrap text-sm">{&entry.turn.content}</p>
                            </div>
                        </div>
                    }
                })}
                if *sending {
                    <p class="text-sm text-gray-400">{"Assistant is thinking..."}</p>
                }
            </div>
            <div class="border-t border-gray-200 dark:border-gray-700 p-4 flex gap-2">
                <textarea
                    value={(*draft).clone()}
                    oninput={on_input}
                    onkeydown={on_keydown}
                    rows="1"
                    placeholder="Message the assistant..."
                    class="flex-1 resize-none px-3 py-2 border border-gray-300 dark:border-gray-600 rounded-lg bg-white dark:bg-gray-800 text-gray-900 dark:text-gray-100 focus:outline-none focus:ring-2 focus:ring-blue-500"
                />
                <button
                    onclick={on_click}
                    disabled={*sending}
                    class="px-4 py-2 bg-blue-600 hover:bg-blue-700 disabled:opacity-50 text-white rounded-lg font-medium"
                >
                    {"Send"}
                </button>
            </div>
        </div>
    }
}
