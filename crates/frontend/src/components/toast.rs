//! Toast notifications
//!
//! Outcome notifications never block a state transition: callers dispatch
//! and move on, and each toast dismisses itself.

use gloo::timers::callback::Timeout;
use std::rc::Rc;
use yew::prelude::*;

const DISMISS_AFTER_MS: u32 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    Success,
    Error,
}

#[derive(Clone, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub title: String,
    pub message: Option<String>,
    pub variant: ToastVariant,
}

pub enum ToastAction {
    Push {
        title: String,
        message: Option<String>,
        variant: ToastVariant,
    },
    Dismiss(u32),
}

#[derive(Clone, PartialEq, Default)]
pub struct ToastContextData {
    pub toasts: Vec<Toast>,
    next_id: u32,
}

impl Reducible for ToastContextData {
    type Action = ToastAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            ToastAction::Push {
                title,
                message,
                variant,
            } => {
                let mut toasts = self.toasts.clone();
                toasts.push(Toast {
                    id: self.next_id,
                    title,
                    message,
                    variant,
                });
                Rc::new(Self {
                    toasts,
                    next_id: self.next_id + 1,
                })
            }
            ToastAction::Dismiss(id) => Rc::new(Self {
                toasts: self
                    .toasts
                    .iter()
                    .filter(|toast| toast.id != id)
                    .cloned()
                    .collect(),
                next_id: self.next_id,
            }),
        }
    }
}

pub type ToastContext = UseReducerHandle<ToastContextData>;

/// Handle with push helpers, cheap to clone into callbacks.
#[derive(Clone, PartialEq)]
pub struct ToastHandle(ToastContext);

impl ToastHandle {
    pub fn success(&self, title: impl Into<String>, message: impl Into<String>) {
        self.0.dispatch(ToastAction::Push {
            title: title.into(),
            message: Some(message.into()),
            variant: ToastVariant::Success,
        });
    }

    pub fn error(&self, title: impl Into<String>, message: impl Into<String>) {
        self.0.dispatch(ToastAction::Push {
            title: title.into(),
            message: Some(message.into()),
            variant: ToastVariant::Error,
        });
    }
}

#[derive(Properties, PartialEq)]
pub struct ToastProviderProps {
    pub children: Children,
}

#[function_component(ToastProvider)]
pub fn toast_provider(props: &ToastProviderProps) -> Html {
    let toasts = use_reducer(ToastContextData::default);

    html! {
        <ContextProvider<ToastContext> context={toasts.clone()}>
            {props.children.clone()}
            <div class="fixed bottom-4 right-4 z-50 flex flex-col gap-2 w-80">
                { for toasts.toasts.iter().map(|toast| html! {
                    <ToastItem key={toast.id} toast={toast.clone()} />
                })}
            </div>
        </ContextProvider<ToastContext>>
    }
}

#[derive(Properties, PartialEq)]
struct ToastItemProps {
    toast: Toast,
}

#[function_component(ToastItem)]
fn toast_item(props: &ToastItemProps) -> Html {
    let toasts = use_context::<ToastContext>()
        .expect("ToastContext not found. Make sure to wrap your component with ToastProvider");

    {
        let toasts = toasts.clone();
        let id = props.toast.id;
        use_effect_with((), move |_| {
            let handle = Timeout::new(DISMISS_AFTER_MS, move || {
                toasts.dispatch(ToastAction::Dismiss(id));
            });
            move || drop(handle)
        });
    }

    let on_close = {
        let toasts = toasts.clone();
        let id = props.toast.id;
        Callback::from(move |_| toasts.dispatch(ToastAction::Dismiss(id)))
    };

    let accent = match props.toast.variant {
        ToastVariant::Success => "border-l-4 border-green-500",
        ToastVariant::Error => "border-l-4 border-red-500",
    };

    html! {
        <div class={format!("bg-white dark:bg-gray-800 rounded-lg shadow-lg p-4 {accent}")}>
            <div class="flex justify-between items-start">
                <div>
                    <p class="font-medium text-gray-900 dark:text-gray-100">
                        {&props.toast.title}
                    </p>
                    if let Some(message) = &props.toast.message {
                        <p class="text-sm text-gray-600 dark:text-gray-400 mt-1">{message}</p>
                    }
                </div>
                <button
                    onclick={on_close}
                    class="text-gray-400 hover:text-gray-600 dark:hover:text-gray-200 ml-2"
                >
                    {"×"}
                </button>
            </div>
        </div>
    }
}

/// Hook to push toast notifications
#[hook]
pub fn use_toast() -> ToastHandle {
    ToastHandle(
        use_context::<ToastContext>()
            .expect("ToastContext not found. Make sure to wrap your component with ToastProvider"),
    )
}
