//! Global authentication context and provider

use crate::components::toast::use_toast;
use crate::config::{ApiConfig, AuthConfig};
use crate::storage::{BrowserClock, BrowserCredentialStore};
use gloo::events::EventListener;
use gloo::timers::callback::{Interval, Timeout};
use shopdeck_core::store::classify_change;
use shopdeck_core::{Session, StoreEvent, UserProfile};
use shopdeck_http::{ApiClient, SessionController, SessionError, SessionPhase};
use std::rc::Rc;
use std::sync::Arc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::StorageEvent;
use yew::prelude::*;

/// Auth state exposed to the UI.
#[derive(Clone, PartialEq, Default)]
pub struct AuthContextData {
    pub phase: SessionPhase,
    pub user: Option<UserProfile>,
    pub error: Option<String>,
}

/// Actions driving the auth reducer.
pub enum AuthAction {
    Initializing,
    SessionLoaded(Option<Session>),
    LoggedIn(Session),
    LoggedOut,
    SessionExpired,
    /// Another tab wrote or removed the access token.
    TokenChanged(Option<String>),
    /// Another tab wrote or removed the stored profile.
    ProfileChanged(Option<UserProfile>),
}

/// Authentication context
pub type AuthContext = UseReducerHandle<AuthContextData>;

impl Reducible for AuthContextData {
    type Action = AuthAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            AuthAction::Initializing => Rc::new(Self {
                phase: SessionPhase::Initializing,
                ..(*self).clone()
            }),
            AuthAction::SessionLoaded(Some(session)) | AuthAction::LoggedIn(session) => {
                Rc::new(Self {
                    phase: SessionPhase::Authenticated,
                    user: session.user,
                    error: None,
                })
            }
            AuthAction::SessionLoaded(None) | AuthAction::LoggedOut => Rc::new(Self {
                phase: SessionPhase::Unauthenticated,
                user: None,
                error: None,
            }),
            AuthAction::SessionExpired => Rc::new(Self {
                phase: SessionPhase::Unauthenticated,
                user: None,
                error: Some("Session expired. Please log in again.".to_string()),
            }),
            AuthAction::TokenChanged(token) => match token {
                // Logout elsewhere; mirror it without a reload.
                None => Rc::new(Self {
                    phase: SessionPhase::Unauthenticated,
                    user: None,
                    error: None,
                }),
                Some(_) => Rc::new(Self {
                    phase: SessionPhase::Authenticated,
                    ..(*self).clone()
                }),
            },
            AuthAction::ProfileChanged(user) => Rc::new(Self {
                user,
                ..(*self).clone()
            }),
        }
    }
}

/// Session controller shared through context. Constructed once at app
/// start; equality is identity so context updates don't cascade.
#[derive(Clone)]
pub struct SessionHandle(Rc<SessionController>);

impl PartialEq for SessionHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl SessionHandle {
    pub fn controller(&self) -> &SessionController {
        &self.0
    }

    pub fn client(&self) -> &ApiClient {
        self.0.client()
    }
}

fn default_base_url() -> String {
    let origin = web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default();
    format!("{origin}{}", ApiConfig::BASE_PATH)
}

/// Auth provider props
#[derive(Properties, PartialEq)]
pub struct AuthProviderProps {
    /// Overrides the API base URL; defaults to the page origin plus the
    /// versioned prefix.
    #[prop_or_default]
    pub base_url: Option<String>,
    pub children: Children,
}

/// Auth provider component
#[function_component(AuthProvider)]
pub fn auth_provider(props: &AuthProviderProps) -> Html {
    let auth = use_reducer(AuthContextData::default);
    let toast = use_toast();

    let session = use_memo(props.base_url.clone(), |base_url| {
        let client = ApiClient::builder()
            .base_url(base_url.clone().unwrap_or_else(default_base_url))
            .credential_store(Arc::new(BrowserCredentialStore::new()))
            .clock(Arc::new(BrowserClock))
            .build()
            .expect("failed to construct the API client");
        SessionHandle(Rc::new(SessionController::new(client)))
    });

    // Restore the persisted session on mount.
    {
        let auth = auth.clone();
        let session = session.clone();
        use_effect_with((), move |_| {
            auth.dispatch(AuthAction::Initializing);
            spawn_local(async move {
                let restored = session.controller().initialize().await;
                auth.dispatch(AuthAction::SessionLoaded(restored));
            });
            || ()
        });
    }

    // Proactive refresh while authenticated. The first check is delayed
    // to stay clear of initialization; both timers die with the effect.
    {
        let auth = auth.clone();
        let session = session.clone();
        let toast = toast.clone();
        use_effect_with(auth.phase, move |phase| {
            let cleanup: Box<dyn FnOnce()> = if *phase == SessionPhase::Authenticated {
                let check = move || {
                    let auth = auth.clone();
                    let session = session.clone();
                    let toast = toast.clone();
                    spawn_local(async move {
                        let outcome = session
                            .controller()
                            .refresh_if_needed(AuthConfig::EXPIRY_THRESHOLD_MS)
                            .await;
                        match outcome {
                            Ok(()) => {}
                            Err(SessionError::Expired) => {
                                toast.error("Session Expired", "Please log in again.");
                                auth.dispatch(AuthAction::SessionExpired);
                            }
                            Err(err) => {
                                log::warn!("background refresh failed, keeping session: {err}");
                            }
                        }
                    });
                };
                let first = Timeout::new(AuthConfig::INITIAL_CHECK_DELAY_MS, check.clone());
                let every = Interval::new(AuthConfig::REFRESH_CHECK_INTERVAL_MS, check);
                Box::new(move || {
                    drop(first);
                    drop(every);
                })
            } else {
                Box::new(|| ())
            };
            cleanup
        });
    }

    // Mirror credential changes made by other tabs.
    {
        let auth = auth.clone();
        use_effect_with((), move |_| {
            let window = gloo::utils::window();
            let listener = EventListener::new(&window, "storage", move |event| {
                let Some(event) = event.dyn_ref::<StorageEvent>() else {
                    return;
                };
                let Some(key) = event.key() else {
                    return;
                };
                let value = event.new_value();
                match classify_change(&key, value.as_deref()) {
                    Some(StoreEvent::AccessTokenChanged(token)) => {
                        auth.dispatch(AuthAction::TokenChanged(token));
                    }
                    Some(StoreEvent::ProfileChanged(user)) => {
                        auth.dispatch(AuthAction::ProfileChanged(user));
                    }
                    None => {}
                }
            });
            move || drop(listener)
        });
    }

    html! {
        <ContextProvider<AuthContext> context={auth}>
            <ContextProvider<SessionHandle> context={(*session).clone()}>
                {props.children.clone()}
            </ContextProvider<SessionHandle>>
        </ContextProvider<AuthContext>>
    }
}

/// Hook to use auth context
#[hook]
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>()
        .expect("AuthContext not found. Make sure to wrap your component with AuthProvider")
}

/// Hook to get the shared session controller
#[hook]
pub fn use_session() -> SessionHandle {
    use_context::<SessionHandle>()
        .expect("SessionHandle not found. Make sure to wrap your component with AuthProvider")
}

/// Hook to get the current user profile
#[hook]
pub fn use_auth_user() -> Option<UserProfile> {
    let auth = use_auth();
    auth.user.clone()
}

/// Hook to check if authenticated
#[hook]
pub fn use_is_authenticated() -> bool {
    let auth = use_auth();
    auth.phase == SessionPhase::Authenticated
}
