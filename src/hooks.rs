use log::warn;
use nice_things::api::ApiClient;
use nice_things::cache::{PlaylistCache, Snapshot};
use nice_things::config::STORAGE_KEY;
use nice_things::route::Route;
use nice_things::store::{BrowserStorage, KeyValueStore};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlInputElement;
use yew::prelude::*;

pub type AppCache = PlaylistCache<Rc<dyn KeyValueStore>>;

/// Services owned by the app root and shared with every view.
#[derive(Clone)]
pub struct AppContext {
    pub cache: Rc<AppCache>,
    pub api: Rc<ApiClient>,
}

impl PartialEq for AppContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cache, &other.cache) && Rc::ptr_eq(&self.api, &other.api)
    }
}

impl AppContext {
    pub fn new(store: Rc<dyn KeyValueStore>, api: ApiClient) -> Self {
        AppContext {
            cache: Rc::new(PlaylistCache::open(store, STORAGE_KEY)),
            api: Rc::new(api),
        }
    }

    /// localStorage plus the configured service URL.
    pub fn browser() -> Self {
        Self::new(Rc::new(BrowserStorage::local()), ApiClient::default())
    }
}

thread_local! {
    static SHARED_CONTEXT: RefCell<Option<AppContext>> = RefCell::new(None);
}

/// The one context for this page, built by `init` on first use.
pub fn shared_context(init: impl FnOnce() -> AppContext) -> AppContext {
    SHARED_CONTEXT.with(|slot| slot.borrow_mut().get_or_insert_with(init).clone())
}

#[hook]
pub fn use_app_context() -> AppContext {
    use_context::<AppContext>().unwrap_or_else(|| {
        warn!("No AppContext provider above this component; using the shared one");
        shared_context(AppContext::browser)
    })
}

/// Current playlist collection; re-renders whenever the cache publishes.
#[hook]
pub fn use_playlists() -> Snapshot {
    let ctx = use_app_context();
    let snapshot = use_state(|| ctx.cache.snapshot());
    {
        let snapshot = snapshot.clone();
        let cache = ctx.cache.clone();
        use_effect_with(ctx, move |_| {
            // pick up writes made between first render and subscription
            snapshot.set(cache.snapshot());
            let setter = snapshot.clone();
            let id = cache.subscribe(move |next| setter.set(next));
            move || cache.unsubscribe(id)
        });
    }
    (*snapshot).clone()
}

fn current_route() -> Route {
    let hash = gloo_utils::window().location().hash().unwrap_or_default();
    Route::from_hash(&hash)
}

/// Route from `location.hash`, plus a callback that navigates by setting it.
#[hook]
pub fn use_route() -> (Route, Callback<Route>) {
    let route = use_state(current_route);
    {
        let route = route.clone();
        use_effect_with((), move |_| {
            let window = gloo_utils::window();
            let listener = Closure::<dyn Fn()>::new(move || route.set(current_route()));
            let callback: &js_sys::Function = listener.as_ref().unchecked_ref();
            if let Err(err) = window.add_event_listener_with_callback("hashchange", callback) {
                warn!("Could not listen for navigation: {:?}", err);
            }
            move || {
                let callback: &js_sys::Function = listener.as_ref().unchecked_ref();
                let _ = window.remove_event_listener_with_callback("hashchange", callback);
            }
        });
    }

    let navigate = Callback::from(|target: Route| {
        if let Err(err) = gloo_utils::window().location().set_hash(&target.to_hash()) {
            warn!("Navigation to {:?} failed: {:?}", target, err);
        }
    });
    ((*route).clone(), navigate)
}

/// Holds the state and callbacks for a validated input field.
#[derive(Clone)]
pub struct ValidatedInput<T: Clone + PartialEq + 'static> {
    /// The current text content of the input field.
    pub text: String,
    /// The last value that passed validation.
    pub value: T,
    /// An optional error message if validation failed.
    pub error: Option<String>,
    /// Callback for the text input's `oninput` event. Updates the internal text state.
    pub on_text_input: Callback<InputEvent>,
    /// Callback to trigger parsing and validation of the current text.
    /// Typically used with `onchange` or on submit.
    pub on_commit: Callback<()>,
    /// Callback to programmatically set the value.
    /// This will also update the text representation and clear any errors.
    pub set_value: Callback<T>,
}

impl<T: Clone + PartialEq + 'static> ValidatedInput<T> {
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// Custom hook to manage state for a validated input field.
#[hook]
pub fn use_validated_input<T: Clone + PartialEq + std::fmt::Display + 'static>(
    initial_value: T,
    parse_and_validate: Rc<dyn Fn(&str) -> Result<T, String>>,
) -> ValidatedInput<T> {
    let value_handle: UseStateHandle<T> = use_state(|| initial_value.clone());
    let text_handle: UseStateHandle<String> = use_state(|| initial_value.to_string());
    let error_handle: UseStateHandle<Option<String>> = use_state(|| None::<String>);

    let on_text_input = {
        let text_setter = text_handle.clone();
        let error_setter = error_handle.clone();
        let parse_fn = parse_and_validate.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let text = input.value();
            // clear a stale error as soon as the text becomes valid
            if error_setter.is_some() && parse_fn(&text).is_ok() {
                error_setter.set(None);
            }
            text_setter.set(text);
        })
    };

    let on_commit = {
        let current_text = text_handle.clone();
        let value_setter = value_handle.clone();
        let text_setter = text_handle.clone();
        let error_setter = error_handle.clone();
        let parse_fn = parse_and_validate.clone();

        Callback::from(move |_| match parse_fn(&current_text) {
            Ok(parsed) => {
                text_setter.set(parsed.to_string()); // canonical form
                value_setter.set(parsed);
                error_setter.set(None);
            }
            Err(err_msg) => error_setter.set(Some(err_msg)),
        })
    };

    let set_value = {
        let value_setter = value_handle.clone();
        let text_setter = text_handle.clone();
        let error_setter = error_handle.clone();
        Callback::from(move |new_val: T| {
            text_setter.set(new_val.to_string());
            value_setter.set(new_val);
            error_setter.set(None);
        })
    };

    ValidatedInput {
        text: (*text_handle).clone(),
        value: (*value_handle).clone(),
        error: (*error_handle).clone(),
        on_text_input,
        on_commit,
        set_value,
    }
}
