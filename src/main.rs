//! Main module for the Nice Things playlist app using Yew.
//! Wires the shared cache/client context, hash navigation and the three views.

use log::{error, info};
use nice_things::config::{API_BASE_URL, LOG_LEVEL, RECENT_PLAYLIST_COUNT};
use nice_things::defaults::DEFAULT_DURATION_MINUTES;
use nice_things::library::{generate_and_keep, open_playlist, Lookup, PlaylistSource};
use nice_things::route::Route;
use nice_things::share::playlist_page_url;
use nice_things::utils::{collection_summary, format_minutes, validate_activity, validate_duration};
use nice_things::{logging, Playlist, PlaylistRequest, Vibe};
use std::rc::Rc;
use web_sys::HtmlInputElement;
use yew::prelude::*;

mod components;
mod hooks;

use components::{
    open_external, render_tracks, DurationSlider, PlaylistSummaryCard, ShareDialog, VibeSelect,
};
use hooks::{
    shared_context, use_app_context, use_playlists, use_route, use_validated_input, AppContext,
};

// ──────────────────────────────────────────────────────────────────────────────
// Generator

#[derive(Properties, PartialEq)]
struct GeneratorFormProps {
    on_generated: Callback<Playlist>,
}

#[function_component(GeneratorForm)]
fn generator_form(props: &GeneratorFormProps) -> Html {
    let ctx = use_app_context();
    let activity = use_validated_input(String::new(), Rc::new(validate_activity));
    let duration = use_validated_input(DEFAULT_DURATION_MINUTES, Rc::new(validate_duration));
    let vibe = use_state(Vibe::default);
    let is_generating = use_state(|| false);
    let error_message = use_state(|| None::<String>);

    let onsubmit = {
        let ctx = ctx.clone();
        let activity = activity.clone();
        let duration = duration.clone();
        let vibe = vibe.clone();
        let is_generating = is_generating.clone();
        let error_message = error_message.clone();
        let on_generated = props.on_generated.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *is_generating {
                return;
            }

            // validate the raw texts: committed values may lag one render behind
            let activity_text = match validate_activity(&activity.text) {
                Ok(text) => text,
                Err(_) => {
                    activity.on_commit.emit(());
                    return;
                }
            };
            let minutes = match validate_duration(&duration.text) {
                Ok(minutes) => minutes,
                Err(_) => {
                    duration.on_commit.emit(());
                    return;
                }
            };
            let request = match PlaylistRequest::new(&activity_text, minutes, vibe.value()) {
                Ok(request) => request,
                Err(err) => {
                    error_message.set(Some(err.to_string()));
                    return;
                }
            };

            is_generating.set(true);
            error_message.set(None);

            let cache = ctx.cache.clone();
            let api = ctx.api.clone();
            let activity = activity.clone();
            let duration = duration.clone();
            let vibe = vibe.clone();
            let is_generating = is_generating.clone();
            let error_message = error_message.clone();
            let on_generated = on_generated.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match generate_and_keep(&*cache, &*api, &request).await {
                    Ok(playlist) => {
                        activity.set_value.emit(String::new());
                        duration.set_value.emit(DEFAULT_DURATION_MINUTES);
                        vibe.set(Vibe::default());
                        on_generated.emit(playlist);
                    }
                    Err(err) => {
                        error!("Failed to generate playlist: {}", err);
                        error_message.set(Some(err.to_string()));
                    }
                }
                is_generating.set(false);
            });
        })
    };

    let on_slider = duration.set_value.clone();
    let on_vibe = {
        let vibe = vibe.clone();
        Callback::from(move |v: Vibe| vibe.set(v))
    };

    html! {
        <div class="card generator">
            <div class="card-header">
                <h2 class="card-title">{ "Create Your Playlist" }</h2>
                <p class="card-description">
                    { "Tell us what you're up to, how long you're doing it, and the vibe you're feeling." }
                </p>
            </div>
            <form {onsubmit}>
                <div class="form-group">
                    <label for="activity">{ "What activity are you doing & the type of music?" }</label>
                    <input
                        type="text"
                        id="activity"
                        value={activity.text.clone()}
                        class={if activity.is_valid() { "" } else { "invalid" }}
                        placeholder="eg.. running with electronic, coding with classical, cooking with EDM."
                        oninput={activity.on_text_input.clone()}
                        onblur={activity.on_commit.reform(|_: FocusEvent| ())}
                    />
                    if let Some(ref err) = activity.error {
                        <div class="input-error">{ err }</div>
                    }
                </div>

                <DurationSlider minutes={duration.value} oninput={on_slider} />
                <div class="form-group inline">
                    <label for="duration-minutes">{ "Minutes:" }</label>
                    <input
                        type="number"
                        id="duration-minutes"
                        value={duration.text.clone()}
                        class={if duration.is_valid() { "" } else { "invalid" }}
                        oninput={duration.on_text_input.clone()}
                        onchange={duration.on_commit.reform(|_: Event| ())}
                    />
                    if let Some(ref err) = duration.error {
                        <div class="input-error">{ err }</div>
                    }
                </div>

                <VibeSelect value={*vibe} onchange={on_vibe} />

                <button type="submit" class="btn-primary" disabled={*is_generating}>
                    { if *is_generating { "Generating Your Playlist..." } else { "Generate Playlist" } }
                </button>

                if let Some(ref err) = *error_message {
                    <div class="current-error">{ err }</div>
                }
            </form>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct PageProps {
    navigate: Callback<Route>,
}

#[function_component(GeneratorPage)]
fn generator_page(props: &PageProps) -> Html {
    let ctx = use_app_context();
    // subscribing keeps the recent list fresh
    let playlists = use_playlists();
    let recent = ctx.cache.get_recent(RECENT_PLAYLIST_COUNT);

    let on_generated = props
        .navigate
        .reform(|playlist: Playlist| Route::Playlist(playlist.id));
    let on_open = props.navigate.reform(Route::Playlist);
    let view_all = props.navigate.reform(|_: MouseEvent| Route::Collection);

    html! {
        <div class="page generator-page">
            <GeneratorForm {on_generated} />
            if !recent.is_empty() {
                <section class="recent">
                    <div class="section-header">
                        <h2>{ "Recent Playlists" }</h2>
                        <button class="btn-ghost small" onclick={view_all}>
                            { format!("View all ({})", playlists.len()) }
                        </button>
                    </div>
                    <div class="playlist-grid">
                        { for recent.into_iter().map(|playlist| html! {
                            <PlaylistSummaryCard key={playlist.id.clone()} playlist={playlist.clone()} on_open={on_open.clone()} />
                        }) }
                    </div>
                </section>
            }
        </div>
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Collection

#[function_component(CollectionPage)]
fn collection_page(props: &PageProps) -> Html {
    let ctx = use_app_context();
    let playlists = use_playlists();
    let search = use_state(String::new);
    let remove_error = use_state(|| None::<String>);

    let on_search = {
        let search = search.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            search.set(input.value());
        })
    };
    let clear_search = {
        let search = search.clone();
        Callback::from(move |_: MouseEvent| search.set(String::new()))
    };
    let on_remove = {
        let cache = ctx.cache.clone();
        let remove_error = remove_error.clone();
        Callback::from(move |id: String| match cache.remove(&id) {
            Ok(_) => remove_error.set(None),
            Err(err) => remove_error.set(Some(format!("Could not remove playlist: {}", err))),
        })
    };
    let on_open = props.navigate.reform(Route::Playlist);
    let back = props.navigate.reform(|_: MouseEvent| Route::Generator);

    let filtered: Vec<Playlist> = playlists
        .iter()
        .filter(|p| p.matches(&search))
        .cloned()
        .collect();

    html! {
        <div class="page collection-page">
            <div class="section-header">
                <button class="btn-secondary small" onclick={back.clone()}>{ "Back to Generator" }</button>
                <h2>{ "My Playlists" }</h2>
                <p class="muted">{ collection_summary(playlists.len()) }</p>
            </div>

            if let Some(ref err) = *remove_error {
                <div class="current-error">{ err }</div>
            }

            if playlists.is_empty() {
                <div class="card empty-state">
                    <p>{ "You haven't generated any playlists yet. Create your first playlist to get started!" }</p>
                    <button class="btn-primary" onclick={back}>{ "Create Playlist" }</button>
                </div>
            } else {
                <div class="card search">
                    <input
                        type="search"
                        placeholder="Search by name, activity, or vibe..."
                        value={(*search).clone()}
                        oninput={on_search}
                    />
                </div>
                if filtered.is_empty() {
                    <div class="card no-match">
                        <p>{ format!("No playlists match your search for \"{}\"", *search) }</p>
                        <button class="btn-secondary" onclick={clear_search}>{ "Clear Search" }</button>
                    </div>
                } else {
                    <div class="playlist-grid">
                        { for filtered.into_iter().map(|playlist| html! {
                            <PlaylistSummaryCard
                                key={playlist.id.clone()}
                                playlist={playlist.clone()}
                                on_open={on_open.clone()}
                                on_remove={Some(on_remove.clone())}
                            />
                        }) }
                    </div>
                }
            }
        </div>
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Playlist detail

#[derive(Clone, PartialEq)]
enum DetailState {
    Loading,
    Ready(Playlist, PlaylistSource),
    NotFound,
    Failed(String),
}

#[derive(Properties, PartialEq)]
struct PlaylistPageProps {
    id: String,
    navigate: Callback<Route>,
}

fn current_page_url(id: &str) -> String {
    let href = gloo_utils::window().location().href().unwrap_or_default();
    let base = href.split('#').next().unwrap_or_default();
    playlist_page_url(base, id)
}

fn not_found_view(reason: String, home: Callback<MouseEvent>) -> Html {
    html! {
        <div class="page detail-page not-found">
            <h2>{ "Playlist not found" }</h2>
            <p>{ reason }</p>
            <button class="btn-secondary" onclick={home}>{ "Back to Generator" }</button>
        </div>
    }
}

#[function_component(PlaylistPage)]
fn playlist_page(props: &PlaylistPageProps) -> Html {
    let ctx = use_app_context();
    // (id, state) so a slow lookup for a previous id is never shown
    let detail = use_state(|| (props.id.clone(), DetailState::Loading));

    {
        let detail = detail.clone();
        let cache = ctx.cache.clone();
        let api = ctx.api.clone();
        use_effect_with(props.id.clone(), move |id| {
            let id = id.clone();
            detail.set((id.clone(), DetailState::Loading));
            wasm_bindgen_futures::spawn_local(async move {
                let state = match open_playlist(&*cache, &*api, &id).await {
                    Ok(Lookup::Found { playlist, source }) => DetailState::Ready(playlist, source),
                    Ok(Lookup::NotFound) => DetailState::NotFound,
                    Err(err) => {
                        error!("Failed to load playlist {}: {}", id, err);
                        DetailState::Failed(err.to_string())
                    }
                };
                detail.set((id, state));
            });
        });
    }

    let home = props.navigate.reform(|_: MouseEvent| Route::Generator);
    let (detail_id, state) = &*detail;
    let state = if *detail_id == props.id {
        state.clone()
    } else {
        DetailState::Loading
    };

    match state {
        DetailState::Loading => html! {
            <div class="page detail-page loading">
                <p>{ "Fetching playlist details..." }</p>
            </div>
        },
        DetailState::NotFound => not_found_view("This playlist doesn't exist.".to_string(), home),
        DetailState::Failed(msg) => not_found_view(
            format!("This playlist could not be loaded from the server. {}", msg),
            home,
        ),
        DetailState::Ready(playlist, source) => {
            let page_url = current_page_url(&playlist.id);
            let spotify = {
                let url = playlist.spotify_url.clone();
                Callback::from(move |_: MouseEvent| open_external(&url))
            };
            html! {
                <div class="page detail-page">
                    <div class="section-header">
                        <button class="btn-secondary small" onclick={home}>{ "Create New Playlist" }</button>
                    </div>

                    if source == PlaylistSource::Shared {
                        <div class="card notice">
                            <p>{ "This playlist has been automatically added to your collection." }</p>
                        </div>
                    }

                    <div class="card overview">
                        if !playlist.image_url.is_empty() {
                            <img class="cover large" src={playlist.image_url.clone()} alt={format!("Cover for {}", playlist.name)} />
                        }
                        <h2 class="card-title">{ &playlist.name }</h2>
                        <p class="card-description">{ &playlist.description }</p>
                        <div class="badges">
                            <span class="badge activity">{ &playlist.activity }</span>
                            <span class={Vibe::badge_class(&playlist.vibe)}>{ &playlist.vibe }</span>
                            <span class="badge">
                                { format!("{} tracks • {}", playlist.track_count(), format_minutes(playlist.duration)) }
                            </span>
                        </div>
                        <div class="card-actions">
                            <button class="btn-primary" onclick={spotify}>{ "Open in Spotify" }</button>
                            <ShareDialog playlist_name={playlist.name.clone()} page_url={page_url} />
                        </div>
                    </div>

                    { render_tracks(&playlist.tracks) }
                </div>
            }
        }
    }
}

// ──────────────────────────────────────────────────────────────────────────────

/// Header navigation plus the view for the current route.
#[function_component(Main)]
fn main_component() -> Html {
    let (route, navigate) = use_route();

    let nav = |target: Route, label: &'static str| {
        let active = matches!(
            (&route, &target),
            (Route::Generator, Route::Generator) | (Route::Collection, Route::Collection)
        );
        let onclick = navigate.reform(move |_: MouseEvent| target.clone());
        html! {
            <button class={classes!("nav-link", active.then_some("active"))} {onclick}>{ label }</button>
        }
    };

    html! {
        <div class="container">
            <header class="app-header">
                <h1 class="brand">{ "Nice Things" }</h1>
                <nav>
                    { nav(Route::Generator, "Create") }
                    { nav(Route::Collection, "My Playlists") }
                </nav>
            </header>
            <main>
                { match route {
                    Route::Generator => html! { <GeneratorPage navigate={navigate.clone()} /> },
                    Route::Collection => html! { <CollectionPage navigate={navigate.clone()} /> },
                    Route::Playlist(id) => html! { <PlaylistPage {id} navigate={navigate.clone()} /> },
                } }
            </main>
            <footer class="app-footer">
                <p>{ "Generate Spotify playlists for any activity and vibe." }</p>
            </footer>
        </div>
    }
}

/// App wrapper owning the playlist cache and API client.
#[function_component]
pub fn App() -> Html {
    let context = shared_context(AppContext::browser);

    html! {
        <ContextProvider<AppContext> {context}>
            <Main />
        </ContextProvider<AppContext>>
    }
}

/// Entry point: installs logging and renders the App component.
fn main() {
    console_error_panic_hook::set_once();
    logging::init(LOG_LEVEL);
    info!("Using playlist service at {}", API_BASE_URL.as_str());
    yew::Renderer::<App>::new().render();
}
