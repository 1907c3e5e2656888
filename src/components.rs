//! Yew view components for the playlist UI.
//!
//! Most of these render straight from props; the share dialog keeps a bit
//! of local state for its open/copied flags.

use gloo_timers::callback::Timeout;
use log::{error, warn};
use nice_things::config::{COPY_FEEDBACK_MS, FALLBACK_COVER_URL};
use nice_things::defaults::{DURATION_STEP_MINUTES, MAX_DURATION_MINUTES, MIN_DURATION_MINUTES};
use nice_things::share::{share_text, ShareTarget};
use nice_things::utils::{format_created_at, format_minutes, format_track_duration};
use nice_things::{Playlist, Track, Vibe};
use web_sys::{HtmlImageElement, HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

/// Open an external link in a new tab.
pub fn open_external(url: &str) {
    let window = gloo_utils::window();
    if let Err(err) = window.open_with_url_and_target(url, "_blank") {
        warn!("Could not open {}: {:?}", url, err);
    }
}

/// Slider plus live label for the playlist length.
#[derive(Properties, PartialEq)]
pub struct DurationSliderProps {
    pub minutes: u32,
    pub oninput: Callback<u32>,
}

#[function_component(DurationSlider)]
pub fn duration_slider(props: &DurationSliderProps) -> Html {
    let oninput = props.oninput.reform(|e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        input.value().parse::<u32>().unwrap_or(MIN_DURATION_MINUTES)
    });

    html! {
        <div class="form-group">
            <label for="duration">{ format!("Duration: {} minutes", props.minutes) }</label>
            <div class="slider-with-value">
                <input type="range"
                    id="duration"
                    min={MIN_DURATION_MINUTES.to_string()}
                    max={MAX_DURATION_MINUTES.to_string()}
                    step={DURATION_STEP_MINUTES.to_string()}
                    value={props.minutes.to_string()}
                    {oninput}
                />
                <span class="slider-value">{ format_minutes(props.minutes) }</span>
            </div>
            <div class="slider-range">
                <span>{ format_minutes(MIN_DURATION_MINUTES) }</span>
                <span>{ format_minutes(MAX_DURATION_MINUTES) }</span>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct VibeSelectProps {
    pub value: Vibe,
    pub onchange: Callback<Vibe>,
}

#[function_component(VibeSelect)]
pub fn vibe_select(props: &VibeSelectProps) -> Html {
    let onchange = props.onchange.reform(|e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        Vibe::from_value(&select.value()).unwrap_or_default()
    });

    html! {
        <div class="form-group">
            <label for="vibe">{ "What's the vibe?" }</label>
            <select id="vibe" {onchange}>
                { for Vibe::ALL.iter().map(|vibe| html! {
                    <option value={vibe.value()} selected={*vibe == props.value}>
                        { vibe.label() }
                    </option>
                }) }
            </select>
        </div>
    }
}

fn fallback_cover(e: Event) {
    let img: HtmlImageElement = e.target_unchecked_into();
    if img.src() != FALLBACK_COVER_URL {
        img.set_src(FALLBACK_COVER_URL);
    }
}

fn tag_badges(playlist: &Playlist) -> Html {
    html! {
        <div class="badges">
            <span class="badge activity">{ &playlist.activity }</span>
            <span class={Vibe::badge_class(&playlist.vibe)}>{ &playlist.vibe }</span>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct PlaylistCardProps {
    pub playlist: Playlist,
    pub on_open: Callback<String>,
    #[prop_or_default]
    pub on_remove: Option<Callback<String>>,
}

/// Compact card used in the collection grid and the recent list.
#[function_component(PlaylistSummaryCard)]
pub fn playlist_summary_card(props: &PlaylistCardProps) -> Html {
    let playlist = &props.playlist;
    let open = {
        let id = playlist.id.clone();
        props.on_open.reform(move |_: MouseEvent| id.clone())
    };
    let spotify = {
        let url = playlist.spotify_url.clone();
        Callback::from(move |_: MouseEvent| open_external(&url))
    };

    html! {
        <div class="card playlist-card">
            if !playlist.image_url.is_empty() {
                <img class="cover"
                    src={playlist.image_url.clone()}
                    alt={format!("Cover for {}", playlist.name)}
                    onerror={Callback::from(fallback_cover)}
                />
            }
            <div class="card-header">
                <h3 class="card-title">{ &playlist.name }</h3>
                <span class="card-date">{ format_created_at(&playlist.created_at) }</span>
                if let Some(on_remove) = props.on_remove.clone() {
                    <button class="btn-ghost small remove"
                        title="Remove from collection"
                        onclick={
                            let id = playlist.id.clone();
                            on_remove.reform(move |_: MouseEvent| id.clone())
                        }
                    >
                        { "Remove" }
                    </button>
                }
            </div>
            <p class="card-description">{ &playlist.description }</p>
            { tag_badges(playlist) }
            <div class="card-meta">
                <span>{ format_minutes(playlist.duration) }</span>
                <span>{ format!("{} tracks", playlist.track_count()) }</span>
            </div>
            <div class="card-actions">
                <button class="btn-primary small" onclick={open}>{ "View Details" }</button>
                <button class="btn-secondary small" onclick={spotify}>{ "Open in Spotify" }</button>
            </div>
        </div>
    }
}

/// Renders the track table for a playlist.
pub fn render_tracks(tracks: &[Track]) -> Html {
    if tracks.is_empty() {
        return html! {
            <div class="tracks">
                <p class="no-results-message">{ "No track details available for this playlist." }</p>
            </div>
        };
    }

    html! {
        <div class="tracks">
            <table class="track-table">
                <thead>
                    <tr>
                        <th>{ "#" }</th>
                        <th>{ "Title" }</th>
                        <th>{ "Artist" }</th>
                        <th>{ "Album" }</th>
                        <th>{ "Length" }</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    { tracks.iter().enumerate().map(|(idx, track)| render_track_row(idx, track)).collect::<Html>() }
                </tbody>
            </table>
        </div>
    }
}

fn render_track_row(idx: usize, track: &Track) -> Html {
    let url = track.spotify_url.clone();
    html! {
        <tr key={track.id.clone()}>
            <td>{ idx + 1 }</td>
            <td class="track-title">
                if let Some(cover) = track.album.cover_url() {
                    <img class="track-cover" src={cover.to_string()} alt="" />
                }
                { &track.name }
            </td>
            <td>{ &track.artist }</td>
            <td>{ track.album.name().to_string() }</td>
            <td>{ format_track_duration(track.duration) }</td>
            <td>
                <button class="btn-ghost small" onclick={Callback::from(move |_: MouseEvent| open_external(&url))}>
                    { "Play" }
                </button>
            </td>
        </tr>
    }
}

#[derive(Properties, PartialEq)]
pub struct ShareDialogProps {
    pub playlist_name: AttrValue,
    pub page_url: AttrValue,
}

/// Share button that expands into copy-link and social share options.
#[function_component(ShareDialog)]
pub fn share_dialog(props: &ShareDialogProps) -> Html {
    let open = use_state(|| false);
    let copied = use_state(|| false);
    let copy_error = use_state(|| None::<String>);
    let reset_timer = use_mut_ref(|| None::<Timeout>);

    let toggle = {
        let open = open.clone();
        Callback::from(move |_: MouseEvent| open.set(!*open))
    };

    let copy_link = {
        let url = props.page_url.to_string();
        let copied = copied.clone();
        let copy_error = copy_error.clone();
        let reset_timer = reset_timer.clone();
        Callback::from(move |_: MouseEvent| {
            let url = url.clone();
            let copied = copied.clone();
            let copy_error = copy_error.clone();
            let reset_timer = reset_timer.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let clipboard = gloo_utils::window().navigator().clipboard();
                match wasm_bindgen_futures::JsFuture::from(clipboard.write_text(&url)).await {
                    Ok(_) => {
                        copy_error.set(None);
                        copied.set(true);
                        let copied = copied.clone();
                        // replacing the handle cancels a pending reset
                        *reset_timer.borrow_mut() =
                            Some(Timeout::new(COPY_FEEDBACK_MS, move || copied.set(false)));
                    }
                    Err(err) => {
                        error!("Failed to copy to clipboard: {:?}", err);
                        copy_error.set(Some(
                            "Could not copy link to clipboard. Please copy the URL manually."
                                .to_string(),
                        ));
                    }
                }
            });
        })
    };

    html! {
        <div class="share">
            <button class="btn-secondary" onclick={toggle.clone()}>{ "Share" }</button>
            if *open {
                <div class="share-dialog" role="dialog">
                    <div class="share-header">
                        <h3>{ "Share Playlist" }</h3>
                        <p>{ format!("Share \"{}\" with your friends and family.", props.playlist_name) }</p>
                        <button class="btn-ghost small close" onclick={toggle}>{ "Close" }</button>
                    </div>
                    <div class="form-group">
                        <label for="share-link">{ "Copy Link" }</label>
                        <div class="copy-row">
                            <input id="share-link" readonly={true} value={props.page_url.clone()} />
                            <button class={if *copied { "btn-primary" } else { "btn-secondary" }} onclick={copy_link}>
                                { if *copied { "Copied!" } else { "Copy" } }
                            </button>
                        </div>
                        if let Some(ref err) = *copy_error {
                            <div class="input-error">{ err }</div>
                        }
                    </div>
                    <div class="form-group">
                        <label>{ "Share on Social Media" }</label>
                        <p class="share-text">{ share_text(&props.playlist_name) }</p>
                        <div class="share-targets">
                            { for ShareTarget::ALL.iter().map(|target| {
                                let url = target.url(&props.playlist_name, &props.page_url);
                                let popup = target.opens_popup();
                                html! {
                                    <button class="btn-secondary small"
                                        onclick={Callback::from(move |_: MouseEvent| share_to(&url, popup))}
                                    >
                                        { target.name() }
                                    </button>
                                }
                            }) }
                        </div>
                    </div>
                </div>
            }
        </div>
    }
}

fn share_to(url: &str, popup: bool) {
    let window = gloo_utils::window();
    let result = if popup {
        window
            .open_with_url_and_target_and_features(
                url,
                "_blank",
                "noopener,noreferrer,width=600,height=400",
            )
            .map(|_| ())
    } else {
        window.location().set_href(url)
    };
    if let Err(err) = result {
        warn!("Share link failed: {:?}", err);
    }
}
