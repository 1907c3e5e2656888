//! User-facing flows that combine the remote client with the local cache.

use crate::api::{ApiError, PlaylistApi};
use crate::cache::PlaylistCache;
use crate::store::KeyValueStore;
use crate::{Playlist, PlaylistRequest};
use log::{error, info};

/// Where an opened playlist came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistSource {
    /// Already in the local collection.
    Local,
    /// Fetched by id and saved into the collection just now.
    Shared,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Found {
        playlist: Playlist,
        source: PlaylistSource,
    },
    NotFound,
}

/// Generate a playlist and keep it in the collection, tagged with the
/// request's activity and vibe.
///
/// An invalid request is rejected before any network call. A cache write failure is logged but does not fail the call; the caller
/// still gets the generated playlist.
pub async fn generate_and_keep<S, A>(
    cache: &PlaylistCache<S>,
    api: &A,
    request: &PlaylistRequest,
) -> Result<Playlist, ApiError>
where
    S: KeyValueStore,
    A: PlaylistApi + ?Sized,
{
    request.validate()?;
    let playlist = api.generate_playlist(request).await?.tagged_with(request);
    match cache.add(playlist.clone()) {
        Ok(_) => info!("Playlist {} added to your collection", playlist.id),
        Err(err) => error!("Generated playlist {} was not saved: {}", playlist.id, err),
    }
    Ok(playlist)
}

/// Resolve a playlist id: local collection first, then the service.
/// A playlist found remotely is saved locally on first view.
pub async fn open_playlist<S, A>(
    cache: &PlaylistCache<S>,
    api: &A,
    id: &str,
) -> Result<Lookup, ApiError>
where
    S: KeyValueStore,
    A: PlaylistApi + ?Sized,
{
    if let Some(playlist) = cache.get_by_id(id) {
        return Ok(Lookup::Found {
            playlist,
            source: PlaylistSource::Local,
        });
    }

    let Some(fetched) = api.fetch_playlist(id).await? else {
        return Ok(Lookup::NotFound);
    };

    let playlist = fetched.with_shared_defaults();
    match cache.add(playlist.clone()) {
        Ok(_) => info!("Shared playlist {} saved to your collection", playlist.id),
        Err(err) => error!("Failed to auto-save shared playlist {}: {}", playlist.id, err),
    }
    Ok(Lookup::Found {
        playlist,
        source: PlaylistSource::Shared,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockPlaylistApi;
    use crate::store::{MemoryStore, MockKeyValueStore, StorageError};
    use crate::test_support::playlist;
    use crate::RequestError;
    use futures::executor::block_on;
    use std::rc::Rc;

    const KEY: &str = "user_playlists";

    fn cache() -> PlaylistCache<Rc<MemoryStore>> {
        PlaylistCache::open(Rc::new(MemoryStore::new()), KEY)
    }

    fn request() -> PlaylistRequest {
        PlaylistRequest::new("running with electronic", 45, "high_energy").unwrap()
    }

    #[test]
    fn generated_playlist_is_kept() {
        let cache = cache();
        let mut api = MockPlaylistApi::new();
        api.expect_generate_playlist()
            .withf(|req| req.duration == 45 && req.vibe == "high_energy")
            .times(1)
            .returning(|_| Ok(playlist("gen1", "2024-05-01T12:00:00")));

        let generated = block_on(generate_and_keep(&cache, &api, &request())).unwrap();
        assert!(!generated.id.is_empty());
        assert_eq!(cache.get_by_id("gen1"), Some(generated));
    }

    #[test]
    fn generated_playlist_is_tagged_from_request() {
        let cache = cache();
        let mut api = MockPlaylistApi::new();
        api.expect_generate_playlist().times(1).returning(|_| {
            let body = r#"{
                "id": "gen2",
                "name": "Electronic Run",
                "description": "Fast beats",
                "spotifyUrl": "https://open.spotify.com/playlist/gen2",
                "imageUrl": "",
                "duration": 45,
                "createdAt": "2024-05-01T12:00:00",
                "tracks": []
            }"#;
            Ok(serde_json::from_str(body).unwrap())
        });

        let generated = block_on(generate_and_keep(&cache, &api, &request())).unwrap();
        assert_eq!(generated.activity, "running with electronic");
        assert_eq!(generated.vibe, "high_energy");

        let stored = cache.get_by_id("gen2").unwrap();
        assert_eq!(stored.activity, "running with electronic");
        assert_eq!(stored.vibe, "high_energy");
        assert_eq!(cache.search("running").len(), 1);
    }

    #[test]
    fn invalid_request_never_reaches_the_service() {
        let cache = cache();
        let mut api = MockPlaylistApi::new();
        api.expect_generate_playlist().never();

        let blank = PlaylistRequest {
            activity: "   ".to_string(),
            duration: 45,
            vibe: "chill".to_string(),
        };
        let err = block_on(generate_and_keep(&cache, &api, &blank)).unwrap_err();
        assert!(matches!(
            err,
            ApiError::InvalidRequest(RequestError::EmptyActivity)
        ));

        let too_short = PlaylistRequest {
            activity: "yoga".to_string(),
            duration: 5,
            vibe: "chill".to_string(),
        };
        let err = block_on(generate_and_keep(&cache, &api, &too_short)).unwrap_err();
        assert!(matches!(
            err,
            ApiError::InvalidRequest(RequestError::DurationOutOfRange { actual: 5, .. })
        ));
        assert!(cache.is_empty());
    }

    #[test]
    fn generation_error_leaves_cache_alone() {
        let cache = cache();
        let mut api = MockPlaylistApi::new();
        api.expect_generate_playlist().returning(|_| {
            Err(ApiError::Status {
                status: 404,
                message: "No tracks found".to_string(),
            })
        });

        let err = block_on(generate_and_keep(&cache, &api, &request())).unwrap_err();
        assert_eq!(err.to_string(), "No tracks found");
        assert!(cache.is_empty());
    }

    #[test]
    fn storage_failure_does_not_fail_generation() {
        let mut store = MockKeyValueStore::new();
        store.expect_get().returning(|_| Ok(None));
        store
            .expect_set()
            .returning(|_, _| Err(StorageError::Write("QuotaExceededError".to_string())));
        let cache = PlaylistCache::open(store, KEY);

        let mut api = MockPlaylistApi::new();
        api.expect_generate_playlist()
            .returning(|_| Ok(playlist("gen1", "2024-05-01T12:00:00")));

        let generated = block_on(generate_and_keep(&cache, &api, &request())).unwrap();
        assert_eq!(generated.id, "gen1");
        assert!(cache.is_empty());
    }

    #[test]
    fn local_playlist_skips_the_network() {
        let cache = cache();
        cache.add(playlist("p1", "2024-01-01T00:00:00Z")).unwrap();
        let mut api = MockPlaylistApi::new();
        api.expect_fetch_playlist().never();

        let lookup = block_on(open_playlist(&cache, &api, "p1")).unwrap();
        assert!(matches!(
            lookup,
            Lookup::Found {
                source: PlaylistSource::Local,
                ..
            }
        ));
    }

    #[test]
    fn shared_playlist_is_fetched_and_saved() {
        let cache = cache();
        let mut api = MockPlaylistApi::new();
        api.expect_fetch_playlist()
            .withf(|id| id == "s1")
            .times(1)
            .returning(|_| {
                let mut p = playlist("s1", "2024-01-01T00:00:00Z");
                p.activity.clear();
                p.vibe.clear();
                Ok(Some(p))
            });

        let lookup = block_on(open_playlist(&cache, &api, "s1")).unwrap();
        let Lookup::Found { playlist, source } = lookup else {
            panic!("expected a playlist");
        };
        assert_eq!(source, PlaylistSource::Shared);
        assert_eq!(playlist.vibe, "mixed");
        assert_eq!(cache.get_by_id("s1"), Some(playlist));
    }

    #[test]
    fn missing_playlist_is_not_found() {
        let cache = cache();
        let mut api = MockPlaylistApi::new();
        api.expect_fetch_playlist().returning(|_| Ok(None));

        let lookup = block_on(open_playlist(&cache, &api, "missing")).unwrap();
        assert_eq!(lookup, Lookup::NotFound);
        assert!(cache.is_empty());
    }

    #[test]
    fn lookup_errors_propagate() {
        let cache = cache();
        let mut api = MockPlaylistApi::new();
        api.expect_fetch_playlist().returning(|_| {
            Err(ApiError::Status {
                status: 500,
                message: "HTTP Error: 500 Internal Server Error".to_string(),
            })
        });

        let result = block_on(open_playlist(&cache, &api, "p9"));
        assert!(matches!(result, Err(ApiError::Status { status: 500, .. })));
    }
}
