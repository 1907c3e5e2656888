//! Views addressable through the URL hash.

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Generator,
    Collection,
    Playlist(String),
}

impl Route {
    /// Parse `location.hash`. Unknown paths land on the generator.
    pub fn from_hash(hash: &str) -> Route {
        let path = hash.trim_start_matches('#').trim_matches('/');
        let mut parts = path.splitn(2, '/');
        match (parts.next(), parts.next()) {
            (Some("playlists"), None) => Route::Collection,
            (Some("playlists"), Some(id)) if !id.is_empty() => {
                let id = urlencoding::decode(id)
                    .map(|id| id.into_owned())
                    .unwrap_or_else(|_| id.to_string());
                Route::Playlist(id)
            }
            _ => Route::Generator,
        }
    }

    pub fn to_hash(&self) -> String {
        match self {
            Route::Generator => "#/".to_string(),
            Route::Collection => "#/playlists".to_string(),
            Route::Playlist(id) => format!("#/playlists/{}", urlencoding::encode(id)),
        }
    }
}
