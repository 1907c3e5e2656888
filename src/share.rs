//! Share links for a playlist page.

use urlencoding::encode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareTarget {
    WhatsApp,
    Twitter,
    Facebook,
    LinkedIn,
    Email,
}

impl ShareTarget {
    pub const ALL: [ShareTarget; 5] = [
        ShareTarget::WhatsApp,
        ShareTarget::Twitter,
        ShareTarget::Facebook,
        ShareTarget::LinkedIn,
        ShareTarget::Email,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShareTarget::WhatsApp => "WhatsApp",
            ShareTarget::Twitter => "Twitter",
            ShareTarget::Facebook => "Facebook",
            ShareTarget::LinkedIn => "LinkedIn",
            ShareTarget::Email => "Email",
        }
    }

    /// Mail links open in place; the rest go to a popup window.
    pub fn opens_popup(self) -> bool {
        !matches!(self, ShareTarget::Email)
    }

    pub fn url(self, playlist_name: &str, page_url: &str) -> String {
        let text = share_text(playlist_name);
        match self {
            ShareTarget::WhatsApp => {
                format!("https://wa.me/?text={}", encode(&format!("{} {}", text, page_url)))
            }
            ShareTarget::Twitter => format!(
                "https://twitter.com/intent/tweet?text={}&url={}",
                encode(&text),
                encode(page_url)
            ),
            ShareTarget::Facebook => format!(
                "https://www.facebook.com/sharer/sharer.php?u={}",
                encode(page_url)
            ),
            ShareTarget::LinkedIn => format!(
                "https://www.linkedin.com/sharing/share-offsite/?url={}",
                encode(page_url)
            ),
            ShareTarget::Email => format!(
                "mailto:?subject={}&body={}",
                encode(&format!("Check out this playlist: {}", playlist_name)),
                encode(&format!("{}\n\n{}", text, page_url))
            ),
        }
    }
}

pub fn share_text(playlist_name: &str) -> String {
    format!("Check out this playlist: \"{}\" 🎵", playlist_name)
}

/// Page URL for a playlist, given the current location without its hash.
pub fn playlist_page_url(origin_and_path: &str, id: &str) -> String {
    format!(
        "{}{}",
        origin_and_path,
        crate::route::Route::Playlist(id.to_string()).to_hash()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "https://nice.example/#/playlists/p1";

    #[test]
    fn twitter_link_encodes_text_and_url() {
        let url = ShareTarget::Twitter.url("Run & Gun", PAGE);
        assert_eq!(
            url,
            "https://twitter.com/intent/tweet?text=Check%20out%20this%20playlist%3A%20%22Run%20%26%20Gun%22%20%F0%9F%8E%B5\
             &url=https%3A%2F%2Fnice.example%2F%23%2Fplaylists%2Fp1"
        );
    }

    #[test]
    fn whatsapp_puts_url_in_text() {
        let url = ShareTarget::WhatsApp.url("Focus", PAGE);
        assert!(url.starts_with("https://wa.me/?text=Check%20out"));
        assert!(url.ends_with("%20https%3A%2F%2Fnice.example%2F%23%2Fplaylists%2Fp1"));
    }

    #[test]
    fn email_has_subject_and_body() {
        let url = ShareTarget::Email.url("Focus", PAGE);
        assert!(url.starts_with("mailto:?subject=Check%20out%20this%20playlist%3A%20Focus&body="));
        assert!(url.contains("%0A%0Ahttps%3A"));
        assert!(!ShareTarget::Email.opens_popup());
    }

    #[test]
    fn page_url_uses_playlist_route() {
        assert_eq!(
            playlist_page_url("https://nice.example/", "p1"),
            "https://nice.example/#/playlists/p1"
        );
    }
}
