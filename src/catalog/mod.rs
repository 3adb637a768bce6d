use std::fmt;

use error_stack::{IntoReport, ResultExt};
use serde::{Deserialize, Serialize};

pub mod api;

#[derive(Debug)]
pub struct CatalogError;

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Catalog error")
    }
}

impl std::error::Error for CatalogError {}

pub type CatalogResult<T> = error_stack::Result<T, CatalogError>;

/// One playlist entry as the catalog reports it.
#[derive(Debug, Clone)]
pub struct CatalogPlaylist {
    pub name: String,
    pub external_url: String,
    pub id: String,
    pub track_total: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
struct ApiExternalUrls {
    spotify: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
struct ApiTracks {
    total: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
struct ApiPlaylist {
    name: String,
    id: String,
    external_urls: ApiExternalUrls,
    tracks: ApiTracks,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
struct ApiPlaylistPage {
    items: Vec<ApiPlaylist>,
    next: Option<String>,
}

/// Spotify Web API client authenticated once with the Client Credentials
/// Flow. Listing a user's public playlists needs no user consent.
pub struct SpotifyCatalog {
    client: reqwest::Client,
    access_token: String,
}

impl SpotifyCatalog {
    pub async fn new() -> CatalogResult<Self> {
        let client = reqwest::Client::new();
        let access_token = api::client_credentials_token(&client).await?;
        Ok(Self {
            client,
            access_token,
        })
    }

    /// Lists every playlist owned by `username`, following pagination until
    /// the catalog reports no next page. Order is the catalog's own.
    pub async fn user_playlists(&self, username: &str) -> CatalogResult<Vec<CatalogPlaylist>> {
        let mut playlists = Vec::new();
        let mut next_url = Some(format!(
            "https://api.spotify.com/v1/users/{}/playlists?limit=50",
            username
        ));

        while let Some(url) = next_url {
            let page: ApiPlaylistPage = self
                .client
                .get(&url)
                .bearer_auth(&self.access_token)
                .send()
                .await
                .into_report()
                .change_context(CatalogError)?
                .error_for_status()
                .into_report()
                .change_context(CatalogError)
                .attach_printable(format!("Spotify rejected the playlist listing for '{}'", username))?
                .json::<ApiPlaylistPage>()
                .await
                .into_report()
                .change_context(CatalogError)?;

            playlists.extend(page.items.into_iter().map(|item| CatalogPlaylist {
                name: item.name,
                external_url: item.external_urls.spotify,
                id: item.id,
                track_total: item.tracks.total,
            }));
            next_url = page.next;
        }

        Ok(playlists)
    }
}
