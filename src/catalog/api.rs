use std::env;

use base64::{engine::general_purpose, Engine as _};
use dotenvy::dotenv;
use error_stack::{IntoReport, ResultExt};
use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogError, CatalogResult};
use crate::Suggestion;

#[derive(Serialize, Deserialize, Debug)]
struct TokenResponse {
    access_token: String,
}

/// Fetches an app-level access token with the Client Credentials Flow.
/// Requires `SPOTIFY_CLIENT_ID` and `SPOTIFY_CLIENT_SECRET`, read from the
/// environment or a `.env` file next to the binary.
pub async fn client_credentials_token(client: &reqwest::Client) -> CatalogResult<String> {
    dotenv().ok();

    let client_id = env::var("SPOTIFY_CLIENT_ID")
        .into_report()
        .change_context(CatalogError)
        .attach_printable("SPOTIFY_CLIENT_ID environment variable not set")
        .attach(Suggestion::new(
            "create a .env file with SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET",
        ))?;
    let client_secret = env::var("SPOTIFY_CLIENT_SECRET")
        .into_report()
        .change_context(CatalogError)
        .attach_printable("SPOTIFY_CLIENT_SECRET environment variable not set")
        .attach(Suggestion::new(
            "create a .env file with SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET",
        ))?;

    let auth_string = format!("{}:{}", client_id, client_secret);
    let encoded_auth = general_purpose::STANDARD.encode(auth_string);

    let token_response = client
        .post("https://accounts.spotify.com/api/token")
        .header("Authorization", format!("Basic {}", encoded_auth))
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await
        .into_report()
        .change_context(CatalogError)?
        .json::<TokenResponse>()
        .await
        .into_report()
        .change_context(CatalogError)?;

    Ok(token_response.access_token)
}
