//! Beatmapset download mirror client.

use reqwest::{Client, Response};
use url::Url;

use crate::error::{Error, Result};

/// Unauthenticated mirror serving archives at `{base}{beatmapset_id}`.
#[derive(Clone)]
pub struct MirrorClient {
    client: Client,
    base_url: Url,
}

impl MirrorClient {
    pub fn new(client: Client, base_url: &str) -> Result<Self> {
        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
        })
    }

    /// Download URL for a beatmapset.
    pub fn url_for(&self, beatmapset_id: u64) -> Result<Url> {
        Ok(self.base_url.join(&beatmapset_id.to_string())?)
    }

    /// Start downloading a beatmapset archive.
    ///
    /// Transport failures and non-success statuses are both reported as
    /// [`Error::Download`].
    pub async fn fetch(&self, beatmapset_id: u64) -> Result<Response> {
        let url = self.url_for(beatmapset_id)?;
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Download(format!("{}: {}", beatmapset_id, e)))?;

        if !response.status().is_success() {
            return Err(Error::Download(format!(
                "{}: mirror returned HTTP {}",
                beatmapset_id,
                response.status()
            )));
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_url_for() {
        let mirror = MirrorClient::new(Client::new(), "https://api.chimu.moe/v1/download/").unwrap();
        assert_eq!(
            mirror.url_for(41823).unwrap().as_str(),
            "https://api.chimu.moe/v1/download/41823"
        );
    }

    #[tokio::test]
    async fn test_fetch_success_and_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/d/1"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK\x03\x04".to_vec()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/d/2"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let mirror = MirrorClient::new(Client::new(), &format!("{}/d/", server.uri())).unwrap();

        let body = mirror.fetch(1).await.unwrap().bytes().await.unwrap();
        assert_eq!(&body[..], b"PK\x03\x04");

        let err = mirror.fetch(2).await.unwrap_err();
        assert!(matches!(err, Error::Download(ref m) if m.contains("404")));
    }
}
