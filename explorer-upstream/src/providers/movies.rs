//! TMDB movie search by city name.

#![allow(missing_docs)]

use serde::Deserialize;
use tracing::instrument;

use explorer_core::error::{ExplorerError, Result};
use explorer_core::types::{LocationRef, Movie, RecordData, ResourceKind};

use super::non_empty;
use crate::client::UpstreamClient;

const PROVIDER: &str = "tmdb";

#[derive(Debug, Deserialize)]
pub struct MovieSearchResponse {
    #[serde(default)]
    pub results: Vec<MoviePayload>,
}

#[derive(Debug, Deserialize)]
pub struct MoviePayload {
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: i64,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub release_date: Option<String>,
}

/// Poster paths are joined onto `image_base`; untitled results are skipped.
pub fn normalize(image_base: &str, response: MovieSearchResponse) -> Result<Vec<RecordData>> {
    let base = image_base.trim_end_matches('/');
    let group: Vec<RecordData> = response
        .results
        .into_iter()
        .filter_map(|m| {
            let title = non_empty(m.original_title).or(non_empty(m.title))?;
            let image_url = non_empty(m.poster_path)
                .map(|p| format!("{}/{}", base, p.trim_start_matches('/')));
            Some(RecordData::Movie(Movie {
                title,
                overview: non_empty(m.overview),
                average_votes: m.vote_average,
                total_votes: m.vote_count,
                image_url,
                popularity: m.popularity,
                released_on: non_empty(m.release_date),
            }))
        })
        .collect();

    if group.is_empty() {
        return Err(ExplorerError::no_data(PROVIDER));
    }
    Ok(group)
}

#[instrument(skip(client, location), fields(location_id = %location.id))]
pub(crate) async fn fetch(client: &UpstreamClient, location: &LocationRef) -> Result<Vec<RecordData>> {
    let config = client.config();
    let provider = config.provider(ResourceKind::Movie);
    let key = provider.require_key(PROVIDER)?;
    let url = provider.endpoint(PROVIDER)?;

    let city = location.city().ok_or_else(|| {
        ExplorerError::InvalidLookup("movie search needs formatted_query or search_query".into())
    })?;

    let request = client
        .http()
        .get(url)
        .query(&[("api_key", key), ("query", city), ("language", "en-US"), ("page", "1")]);

    let response: MovieSearchResponse = client.get_json(PROVIDER, request).await?;
    normalize(&config.movie_image_url, response)
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500/";

    #[test]
    fn test_movies_normalized() {
        let response: MovieSearchResponse = serde_json::from_str(
            r#"{
                "page": 1,
                "results": [
                    {
                        "original_title": "Sleepless in Seattle",
                        "title": "Sleepless in Seattle",
                        "overview": "A young boy who tries to set his dad up...",
                        "vote_average": 6.7,
                        "vote_count": 2451,
                        "poster_path": "/iLWsLVrfkFvOXOG9PbUAYg7AK3E.jpg",
                        "popularity": 12.5,
                        "release_date": "1993-06-24"
                    },
                    {
                        "original_title": "Seattle Superstorm",
                        "overview": "",
                        "vote_average": 4.1,
                        "vote_count": 12,
                        "poster_path": null,
                        "popularity": 1.2,
                        "release_date": ""
                    },
                    { "overview": "no title at all" }
                ],
                "total_results": 3
            }"#,
        )
        .unwrap();

        let group = normalize(IMAGE_BASE, response).unwrap();
        assert_eq!(group.len(), 2);
        assert_eq!(
            group[0],
            RecordData::Movie(Movie {
                title: "Sleepless in Seattle".into(),
                overview: Some("A young boy who tries to set his dad up...".into()),
                average_votes: 6.7,
                total_votes: 2451,
                image_url: Some(
                    "https://image.tmdb.org/t/p/w500/iLWsLVrfkFvOXOG9PbUAYg7AK3E.jpg".into()
                ),
                popularity: 12.5,
                released_on: Some("1993-06-24".into()),
            })
        );
        match &group[1] {
            RecordData::Movie(m) => {
                assert_eq!(m.overview, None);
                assert_eq!(m.image_url, None);
                assert_eq!(m.released_on, None);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_no_results_is_no_data() {
        let response: MovieSearchResponse =
            serde_json::from_str(r#"{"page": 1, "results": []}"#).unwrap();
        assert!(normalize(IMAGE_BASE, response).unwrap_err().is_no_data());
    }
}
