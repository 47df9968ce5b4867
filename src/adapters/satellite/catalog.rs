//! Granule discovery against a CMR-like (Common Metadata Repository) JSON
//! catalog (spec.md §4.2 step 2).

use chrono::{Duration as ChronoDuration, Utc};
use reqwest::Client;
use serde::Deserialize;

const CATALOG_ENDPOINT: &str = "https://cmr.earthdata.nasa.gov/search/granules.json";
const SEARCH_BOX_DEGREES: f64 = 0.5;
const LOOKBACK_HOURS: i64 = 12;
const COLLECTION_CONCEPT_ID: &str = "C2930730944-LARC_CLOUD"; // TEMPO NO2 tropospheric column

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    feed: CatalogFeed,
}

#[derive(Debug, Deserialize)]
struct CatalogFeed {
    entry: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    id: String,
    links: Vec<CatalogLink>,
}

#[derive(Debug, Deserialize)]
struct CatalogLink {
    href: String,
    #[serde(default)]
    rel: String,
}

/// A discovered granule with its OPeNDAP access URL.
#[derive(Debug, Clone)]
pub struct Granule {
    pub id: String,
    pub opendap_url: String,
}

/// Query the catalog for granules intersecting a small box around
/// `(lat, lon)` within the lookback window, newest first, and return the
/// first whose link set exposes an OPeNDAP subsetting endpoint.
pub async fn find_granule(client: &Client, lat: f64, lon: f64) -> Result<Option<Granule>, reqwest::Error> {
    let now = Utc::now();
    let since = now - ChronoDuration::hours(LOOKBACK_HOURS);

    let bounding_box = format!(
        "{},{},{},{}",
        lon - SEARCH_BOX_DEGREES,
        lat - SEARCH_BOX_DEGREES,
        lon + SEARCH_BOX_DEGREES,
        lat + SEARCH_BOX_DEGREES
    );

    let response: CatalogResponse = client
        .get(CATALOG_ENDPOINT)
        .query(&[
            ("collection_concept_id", COLLECTION_CONCEPT_ID.to_string()),
            ("bounding_box", bounding_box),
            ("temporal", format!("{},{}", since.to_rfc3339(), now.to_rfc3339())),
            ("sort_key", "-start_date".to_string()),
            ("page_size", "10".to_string()),
        ])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let granule = response
        .feed
        .entry
        .into_iter()
        .find_map(|entry| opendap_link(&entry.links).map(|url| Granule { id: entry.id, opendap_url: url }));

    Ok(granule)
}

fn opendap_link(links: &[CatalogLink]) -> Option<String> {
    links
        .iter()
        .find(|l| l.rel.ends_with("service#") || l.href.contains("opendap"))
        .map(|l| l.href.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opendap_link_prefers_href_containing_opendap() {
        let links = vec![
            CatalogLink {
                href: "https://example.com/data.nc".to_string(),
                rel: "download".to_string(),
            },
            CatalogLink {
                href: "https://opendap.earthdata.nasa.gov/granule.nc".to_string(),
                rel: "data#".to_string(),
            },
        ];
        assert_eq!(
            opendap_link(&links),
            Some("https://opendap.earthdata.nasa.gov/granule.nc".to_string())
        );
    }

    #[test]
    fn opendap_link_returns_none_when_absent() {
        let links = vec![CatalogLink {
            href: "https://example.com/data.nc".to_string(),
            rel: "download".to_string(),
        }];
        assert_eq!(opendap_link(&links), None);
    }
}
