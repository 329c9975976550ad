use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use url::Url;

use super::{BasePlaceLookup, PlaceDetails};

const SEARCH_TEXT_URL: &str = "https://places.googleapis.com/v1/places:searchText";

const FIELD_MASK: &str = "places.displayName,places.addressComponents,\
places.nationalPhoneNumber,places.websiteUri,places.location,places.googleMapsUri";

/// Hosts that serve share links which redirect to a full maps URL
const SHORT_LINK_HOSTS: &[&str] = &["maps.app.goo.gl", "goo.gl"];

/// Google Places (Text Search) client
pub struct GooglePlacesClient {
    api_key: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchTextRequest<'a> {
    text_query: &'a str,
    language_code: &'a str,
    region_code: &'a str,
    page_size: u8,
}

#[derive(Debug, Default, Deserialize)]
struct SearchTextResponse {
    #[serde(default)]
    places: Vec<Place>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Place {
    display_name: Option<LocalizedText>,
    #[serde(default)]
    address_components: Vec<AddressComponent>,
    national_phone_number: Option<String>,
    website_uri: Option<String>,
    location: Option<LatLng>,
    google_maps_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LocalizedText {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddressComponent {
    long_text: String,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    latitude: f64,
    longitude: f64,
}

impl GooglePlacesClient {
    pub fn new(api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { api_key, client })
    }

    async fn search(&self, query: &str, language_code: &str) -> Result<Option<Place>> {
        let request = SearchTextRequest {
            text_query: query,
            language_code,
            region_code: "JP",
            page_size: 1,
        };

        let response = self
            .client
            .post(SEARCH_TEXT_URL)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&request)
            .send()
            .await
            .context("Failed to send Places search request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Places API error {}: {}", status, body);
        }

        let body: SearchTextResponse = response
            .json()
            .await
            .context("Failed to parse Places response")?;

        Ok(body.places.into_iter().next())
    }

    /// Follow a share link to the URL it redirects to.
    async fn resolve_short_link(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to resolve maps share link")?;
        Ok(response.url().to_string())
    }
}

#[async_trait]
impl BasePlaceLookup for GooglePlacesClient {
    #[instrument(skip(self))]
    async fn lookup(&self, google_maps_url: &str) -> Result<Option<PlaceDetails>> {
        let resolved = if is_short_link(google_maps_url) {
            let target = self.resolve_short_link(google_maps_url).await?;
            debug!(target = %target, "Resolved maps share link");
            target
        } else {
            google_maps_url.to_string()
        };

        let Some(query) = query_from_maps_url(&resolved) else {
            warn!("No place query could be derived from maps URL");
            return Ok(None);
        };

        let Some(english) = self.search(&query, "en").await? else {
            debug!(query = %query, "Places search returned no result");
            return Ok(None);
        };
        let japanese = self.search(&query, "ja").await?;

        let mut details = to_details(english);
        details.name_ja = japanese
            .and_then(|place| place.display_name)
            .map(|name| name.text);

        Ok(Some(details))
    }
}

fn to_details(place: Place) -> PlaceDetails {
    let component = |kind: &str| {
        place
            .address_components
            .iter()
            .find(|c| c.types.iter().any(|t| t == kind))
            .map(|c| c.long_text.clone())
    };
    let joined = |kinds: &[&str]| {
        let parts: Vec<&str> = place
            .address_components
            .iter()
            .filter(|c| c.types.iter().any(|t| kinds.contains(&t.as_str())))
            .map(|c| c.long_text.as_str())
            .collect();
        (!parts.is_empty()).then(|| parts.join(" "))
    };

    PlaceDetails {
        name_en: place.display_name.as_ref().map(|name| name.text.clone()),
        name_ja: None,
        postal_code: component("postal_code"),
        prefecture: component("administrative_area_level_1"),
        city: component("locality"),
        address_line1: joined(&[
            "sublocality_level_1",
            "sublocality_level_2",
            "sublocality_level_3",
            "sublocality_level_4",
        ]),
        address_line2: joined(&["premise", "subpremise"]),
        phone: place.national_phone_number.clone(),
        website: place.website_uri.clone(),
        latitude: place.location.as_ref().map(|l| l.latitude),
        longitude: place.location.as_ref().map(|l| l.longitude),
        google_maps_url: place.google_maps_uri.clone(),
    }
}

fn is_short_link(url: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|host| SHORT_LINK_HOSTS.contains(&host)))
        .unwrap_or(false)
}

/// Text query for a maps URL: the `/place/<name>/` segment, else the `q` or
/// `query` parameter.
pub fn query_from_maps_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;

    let from_path = parsed
        .path_segments()
        .and_then(|mut segments| {
            segments.find(|s| *s == "place")?;
            segments.next()
        })
        .filter(|name| !name.is_empty())
        .map(|name| name.replace('+', " "))
        .and_then(|name| urlencoding::decode(&name).ok().map(|n| n.into_owned()));

    let query = from_path.or_else(|| {
        parsed
            .query_pairs()
            .find(|(key, _)| key == "q" || key == "query")
            .map(|(_, value)| value.into_owned())
    })?;

    let query = query.trim().to_string();
    (!query.is_empty()).then_some(query)
}

/// No-op lookup for when no Places API key is configured
pub struct NoopPlaceLookup;

#[async_trait]
impl BasePlaceLookup for NoopPlaceLookup {
    async fn lookup(&self, _google_maps_url: &str) -> Result<Option<PlaceDetails>> {
        warn!("NoopPlaceLookup: lookup called but no Places API key configured");
        Ok(None)
    }
}
