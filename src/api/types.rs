// Remote feed payload types.
// Decodes the JSON feed document and maps its entries into domain items.

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::error::RemoteError;
use crate::feed::FeedItem;

/// Top-level feed document.
#[derive(Debug, Deserialize)]
struct FeedResponse {
    items: Vec<RemoteFeedItem>,
}

/// A feed entry as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteFeedItem {
    pub id: Uuid,
    pub image: Url,
    pub description: Option<String>,
    pub location: Option<String>,
}

impl From<RemoteFeedItem> for FeedItem {
    fn from(item: RemoteFeedItem) -> Self {
        FeedItem::new(item.id, item.image, item.description, item.location)
    }
}

/// Decode a feed response body.
///
/// Only a 200 response whose body is a well-formed feed document is accepted.
pub fn map_feed(body: &[u8], status: StatusCode) -> Result<Vec<RemoteFeedItem>, RemoteError> {
    if status != StatusCode::OK {
        debug!(%status, "rejecting feed response status");
        return Err(RemoteError::InvalidData);
    }

    let response: FeedResponse = serde_json::from_slice(body).map_err(|err| {
        debug!(error = %err, "rejecting malformed feed body");
        RemoteError::InvalidData
    })?;

    Ok(response.items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_feed_rejects_non_200_status() {
        let body = br#"{"items": []}"#;
        for code in [199u16, 201, 300, 400, 500] {
            let status = StatusCode::from_u16(code).unwrap();
            assert_eq!(map_feed(body, status), Err(RemoteError::InvalidData));
        }
    }

    #[test]
    fn test_map_feed_rejects_malformed_body() {
        assert_eq!(
            map_feed(b"invalid json", StatusCode::OK),
            Err(RemoteError::InvalidData)
        );
        assert_eq!(map_feed(b"", StatusCode::OK), Err(RemoteError::InvalidData));
    }

    #[test]
    fn test_map_feed_rejects_entry_without_id() {
        let body = br#"{"items": [{"image": "https://a-url.com/1.png"}]}"#;
        assert_eq!(map_feed(body, StatusCode::OK), Err(RemoteError::InvalidData));
    }

    #[test]
    fn test_map_feed_accepts_empty_list() {
        let items = map_feed(br#"{"items": []}"#, StatusCode::OK).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_map_feed_preserves_order_and_optional_fields() {
        let body = br#"{
            "items": [
                {
                    "id": "1c2d8e4b-98f6-4b1a-9e8a-0d6b2c1f7a11",
                    "image": "https://a-url.com/1.png",
                    "description": "a description",
                    "location": "a location"
                },
                {
                    "id": "5b7f6c2e-3a5d-4e9b-8c1a-2f4e6d8b0c22",
                    "image": "https://another-url.com/2.png",
                    "description": null
                }
            ]
        }"#;

        let items = map_feed(body, StatusCode::OK).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].image.as_str(), "https://a-url.com/1.png");
        assert_eq!(items[0].description.as_deref(), Some("a description"));
        assert_eq!(items[0].location.as_deref(), Some("a location"));
        assert_eq!(items[1].image.as_str(), "https://another-url.com/2.png");
        assert_eq!(items[1].description, None);
        assert_eq!(items[1].location, None);

        let item = FeedItem::from(items[0].clone());
        assert_eq!(item.id(), items[0].id);
        assert_eq!(item.image_url(), &items[0].image);
    }
}
