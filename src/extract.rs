use crate::models::Publication;
use crate::{PublishError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static PUBLICATION_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/myvehicle/(\d+)").expect("publication id pattern"));

/// Parses the terminal page location into the listing's numeric id and
/// canonical URL. A trailing `/plans` segment is stripped first. A location
/// without the expected segment is fatal: without an id the listing cannot
/// be confirmed, so the session must surface an error rather than a false
/// "published".
pub fn extract_publication(terminal_url: &str) -> Result<Publication> {
    let parsed = Url::parse(terminal_url)
        .map_err(|_| PublishError::PublicationIdNotFound(terminal_url.to_string()))?;

    let path = parsed.path();
    let path = path.strip_suffix("/plans").unwrap_or(path);

    let captures = PUBLICATION_ID
        .captures(path)
        .ok_or_else(|| PublishError::PublicationIdNotFound(terminal_url.to_string()))?;

    let url = terminal_url
        .strip_suffix("/plans")
        .unwrap_or(terminal_url)
        .to_string();

    Ok(Publication {
        id: captures[1].to_string(),
        url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_id_and_strips_plans_suffix() {
        let publication =
            extract_publication("https://www.seminuevos.com/myvehicle/98765/plans").unwrap();
        assert_eq!(publication.id, "98765");
        assert_eq!(publication.url, "https://www.seminuevos.com/myvehicle/98765");
    }

    #[test]
    fn test_extracts_id_without_plans_suffix() {
        let publication =
            extract_publication("https://www.seminuevos.com/myvehicle/12345").unwrap();
        assert_eq!(publication.id, "12345");
        assert_eq!(publication.url, "https://www.seminuevos.com/myvehicle/12345");
    }

    #[test]
    fn test_missing_segment_is_fatal() {
        let err = extract_publication("https://www.seminuevos.com/wizard").unwrap_err();
        assert!(matches!(err, PublishError::PublicationIdNotFound(_)));
    }

    #[test]
    fn test_non_numeric_id_is_fatal() {
        assert!(extract_publication("https://www.seminuevos.com/myvehicle/abc").is_err());
    }

    #[test]
    fn test_unparseable_location_is_fatal() {
        assert!(extract_publication("not a url").is_err());
    }
}
