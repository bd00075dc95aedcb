//! Request URL construction

use url::Url;

/// Build the full request URL for a set of query parameters
///
/// Every key and value goes through the form-urlencoded serializer, so
/// payload characters such as `&`, `;`, `<` or NUL reach the endpoint
/// intact instead of splitting or truncating the query. Any query already
/// present on `base` is kept in front.
pub fn build_url(base: &Url, params: &[(String, String)]) -> Url {
    let mut url = base.clone();
    if !params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in params {
            pairs.append_pair(key, value);
        }
    }
    url
}
