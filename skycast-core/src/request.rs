use reqwest::Url;

use crate::config::is_valid_credential;
use crate::error::WeatherError;

/// Query parameter carrying the credential.
const CREDENTIAL_PARAM: &str = "appid";

/// Composes the fully qualified provider URL for one endpoint.
///
/// The credential is validated first and always becomes the first query
/// parameter. Params with empty values are dropped, as is a redundant
/// `appid` key accidentally passed in `params`. Query escaping is left
/// to [`Url`], which handles multi-word and accented city names.
pub fn build_url(
    base_url: &str,
    endpoint: &str,
    credential: &str,
    params: &[(&str, &str)],
) -> Result<Url, WeatherError> {
    if !is_valid_credential(credential) {
        return Err(WeatherError::Config(
            "missing or malformed API key; run `skycast configure` to set one".to_string(),
        ));
    }

    let joined = format!("{}/{}", base_url.trim_end_matches('/'), endpoint.trim_start_matches('/'));
    let mut url = Url::parse(&joined)
        .map_err(|e| WeatherError::Config(format!("invalid provider URL '{joined}': {e}")))?;

    {
        let mut query = url.query_pairs_mut();
        query.append_pair(CREDENTIAL_PARAM, credential);
        for (key, value) in params {
            if value.is_empty() || *key == CREDENTIAL_PARAM {
                continue;
            }
            query.append_pair(key, value);
        }
    }

    Ok(url)
}
