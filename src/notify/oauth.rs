//! OAuth 1.0a request signing (HMAC-SHA1), as required by the Twitter API
//! when posting with user-context credentials.

use crate::config::TwitterConfig;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::{distributions::Alphanumeric, Rng};
use sha1::Sha1;
use std::time::{SystemTime, UNIX_EPOCH};

type HmacSha1 = Hmac<Sha1>;

// RFC 3986 unreserved characters stay unencoded, everything else is escaped
const ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn encode(value: &str) -> String {
    utf8_percent_encode(value, ENCODE_SET).to_string()
}

/// HMAC-SHA1 signature over the OAuth base string for `method` + `url` +
/// `params`. `url` must not carry a query string; query and form parameters
/// belong in `params` alongside the oauth_* protocol parameters.
pub fn sign(
    method: &str,
    url: &str,
    params: &[(String, String)],
    consumer_secret: &str,
    token_secret: &str,
) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (encode(k), encode(v)))
        .collect();
    encoded.sort();

    let parameter_string = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let base_string = format!(
        "{}&{}&{}",
        method.to_uppercase(),
        encode(url),
        encode(&parameter_string)
    );
    let signing_key = format!("{}&{}", encode(consumer_secret), encode(token_secret));

    let mut mac =
        HmacSha1::new_from_slice(signing_key.as_bytes()).expect("hmac accepts any key length");
    mac.update(base_string.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

/// Builds a complete `Authorization: OAuth ...` header value for a request
/// with no query or form parameters (JSON bodies are not signed).
pub fn authorization_header(method: &str, url: &str, credentials: &TwitterConfig) -> String {
    let nonce: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect();
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let oauth_params = vec![
        (
            "oauth_consumer_key".to_string(),
            credentials.consumer_key.clone(),
        ),
        ("oauth_nonce".to_string(), nonce),
        (
            "oauth_signature_method".to_string(),
            "HMAC-SHA1".to_string(),
        ),
        ("oauth_timestamp".to_string(), timestamp.to_string()),
        ("oauth_token".to_string(), credentials.access_token.clone()),
        ("oauth_version".to_string(), "1.0".to_string()),
    ];

    let signature = sign(
        method,
        url,
        &oauth_params,
        &credentials.consumer_secret,
        &credentials.access_token_secret,
    );

    let mut header_params = oauth_params;
    header_params.push(("oauth_signature".to_string(), signature));
    header_params.sort();

    let fields = header_params
        .iter()
        .map(|(k, v)| format!(r#"{}="{}""#, encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join(", ");

    format!("OAuth {}", fields)
}
