//! Endpoint URL helpers.

/// Joins a base URL and an endpoint path with exactly one slash between them.
///
/// # Examples
///
/// ```
/// use masquerade::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("https://api.groq.com/openai/v1/", "/chat/completions"),
///     "https://api.groq.com/openai/v1/chat/completions"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let endpoint = endpoint.trim_start_matches('/');
    format!("{base}/{endpoint}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_without_doubling_slashes() {
        let cases = [
            ("https://api.groq.com/openai/v1", "chat/completions"),
            ("https://api.groq.com/openai/v1/", "chat/completions"),
            ("https://api.groq.com/openai/v1", "/chat/completions"),
            ("https://api.groq.com/openai/v1///", "///chat/completions"),
        ];

        for (base, endpoint) in cases {
            assert_eq!(
                construct_api_url(base, endpoint),
                "https://api.groq.com/openai/v1/chat/completions",
                "base={base:?} endpoint={endpoint:?}"
            );
        }
    }

    #[test]
    fn local_servers_keep_their_port() {
        assert_eq!(
            construct_api_url("http://127.0.0.1:8080/v1/", "chat/completions"),
            "http://127.0.0.1:8080/v1/chat/completions"
        );
    }
}
