//! Token and proxy sources
//!
//! Both files are newline-delimited lists; blank lines are ignored. Proxies
//! are handed to accounts round-robin by position.

use crate::config::InputConfig;
use crate::error::{Error, Result};
use crate::types::Credential;
use crate::utils::non_blank_lines;
use std::path::Path;
use tracing::{info, warn};

/// Read bearer tokens, one per non-blank line
///
/// A missing or unreadable file is an error; an empty file yields an empty list.
pub async fn read_tokens(path: &Path) -> Result<Vec<Credential>> {
    let text = tokio::fs::read_to_string(path).await.map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("failed to read {}: {}", path.display(), e),
        ))
    })?;

    let tokens: Vec<Credential> = non_blank_lines(&text)
        .into_iter()
        .map(Credential::new)
        .collect();
    info!(
        count = tokens.len(),
        "Loaded {} token{}",
        tokens.len(),
        if tokens.len() == 1 { "" } else { "s" }
    );
    Ok(tokens)
}

/// Read proxy URIs, one per non-blank line
///
/// A missing file is not an error: the result is an empty list.
pub async fn read_proxies(path: &Path) -> Vec<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => {
            let proxies = non_blank_lines(&text);
            if proxies.is_empty() {
                warn!("No proxies found. Proceeding without proxy.");
            } else {
                info!(
                    count = proxies.len(),
                    "Loaded {} prox{}",
                    proxies.len(),
                    if proxies.len() == 1 { "y" } else { "ies" }
                );
            }
            proxies
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Proxy file not found");
            Vec::new()
        }
    }
}

/// Proxy for the account at `index`, cycling through the list
pub fn assign_proxy(index: usize, proxies: &[String]) -> Option<&str> {
    if proxies.is_empty() {
        None
    } else {
        Some(proxies[index % proxies.len()].as_str())
    }
}

/// Proxies to use for this run
///
/// Empty when proxy mode is off, or when it is on but no proxy could be
/// loaded (proxy mode is then effectively disabled).
pub async fn load_proxy_pool(inputs: &InputConfig) -> Vec<String> {
    if !inputs.use_proxy {
        info!("Proceeding without proxy.");
        return Vec::new();
    }

    let proxies = read_proxies(&inputs.proxy_file).await;
    if proxies.is_empty() {
        warn!("No proxies available, proceeding without proxy.");
    }
    proxies
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn tokens_skip_blank_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("token.txt");
        fs::write(&path, "tokA\n\n  tokB  \n\n").unwrap();

        let tokens = read_tokens(&path).await.unwrap();
        let raw: Vec<&str> = tokens.iter().map(Credential::token).collect();
        assert_eq!(raw, vec!["tokA", "tokB"]);
    }

    #[tokio::test]
    async fn missing_token_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = read_tokens(&dir.path().join("absent.txt")).await.unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("absent.txt"));
    }

    #[tokio::test]
    async fn missing_proxy_file_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(read_proxies(&dir.path().join("proxy.txt")).await.is_empty());
    }

    #[test]
    fn proxies_are_assigned_round_robin() {
        let proxies = vec![
            "http://p0:1".to_string(),
            "socks5://p1:2".to_string(),
        ];
        assert_eq!(assign_proxy(0, &proxies), Some("http://p0:1"));
        assert_eq!(assign_proxy(1, &proxies), Some("socks5://p1:2"));
        assert_eq!(assign_proxy(2, &proxies), Some("http://p0:1"));
        assert_eq!(assign_proxy(5, &proxies), Some("socks5://p1:2"));
        assert_eq!(assign_proxy(0, &[]), None);
    }

    #[tokio::test]
    async fn proxy_pool_respects_flag() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("proxy.txt");
        fs::write(&path, "http://p0:1\n").unwrap();

        let mut inputs = InputConfig {
            proxy_file: path,
            use_proxy: false,
            ..InputConfig::default()
        };
        assert!(load_proxy_pool(&inputs).await.is_empty());

        inputs.use_proxy = true;
        assert_eq!(load_proxy_pool(&inputs).await, vec!["http://p0:1".to_string()]);
    }
}
