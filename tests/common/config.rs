//! Configuration builders for tests against a mock API

use nexy_tasks::Config;
use std::fs;
use tempfile::TempDir;
use wiremock::MockServer;

/// Config pointing at `server`, reading tokens from a temp file
///
/// The returned [`TempDir`] must outlive the test run.
pub fn config_with_tokens(server: &MockServer, tokens: &[&str]) -> (Config, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let token_file = dir.path().join("token.txt");
    fs::write(&token_file, tokens.join("\n")).expect("Failed to write token file");

    let mut config = Config::default();
    config.api.base_url = server.uri();
    config.api.ip_echo_url = format!("{}/ip", server.uri());
    config.inputs.token_file = token_file;
    config.inputs.proxy_file = dir.path().join("proxy.txt");
    (config, dir)
}
