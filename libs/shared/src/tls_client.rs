use reqwest::{Client, header::HeaderMap};
use rustls_platform_verifier::BuilderVerifierExt;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct TlsClientConfig {
    pub headers: HeaderMap,
    pub timeout: Option<Duration>,
    /// Skip certificate verification. Only meant for lab clusters with
    /// self-signed certificates.
    pub accept_invalid_certs: bool,
}

impl TlsClientConfig {
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_accept_invalid_certs(mut self, accept_invalid_certs: bool) -> Self {
        self.accept_invalid_certs = accept_invalid_certs;
        self
    }
}

pub fn create_tls_client(config: TlsClientConfig) -> Result<Client, String> {
    let mut builder = Client::builder().default_headers(config.headers);

    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }

    builder = if config.accept_invalid_certs {
        builder.danger_accept_invalid_certs(true)
    } else {
        // needed to use OS-provided CA certificates with Rustls
        let arc_crypto_provider = std::sync::Arc::new(rustls::crypto::ring::default_provider());
        let tls_config = rustls::ClientConfig::builder_with_provider(arc_crypto_provider)
            .with_safe_default_protocol_versions()
            .map_err(|e| format!("Failed to build client TLS config: {e}"))?
            .with_platform_verifier()
            .with_no_client_auth();
        builder.use_preconfigured_tls(tls_config)
    };

    builder
        .build()
        .map_err(|e| format!("Failed to create HTTP client: {e}"))
}
