//! Endpoint / region / credentials / header resolution.
//!
//! Precedence: command-line flag > environment > YAML config file > default.
//!
//! Config file (YAML, all keys optional):
//!
//! ```yaml
//! endpoint_url: http://localhost:4566
//! region: eu-west-1
//! credentials:
//!   access_key_id: AKID...
//!   secret_access_key: ...
//!   session_token: ...
//! headers:
//!   x-trace: demo
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use url::Url;

use crate::api::sigv4::{self, Credentials, Signer};
use crate::api::{ApiError, HttpTransport};

pub const ENV_ENDPOINT: &str = "PCAAD_ENDPOINT_URL";
pub const ENV_CONFIG: &str = "PCAAD_CONFIG";

/// Region used for signing when only an explicit endpoint is configured.
const FALLBACK_SIGNING_REGION: &str = "us-east-1";

/// Values taken from global command-line flags.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub endpoint_url: Option<String>,
    pub region: Option<String>,
    pub config: Option<PathBuf>,
    /// Raw `KEY=VALUE` header flags.
    pub headers: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub endpoint_url: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub credentials: Option<FileCredentials>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    #[serde(default)]
    pub session_token: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse YAML config file: {}", path.display()))
    }
}

/// Fully resolved connection settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub endpoint: Url,
    pub region: String,
    pub credentials: Option<Credentials>,
    pub headers: Vec<(String, String)>,
}

impl Settings {
    /// Resolve against the process environment.
    pub fn resolve(overrides: &Overrides) -> Result<Self> {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve with an injected environment lookup. Blank values count as unset.
    pub fn resolve_with(
        overrides: &Overrides,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let env = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let file = match overrides.config.clone().or_else(|| env(ENV_CONFIG).map(PathBuf::from)) {
            Some(path) => FileConfig::load(&path)?,
            None => FileConfig::default(),
        };

        let explicit_endpoint = overrides
            .endpoint_url
            .clone()
            .or_else(|| env(ENV_ENDPOINT))
            .or(file.endpoint_url);

        let region = overrides
            .region
            .clone()
            .or_else(|| env("AWS_REGION"))
            .or_else(|| env("AWS_DEFAULT_REGION"))
            .or(file.region)
            .map(|r| r.trim().to_string());

        let (endpoint, region) = match (explicit_endpoint, region) {
            (Some(raw), region) => (
                parse_endpoint(&raw)?,
                region.unwrap_or_else(|| FALLBACK_SIGNING_REGION.to_string()),
            ),
            (None, Some(region)) => (default_endpoint(&region)?, region),
            (None, None) => {
                return Err(ApiError::Config(
                    "no region configured (use --region, AWS_REGION or --endpoint-url)".into(),
                )
                .into());
            }
        };

        let credentials = match (env("AWS_ACCESS_KEY_ID"), env("AWS_SECRET_ACCESS_KEY")) {
            (Some(access_key_id), Some(secret_access_key)) => Some(Credentials {
                access_key_id,
                secret_access_key,
                session_token: env("AWS_SESSION_TOKEN"),
            }),
            _ => file.credentials.map(|c| Credentials {
                access_key_id: c.access_key_id,
                secret_access_key: c.secret_access_key,
                session_token: c.session_token,
            }),
        };

        // File headers first, flags replace entries with the same name.
        let mut headers: Vec<(String, String)> = file.headers.into_iter().collect();
        for raw in &overrides.headers {
            let (k, v) = parse_header(raw)?;
            headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&k));
            headers.push((k, v));
        }

        Ok(Settings {
            endpoint,
            region,
            credentials,
            headers,
        })
    }

    pub fn transport(&self) -> Result<HttpTransport> {
        let signer = self
            .credentials
            .clone()
            .map(|c| Signer::new(c, self.region.clone(), sigv4::SERVICE));
        Ok(HttpTransport::new(self.endpoint.clone(), &self.headers, signer)?)
    }
}

fn default_endpoint(region: &str) -> Result<Url> {
    parse_endpoint(&format!("https://pca-connector-ad.{region}.amazonaws.com"))
}

/// Parse an endpoint URL; only http and https are accepted.
pub fn parse_endpoint(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Config("endpoint URL is empty".into()).into());
    }
    let url = Url::parse(trimmed)
        .map_err(|e| ApiError::Config(format!("invalid endpoint URL '{trimmed}': {e}")))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        scheme => Err(ApiError::Config(format!(
            "unsupported endpoint '{trimmed}' (scheme '{scheme}'; expected http or https)"
        ))
        .into()),
    }
}

/// `KEY=VALUE` header flag.
pub fn parse_header(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((k, v)) if !k.trim().is_empty() => Ok((k.trim().to_string(), v.trim().to_string())),
        Some(_) => Err(ApiError::Config(format!("invalid header (empty key): {raw}")).into()),
        None => Err(ApiError::Config(format!("invalid header (expected KEY=VALUE): {raw}")).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn yaml_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn region_builds_default_endpoint() {
        let settings =
            Settings::resolve_with(&Overrides::default(), env_of(&[("AWS_REGION", "eu-west-1")]))
                .unwrap();
        assert_eq!(
            settings.endpoint.as_str(),
            "https://pca-connector-ad.eu-west-1.amazonaws.com/"
        );
        assert_eq!(settings.region, "eu-west-1");
        assert!(settings.credentials.is_none());
    }

    #[test]
    fn flag_beats_env_beats_file() {
        let file = yaml_file("endpoint_url: http://file.local\nregion: ap-south-1\n");
        let overrides = Overrides {
            config: Some(file.path().to_path_buf()),
            ..Default::default()
        };

        let from_file = Settings::resolve_with(&overrides, env_of(&[])).unwrap();
        assert_eq!(from_file.endpoint.as_str(), "http://file.local/");
        assert_eq!(from_file.region, "ap-south-1");

        let env = env_of(&[(ENV_ENDPOINT, "http://env.local"), ("AWS_DEFAULT_REGION", "us-west-2")]);
        let from_env = Settings::resolve_with(&overrides, &env).unwrap();
        assert_eq!(from_env.endpoint.as_str(), "http://env.local/");
        assert_eq!(from_env.region, "us-west-2");

        let flags = Overrides {
            endpoint_url: Some("http://flag.local:9000".into()),
            region: Some("ca-central-1".into()),
            ..overrides
        };
        let from_flags = Settings::resolve_with(&flags, &env).unwrap();
        assert_eq!(from_flags.endpoint.as_str(), "http://flag.local:9000/");
        assert_eq!(from_flags.region, "ca-central-1");
    }

    #[test]
    fn config_path_from_env() {
        let file = yaml_file("region: sa-east-1\n");
        let path = file.path().to_string_lossy().into_owned();
        let settings =
            Settings::resolve_with(&Overrides::default(), env_of(&[(ENV_CONFIG, path.as_str())])).unwrap();
        assert_eq!(settings.region, "sa-east-1");
    }

    #[test]
    fn explicit_endpoint_without_region_signs_for_us_east_1() {
        let overrides = Overrides {
            endpoint_url: Some("http://127.0.0.1:4566".into()),
            ..Default::default()
        };
        let settings = Settings::resolve_with(&overrides, env_of(&[])).unwrap();
        assert_eq!(settings.region, "us-east-1");
    }

    #[test]
    fn missing_region_is_a_config_error() {
        let err = Settings::resolve_with(&Overrides::default(), env_of(&[("AWS_REGION", "  ")]))
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::Config(_))));
    }

    #[test]
    fn env_credentials_win_over_file() {
        let file = yaml_file(
            "region: us-east-1\ncredentials:\n  access_key_id: FILEKEY\n  secret_access_key: filesecret\n",
        );
        let overrides = Overrides {
            config: Some(file.path().to_path_buf()),
            ..Default::default()
        };

        let from_file = Settings::resolve_with(&overrides, env_of(&[])).unwrap();
        assert_eq!(from_file.credentials.unwrap().access_key_id, "FILEKEY");

        let env = env_of(&[
            ("AWS_ACCESS_KEY_ID", "ENVKEY"),
            ("AWS_SECRET_ACCESS_KEY", "envsecret"),
            ("AWS_SESSION_TOKEN", "tok"),
        ]);
        let creds = Settings::resolve_with(&overrides, env).unwrap().credentials.unwrap();
        assert_eq!(creds.access_key_id, "ENVKEY");
        assert_eq!(creds.session_token.as_deref(), Some("tok"));
    }

    #[test]
    fn header_flags_override_file_headers() {
        let file = yaml_file("region: us-east-1\nheaders:\n  X-Trace: file\n  x-keep: yes\n");
        let overrides = Overrides {
            config: Some(file.path().to_path_buf()),
            headers: vec!["x-trace=flag".into()],
            ..Default::default()
        };
        let settings = Settings::resolve_with(&overrides, env_of(&[])).unwrap();
        assert_eq!(
            settings.headers,
            vec![
                ("x-keep".to_string(), "yes".to_string()),
                ("x-trace".to_string(), "flag".to_string()),
            ]
        );
    }

    #[test]
    fn unknown_config_key_is_rejected() {
        let file = yaml_file("regoin: us-east-1\n");
        let overrides = Overrides {
            config: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let err = Settings::resolve_with(&overrides, env_of(&[])).unwrap_err();
        assert!(err.to_string().contains("failed to parse YAML config file"));
    }

    #[test]
    fn endpoint_scheme_must_be_http() {
        assert!(parse_endpoint("https://example.com").is_ok());
        assert!(parse_endpoint("ws://example.com").is_err());
        assert!(parse_endpoint("   ").is_err());
        assert!(parse_endpoint("not a url").is_err());
    }

    #[test]
    fn header_parsing() {
        assert_eq!(
            parse_header("x-a = b=c").unwrap(),
            ("x-a".to_string(), "b=c".to_string())
        );
        assert!(parse_header("=v").is_err());
        assert!(parse_header("novalue").is_err());
    }
}
