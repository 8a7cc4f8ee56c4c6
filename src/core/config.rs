use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub aws: AwsConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    /// Create the bucket and table at startup when they are missing
    pub auto_create_resources: bool,
}

/// Connection settings shared by the object store (S3) and the
/// metadata store (DynamoDB)
#[derive(Clone)]
pub struct AwsConfig {
    /// Endpoint used by the service to reach both stores
    pub endpoint: String,
    /// Endpoint used when building object URLs handed to clients
    pub public_endpoint: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Bucket holding the image payloads
    pub bucket_name: String,
    /// Table holding the image records
    pub table_name: String,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            aws: AwsConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let auto_create_resources = match env::var("AUTO_CREATE_RESOURCES") {
            Ok(value) => parse_bool(&value)
                .ok_or_else(|| "AUTO_CREATE_RESOURCES must be true or false".to_string())?,
            Err(_) => true,
        };

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            auto_create_resources,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl AwsConfig {
    const DEFAULT_ENDPOINT: &'static str = "http://localhost:4566";
    const DEFAULT_REGION: &'static str = "ap-northeast-1";
    const DEFAULT_BUCKET_NAME: &'static str = "images-bucket";
    const DEFAULT_TABLE_NAME: &'static str = "images-table";

    pub fn from_env() -> Result<Self, String> {
        let endpoint = env::var("AWS_ENDPOINT")
            .unwrap_or_else(|_| Self::DEFAULT_ENDPOINT.to_string())
            .trim_end_matches('/')
            .to_string();

        let public_endpoint = env::var("AWS_PUBLIC_ENDPOINT")
            .ok()
            .filter(|s| !s.is_empty())
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|| public_endpoint_for(&endpoint));

        let region = env::var("AWS_REGION").unwrap_or_else(|_| Self::DEFAULT_REGION.to_string());

        let access_key_id = env::var("AWS_ACCESS_KEY_ID").unwrap_or_else(|_| "test".to_string());

        let secret_access_key =
            env::var("AWS_SECRET_ACCESS_KEY").unwrap_or_else(|_| "test".to_string());

        let bucket_name =
            env::var("BUCKET_NAME").unwrap_or_else(|_| Self::DEFAULT_BUCKET_NAME.to_string());

        let table_name =
            env::var("TABLE_NAME").unwrap_or_else(|_| Self::DEFAULT_TABLE_NAME.to_string());

        if bucket_name.is_empty() {
            return Err("BUCKET_NAME must not be empty".to_string());
        }
        if table_name.is_empty() {
            return Err("TABLE_NAME must not be empty".to_string());
        }

        Ok(Self {
            endpoint,
            public_endpoint,
            region,
            access_key_id,
            secret_access_key,
            bucket_name,
            table_name,
        })
    }
}

// Credentials stay out of startup logs.
impl std::fmt::Debug for AwsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsConfig")
            .field("endpoint", &self.endpoint)
            .field("public_endpoint", &self.public_endpoint)
            .field("region", &self.region)
            .field("access_key_id", &"***")
            .field("secret_access_key", &"***")
            .field("bucket_name", &self.bucket_name)
            .field("table_name", &self.table_name)
            .finish()
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        let title =
            env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Image Upload Service API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Upload, list and delete images".to_string());

        Ok(Self {
            title,
            version,
            description,
        })
    }
}

/// Derive the client-facing endpoint from the internal one.
///
/// Inside a compose network the stores are reached as `localstack`, which a
/// browser on the host cannot resolve, so that host is rewritten to
/// `localhost`.
pub fn public_endpoint_for(endpoint: &str) -> String {
    let Some((scheme, rest)) = endpoint.split_once("://") else {
        return endpoint.to_string();
    };

    let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let (authority, tail) = rest.split_at(authority_end);
    let (userinfo, host_port) = match authority.rsplit_once('@') {
        Some((userinfo, host_port)) => (Some(userinfo), host_port),
        None => (None, authority),
    };
    let (host, port) = match host_port.split_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (host_port, None),
    };

    if !host.eq_ignore_ascii_case("localstack") {
        return endpoint.to_string();
    }

    let mut public = format!("{}://", scheme);
    if let Some(userinfo) = userinfo {
        public.push_str(userinfo);
        public.push('@');
    }
    public.push_str("localhost");
    if let Some(port) = port {
        public.push(':');
        public.push_str(port);
    }
    public.push_str(tail);
    public
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_endpoint_rewrites_localstack_host() {
        assert_eq!(
            public_endpoint_for("http://localstack:4566"),
            "http://localhost:4566"
        );
    }

    #[test]
    fn test_public_endpoint_keeps_other_hosts() {
        assert_eq!(
            public_endpoint_for("http://localhost:4566"),
            "http://localhost:4566"
        );
        assert_eq!(
            public_endpoint_for("https://s3.ap-northeast-1.amazonaws.com"),
            "https://s3.ap-northeast-1.amazonaws.com"
        );
    }

    #[test]
    fn test_public_endpoint_matches_whole_host_only() {
        assert_eq!(
            public_endpoint_for("http://localstack-main:4566"),
            "http://localstack-main:4566"
        );
        assert_eq!(
            public_endpoint_for("http://localstack.internal:4566"),
            "http://localstack.internal:4566"
        );
        assert_eq!(
            public_endpoint_for("http://my-localstack:4566"),
            "http://my-localstack:4566"
        );
    }

    #[test]
    fn test_public_endpoint_rewrites_bare_and_path_forms() {
        assert_eq!(public_endpoint_for("http://localstack"), "http://localhost");
        assert_eq!(
            public_endpoint_for("http://localstack/prefix"),
            "http://localhost/prefix"
        );
        assert_eq!(
            public_endpoint_for("https://LocalStack:4566/"),
            "https://localhost:4566/"
        );
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool(" ON "), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("nope"), None);
    }

    #[test]
    fn test_aws_config_debug_hides_credentials() {
        let config = AwsConfig {
            endpoint: "http://localhost:4566".to_string(),
            public_endpoint: "http://localhost:4566".to_string(),
            region: "ap-northeast-1".to_string(),
            access_key_id: "AKIDEXAMPLE".to_string(),
            secret_access_key: "very-secret".to_string(),
            bucket_name: "images-bucket".to_string(),
            table_name: "images-table".to_string(),
        };

        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("AKIDEXAMPLE"));
        assert!(!rendered.contains("very-secret"));
        assert!(rendered.contains("images-bucket"));
    }
}
