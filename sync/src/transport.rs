#[derive(Debug)]
pub enum TransportError {
    /// The referenced replay does not exist at the source. Surfaced
    /// separately so the pipeline can skip the file instead of aborting.
    NotFound(String),
    Other(String),
}

/// Resolves a replay-file reference from the schedule feed to its bytes.
#[async_trait::async_trait]
pub trait ReplayTransport: Send + Sync {
    async fn fetch(&self, reference: &str) -> Result<Vec<u8>, TransportError>;
}

/// Authenticated object-storage download, the hosted deployment.
pub struct S3Transport {
    bucket: std::sync::Arc<s3::Bucket>,
}

impl S3Transport {
    pub fn new(
        bucket_name: &str,
        region: s3::region::Region,
        credentials: s3::creds::Credentials,
    ) -> Result<Self, TransportError> {
        let mut bucket = s3::bucket::Bucket::new(bucket_name, region, credentials)
            .map_err(|e| TransportError::Other(format!("Opening replay bucket: {:?}", e)))?;
        bucket.set_path_style();

        Ok(Self {
            bucket: bucket.into(),
        })
    }
}

#[async_trait::async_trait]
impl ReplayTransport for S3Transport {
    async fn fetch(&self, reference: &str) -> Result<Vec<u8>, TransportError> {
        let response = match self.bucket.get_object(reference).await {
            Ok(response) => response,
            Err(s3::error::S3Error::HttpFailWithBody(404, _)) => {
                return Err(TransportError::NotFound(reference.to_string()));
            }
            Err(e) => {
                return Err(TransportError::Other(format!(
                    "Loading {} from bucket: {:?}",
                    reference, e
                )));
            }
        };

        Ok(response.to_vec())
    }
}

/// Plain HTTP download from a public base url, the self-hosted deployment.
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new<IS>(base_url: IS) -> Self
    where
        IS: Into<String>,
    {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait::async_trait]
impl ReplayTransport for HttpTransport {
    async fn fetch(&self, reference: &str) -> Result<Vec<u8>, TransportError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), reference);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| TransportError::Other(format!("Requesting {}: {:?}", url, e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(TransportError::NotFound(reference.to_string()));
        }

        if !response.status().is_success() {
            return Err(TransportError::Other(format!(
                "Requesting {}: status {}",
                url,
                response.status()
            )));
        }

        response
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(|e| TransportError::Other(format!("Reading {}: {:?}", url, e)))
    }
}

/// Reads replays from a pre-populated local directory instead of fetching
/// them, for working against an existing cache.
pub struct DirTransport {
    dir: std::path::PathBuf,
}

impl DirTransport {
    pub fn new<P>(dir: P) -> Self
    where
        P: Into<std::path::PathBuf>,
    {
        Self { dir: dir.into() }
    }
}

#[async_trait::async_trait]
impl ReplayTransport for DirTransport {
    async fn fetch(&self, reference: &str) -> Result<Vec<u8>, TransportError> {
        let path = self.dir.join(reference);

        tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TransportError::NotFound(reference.to_string())
            } else {
                TransportError::Other(format!("Reading {}: {:?}", path.display(), e))
            }
        })
    }
}
