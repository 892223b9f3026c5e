#[derive(Debug)]
pub enum ApiError {
    Request(reqwest::Error),
    Status(reqwest::StatusCode),
}

#[derive(Debug, serde::Deserialize)]
struct Envelope<T> {
    #[serde(rename = "returnObject")]
    return_object: T,
}

/// Client for the league's schedule/roster feed. Every call waits 50ms,
/// tries once, and on any failure waits a full second and returns the
/// second attempt's result unconditionally.
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    pub fn new<IS>(base_url: IS) -> Self
    where
        IS: Into<String>,
    {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub async fn reported_matches(
        &self,
        season: u32,
    ) -> Result<Vec<common::ScheduledMatch>, ApiError> {
        self.post(
            "schedule/fetch/reported/matches",
            &serde_json::json!({ "season": season }),
        )
        .await
    }

    pub async fn registered_teams(&self) -> Result<Vec<common::RegisteredTeamEntry>, ApiError> {
        self.get("team/get/registered").await
    }

    pub async fn get<T>(&self, route: &str) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        match self.request_get(route).await {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!("Fetching {} failed, retrying once: {:?}", route, e);
                tokio::time::sleep(std::time::Duration::from_millis(1000)).await;
                self.request_get(route).await
            }
        }
    }

    pub async fn post<B, T>(&self, route: &str, body: &B) -> Result<T, ApiError>
    where
        B: serde::Serialize + Sync,
        T: serde::de::DeserializeOwned,
    {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        match self.request_post(route, body).await {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!("Posting {} failed, retrying once: {:?}", route, e);
                tokio::time::sleep(std::time::Duration::from_millis(1000)).await;
                self.request_post(route, body).await
            }
        }
    }

    async fn request_get<T>(&self, route: &str) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .http
            .get(self.url(route))
            .send()
            .await
            .map_err(ApiError::Request)?;

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }

        response
            .json::<Envelope<T>>()
            .await
            .map(|envelope| envelope.return_object)
            .map_err(ApiError::Request)
    }

    async fn request_post<B, T>(&self, route: &str, body: &B) -> Result<T, ApiError>
    where
        B: serde::Serialize,
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .http
            .post(self.url(route))
            .json(body)
            .send()
            .await
            .map_err(ApiError::Request)?;

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }

        response
            .json::<Envelope<T>>()
            .await
            .map(|envelope| envelope.return_object)
            .map_err(ApiError::Request)
    }

    fn url(&self, route: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), route)
    }
}
