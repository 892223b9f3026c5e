#[derive(Debug)]
pub enum ArchiveError {
    S3(String),
    Io(std::io::Error),
    Zip(zip::result::ZipError),
}

impl From<std::io::Error> for ArchiveError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<zip::result::ZipError> for ArchiveError {
    fn from(value: zip::result::ZipError) -> Self {
        Self::Zip(value)
    }
}

/// Round-trips the store directory through durable storage for the hosted
/// deployment: a per-season "current" archive restored on startup, plus an
/// immutable timestamped copy per run.
pub struct StatsArchive {
    bucket: std::sync::Arc<s3::Bucket>,
    folder: String,
    season: u32,
}

impl StatsArchive {
    pub fn new<IS>(
        bucket_name: &str,
        region: s3::region::Region,
        credentials: s3::creds::Credentials,
        folder: IS,
        season: u32,
    ) -> Result<Self, ArchiveError>
    where
        IS: Into<String>,
    {
        let mut bucket = s3::bucket::Bucket::new(bucket_name, region, credentials)
            .map_err(|e| ArchiveError::S3(format!("Opening stats bucket: {:?}", e)))?;
        bucket.set_path_style();

        Ok(Self {
            bucket: bucket.into(),
            folder: folder.into(),
            season,
        })
    }

    fn current_key(&self) -> String {
        format!(
            "{}/{}/stats-season{}-current.zip",
            self.folder, self.season, self.season
        )
    }

    fn daily_key(&self, stamp: &str) -> String {
        format!(
            "{}/{}/stats-season{}-{}.zip",
            self.folder, self.season, self.season, stamp
        )
    }

    /// Downloads and unpacks the season's current archive into `db_dir`.
    /// A missing archive means this is the first run for the season and
    /// returns `false`.
    #[tracing::instrument(skip(self, db_dir, scratch))]
    pub async fn download_current(
        &self,
        db_dir: &std::path::Path,
        scratch: &std::path::Path,
    ) -> Result<bool, ArchiveError> {
        let response = match self.bucket.get_object(self.current_key()).await {
            Ok(response) => response,
            Err(s3::error::S3Error::HttpFailWithBody(404, _)) => {
                tracing::info!("No current archive found for season {}", self.season);
                return Ok(false);
            }
            Err(e) => {
                return Err(ArchiveError::S3(format!(
                    "Downloading current archive: {:?}",
                    e
                )));
            }
        };

        let zip_path = scratch.join("stats-old.zip");
        tokio::fs::write(&zip_path, response.to_vec()).await?;

        let mut archive = zip::ZipArchive::new(std::fs::File::open(&zip_path)?)?;
        archive.extract(db_dir)?;

        tracing::info!("Downloaded current archive for season {}", self.season);
        Ok(true)
    }

    /// Packages `db_dir` and uploads it under the run's daily key, then
    /// again under the current key.
    #[tracing::instrument(skip(self, db_dir, scratch))]
    pub async fn publish(
        &self,
        db_dir: &std::path::Path,
        scratch: &std::path::Path,
    ) -> Result<(), ArchiveError> {
        let stamp = chrono::Utc::now().format("%Y_%m_%dT%H_%M_%S").to_string();
        let daily_key = self.daily_key(&stamp);

        std::fs::write(
            db_dir.join("TIMESTAMP.TXT"),
            format!("Created from {}.\n", daily_key),
        )?;

        let zip_path = scratch.join("stats-new.zip");
        write_archive(db_dir, &zip_path)?;
        let bytes = tokio::fs::read(&zip_path).await?;

        self.bucket
            .put_object(&daily_key, &bytes)
            .await
            .map_err(|e| ArchiveError::S3(format!("Uploading daily archive: {:?}", e)))?;
        tracing::info!("Uploaded archive as {}", daily_key);

        self.bucket
            .put_object(self.current_key(), &bytes)
            .await
            .map_err(|e| ArchiveError::S3(format!("Uploading current archive: {:?}", e)))?;
        tracing::info!("Updated current archive");

        Ok(())
    }
}

fn write_archive(db_dir: &std::path::Path, zip_path: &std::path::Path) -> Result<(), ArchiveError> {
    let mut writer = zip::ZipWriter::new(std::fs::File::create(zip_path)?);
    let options = zip::write::SimpleFileOptions::default();

    for entry in std::fs::read_dir(db_dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }

        let name = match path.file_name().and_then(|name| name.to_str()) {
            Some(name) => name.to_string(),
            None => continue,
        };

        writer.start_file(name, options)?;
        std::io::Write::write_all(&mut writer, &std::fs::read(&path)?)?;
    }

    writer.finish()?;
    Ok(())
}
