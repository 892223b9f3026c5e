/// A stored document: a JSON object carrying its identifier under `_id`.
pub type Document = serde_json::Map<String, serde_json::Value>;

pub mod collections {
    pub const MATCHES: &str = "matches";
    pub const HERO_DATA: &str = "hero_data";
    pub const PLAYERS: &str = "players";
    pub const SETTINGS: &str = "settings";
    pub const PARSED_REPLAYS: &str = "parsed_replays";
}

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Corrupt {
        collection: String,
        error: serde_json::Error,
    },
    Encode(serde_json::Error),
    NotAnObject,
    MissingDocument {
        collection: String,
        id: String,
    },
    MissingId {
        collection: String,
    },
    FieldNotArray {
        collection: String,
        field: String,
    },
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// The capability surface every persistence consumer is written against:
/// indexed find, insert, upsert-by-filter and atomic add-to-set over named
/// document collections, plus an explicit flush. Filters match on
/// field-by-field equality. There is deliberately no increment operation;
/// counters are maintained by read-then-upsert under the pipeline's
/// single-writer model.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    async fn find(&self, collection: &str, filter: &Document) -> Result<Vec<Document>, StoreError>;

    /// Stores a new document. A caller-supplied `_id` is honored, anything
    /// without one gets a generated identifier. Returns the stored
    /// document.
    async fn insert(&self, collection: &str, document: Document) -> Result<Document, StoreError>;

    /// Replaces the first document matching `filter` wholesale, keeping
    /// its `_id`, or stores the document fresh when nothing matches.
    async fn upsert(
        &self,
        collection: &str,
        filter: &Document,
        document: Document,
    ) -> Result<Document, StoreError>;

    /// Appends `value` to the array field of the identified document
    /// unless an equal element is already present.
    async fn add_to_set(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: serde_json::Value,
    ) -> Result<(), StoreError>;

    async fn flush(&self) -> Result<(), StoreError>;

    async fn find_one(
        &self,
        collection: &str,
        filter: &Document,
    ) -> Result<Option<Document>, StoreError> {
        Ok(self.find(collection, filter).await?.into_iter().next())
    }
}

/// Convenience for building filters and documents from `serde_json::json!`
/// literals.
pub fn doc(value: serde_json::Value) -> Document {
    match value {
        serde_json::Value::Object(map) => map,
        _ => Document::new(),
    }
}

pub fn doc_id(document: &Document) -> Option<&str> {
    document.get("_id").and_then(serde_json::Value::as_str)
}

pub fn to_document<T>(value: &T) -> Result<Document, StoreError>
where
    T: serde::Serialize,
{
    match serde_json::to_value(value).map_err(StoreError::Encode)? {
        serde_json::Value::Object(map) => Ok(map),
        _ => Err(StoreError::NotAnObject),
    }
}

fn matches_filter(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, value)| document.get(key) == Some(value))
}

/// File-backed store engine: one JSON array per collection under the store
/// directory, loaded on open, rewritten on flush via a temp file rename.
/// League-sized data fits comfortably in memory; anything bigger belongs
/// behind a different `Store` implementation.
pub struct JsonFileStore {
    dir: std::path::PathBuf,
    collections: std::sync::Mutex<std::collections::HashMap<String, Vec<Document>>>,
}

impl JsonFileStore {
    pub fn open<P>(dir: P) -> Result<Self, StoreError>
    where
        P: Into<std::path::PathBuf>,
    {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;

        let mut collections = std::collections::HashMap::new();
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().map(|ext| ext != "json").unwrap_or(true) {
                continue;
            }

            let name = match path.file_stem().and_then(|stem| stem.to_str()) {
                Some(stem) => stem.to_string(),
                None => continue,
            };

            let raw = std::fs::read(&path)?;
            let documents: Vec<Document> =
                serde_json::from_slice(&raw).map_err(|error| StoreError::Corrupt {
                    collection: name.clone(),
                    error,
                })?;
            collections.insert(name, documents);
        }

        Ok(Self {
            dir,
            collections: std::sync::Mutex::new(collections),
        })
    }

    fn generate_id() -> serde_json::Value {
        serde_json::Value::String(uuid::Uuid::now_v7().to_string())
    }
}

#[async_trait::async_trait]
impl Store for JsonFileStore {
    async fn find(&self, collection: &str, filter: &Document) -> Result<Vec<Document>, StoreError> {
        let state = self.collections.lock().expect("store lock poisoned");

        Ok(state
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|document| matches_filter(document, filter))
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default())
    }

    async fn insert(&self, collection: &str, document: Document) -> Result<Document, StoreError> {
        let mut document = document;
        if !document.contains_key("_id") {
            document.insert("_id".to_string(), Self::generate_id());
        }

        let mut state = self.collections.lock().expect("store lock poisoned");
        state
            .entry(collection.to_string())
            .or_default()
            .push(document.clone());

        Ok(document)
    }

    async fn upsert(
        &self,
        collection: &str,
        filter: &Document,
        document: Document,
    ) -> Result<Document, StoreError> {
        let mut document = document;

        let mut state = self.collections.lock().expect("store lock poisoned");
        let documents = state.entry(collection.to_string()).or_default();

        match documents
            .iter_mut()
            .find(|existing| matches_filter(existing, filter))
        {
            Some(existing) => {
                if let Some(id) = existing.get("_id").cloned() {
                    document.insert("_id".to_string(), id);
                }
                *existing = document.clone();
            }
            None => {
                if !document.contains_key("_id") {
                    document.insert("_id".to_string(), Self::generate_id());
                }
                documents.push(document.clone());
            }
        }

        Ok(document)
    }

    async fn add_to_set(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: serde_json::Value,
    ) -> Result<(), StoreError> {
        let mut state = self.collections.lock().expect("store lock poisoned");

        let document = state
            .get_mut(collection)
            .and_then(|documents| {
                documents
                    .iter_mut()
                    .find(|document| doc_id(document) == Some(id))
            })
            .ok_or_else(|| StoreError::MissingDocument {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

        let entry = document
            .entry(field.to_string())
            .or_insert_with(|| serde_json::Value::Array(Vec::new()));

        match entry {
            serde_json::Value::Array(items) => {
                if !items.contains(&value) {
                    items.push(value);
                }
                Ok(())
            }
            _ => Err(StoreError::FieldNotArray {
                collection: collection.to_string(),
                field: field.to_string(),
            }),
        }
    }

    async fn flush(&self) -> Result<(), StoreError> {
        let snapshot: Vec<(String, Vec<Document>)> = {
            let state = self.collections.lock().expect("store lock poisoned");
            state
                .iter()
                .map(|(name, documents)| (name.clone(), documents.clone()))
                .collect()
        };

        for (name, documents) in snapshot {
            let raw = serde_json::to_vec(&documents).map_err(StoreError::Encode)?;

            let path = self.dir.join(format!("{}.json", name));
            let staging = path.with_extension("json.tmp");
            tokio::fs::write(&staging, raw).await?;
            tokio::fs::rename(&staging, &path).await?;
        }

        Ok(())
    }
}
