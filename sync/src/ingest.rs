use crate::store::collections::{HERO_DATA, MATCHES, PARSED_REPLAYS, PLAYERS};
use crate::store::{doc, doc_id, to_document, Store, StoreError};

/// Whether a replay file already went through the full ingestion sequence.
/// The marker's absence is the only evidence it did not.
pub async fn already_processed(store: &dyn Store, reference: &str) -> Result<bool, StoreError> {
    let marker = store
        .find_one(
            PARSED_REPLAYS,
            &doc(serde_json::json!({ "_id": reference })),
        )
        .await?;

    Ok(marker.is_some())
}

pub async fn mark_processed(store: &dyn Store, reference: &str) -> Result<(), StoreError> {
    store
        .insert(
            PARSED_REPLAYS,
            doc(serde_json::json!({ "_id": reference })),
        )
        .await?;

    Ok(())
}

/// Writes one replay's match row and per-player stat rows. The match is
/// upserted on its (map, date, type) natural key, so re-ingesting the same
/// replay overwrites the row and keeps its identifier. The stat rows are
/// inserted fresh every time: calling this twice for one replay duplicates
/// them, which is why callers gate on the processed marker.
#[tracing::instrument(skip(store, match_info, players, collection_ids))]
pub async fn insert_replay(
    store: &dyn Store,
    match_info: &common::MatchMetadata,
    players: &[common::PlayerRecord],
    collection_ids: &[String],
) -> Result<String, StoreError> {
    let mut match_doc = to_document(match_info)?;
    match_doc.insert(
        "collection".to_string(),
        serde_json::json!(collection_ids),
    );

    let stored = store
        .upsert(
            MATCHES,
            &doc(serde_json::json!({
                "map": &match_info.map,
                "date": &match_info.date,
                "type": &match_info.kind,
            })),
            match_doc,
        )
        .await?;

    let match_id = doc_id(&stored)
        .map(str::to_string)
        .ok_or_else(|| StoreError::MissingId {
            collection: MATCHES.to_string(),
        })?;

    for player in players {
        let mut row = to_document(player)?;
        row.insert("matchID".to_string(), serde_json::json!(&match_id));
        row.insert("collection".to_string(), serde_json::json!(collection_ids));
        store.insert(HERO_DATA, row).await?;
    }

    Ok(match_id)
}

/// Folds one replay's players into the global player directory: the entry
/// is keyed by handle, every field is overwritten with the latest-seen
/// value, and the match counter goes up by one. Runs at most once per
/// replay, behind the same marker gate as `insert_replay`.
#[tracing::instrument(skip(store, players))]
pub async fn update_players(
    store: &dyn Store,
    players: &[common::PlayerRecord],
) -> Result<(), StoreError> {
    for player in players {
        let filter = doc(serde_json::json!({ "_id": &player.handle }));

        let previous = store.find_one(PLAYERS, &filter).await?;
        let matches = previous
            .as_ref()
            .and_then(|entry| entry.get("matches"))
            .and_then(serde_json::Value::as_i64)
            .unwrap_or(0)
            + 1;

        // The most recent replay wins every directory field, including the
        // tag a player currently goes by.
        let entry = doc(serde_json::json!({
            "_id": &player.handle,
            "name": &player.name,
            "uuid": &player.uuid,
            "region": player.region,
            "realm": player.realm,
            "tag": player.tag,
            "matches": matches,
        }));

        store.upsert(PLAYERS, &filter, entry).await?;
    }

    Ok(())
}
