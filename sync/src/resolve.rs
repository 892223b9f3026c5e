use crate::store::collections::SETTINGS;
use crate::store::{doc, doc_id, Store, StoreError};

/// Makes sure every collection the season's team list requires exists in
/// the store, creating missing ones exactly once, and returns the full
/// name-to-identifier map.
#[tracing::instrument(skip(store, teams))]
pub async fn create_collections(
    store: &dyn Store,
    teams: &[common::RegisteredTeamEntry],
) -> Result<std::collections::HashMap<String, String>, StoreError> {
    let required = reconcile::division::required_collection_names(teams);

    let existing = store
        .find(SETTINGS, &doc(serde_json::json!({ "type": "collection" })))
        .await?;

    let mut collection_map = std::collections::HashMap::new();
    for entry in &existing {
        if let (Some(name), Some(id)) = (
            entry.get("name").and_then(serde_json::Value::as_str),
            doc_id(entry),
        ) {
            collection_map.insert(name.to_string(), id.to_string());
        }
    }

    for name in required {
        if collection_map.contains_key(&name) {
            continue;
        }

        let created = store
            .insert(
                SETTINGS,
                doc(serde_json::json!({ "type": "collection", "name": &name })),
            )
            .await?;

        if let Some(id) = doc_id(&created) {
            collection_map.insert(name, id.to_string());
        }
    }

    Ok(collection_map)
}

/// Seeds the run's roster book from the persisted team settings, creating
/// store entries for teams the schedule knows but the store does not, and
/// merges in every schedule-declared member. The persisted `players`
/// arrays hold handles and are left out of the tag rosters entirely.
#[tracing::instrument(skip(store, teams))]
pub async fn create_teams(
    store: &dyn Store,
    teams: &[common::RegisteredTeamEntry],
) -> Result<reconcile::roster::RosterBook, StoreError> {
    let existing = store
        .find(SETTINGS, &doc(serde_json::json!({ "type": "team" })))
        .await?;

    let mut book = reconcile::roster::RosterBook::new();
    for entry in &existing {
        if let (Some(name), Some(id)) = (
            entry.get("name").and_then(serde_json::Value::as_str),
            doc_id(entry),
        ) {
            book.insert_team(reconcile::roster::TeamRoster::new(id, name));
        }
    }

    for team in teams {
        if book.team(&team.team_name).is_none() {
            let created = store
                .insert(
                    SETTINGS,
                    doc(serde_json::json!({
                        "type": "team",
                        "name": &team.team_name,
                        "players": [],
                    })),
                )
                .await?;

            if let Some(id) = doc_id(&created) {
                book.insert_team(reconcile::roster::TeamRoster::new(id, &team.team_name));
            }
        }

        // Rostered players declared by the schedule always apply. Subs
        // discovered in replays come in later through reconciliation.
        for member in &team.team_members {
            book.add_member(&team.team_name, &member.display_name);
        }
    }

    Ok(book)
}

/// Resolves a match's division label to the collection identifiers its
/// records are tagged with. Names missing from the map mean the division
/// never appeared in the registered team list; they are dropped loudly
/// rather than stored as nulls.
pub fn collection_ids_for_division(
    collection_map: &std::collections::HashMap<String, String>,
    division: &str,
) -> Vec<String> {
    let mut ids = Vec::new();

    for name in reconcile::division::collection_names_for_division(division) {
        match collection_map.get(&name) {
            Some(id) => ids.push(id.clone()),
            None => {
                tracing::warn!("No collection named {:?} for division {:?}", name, division);
            }
        }
    }

    ids
}
