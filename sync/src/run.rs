use crate::store::collections::SETTINGS;
use crate::{ingest, resolve};

/// Everything one season pass needs, threaded explicitly through the
/// pipeline. No module-level store handles.
pub struct SyncContext {
    pub store: Box<dyn crate::store::Store>,
    pub transport: Box<dyn crate::transport::ReplayTransport>,
    pub parser: Box<dyn crate::parser::ReplayParser>,
    /// Scratch directory replays are written to for the parser; files are
    /// removed again after parsing, best effort.
    pub replay_dir: std::path::PathBuf,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub ingested: usize,
    pub already_processed: usize,
    pub unparseable: usize,
    pub missing_replays: usize,
}

#[derive(Debug)]
pub enum SyncError {
    Store(crate::store::StoreError),
    Transport(crate::transport::TransportError),
    Parser(crate::parser::ParserError),
    Io(std::io::Error),
}

impl From<crate::store::StoreError> for SyncError {
    fn from(value: crate::store::StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<std::io::Error> for SyncError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Drives one full pass over a season: resolve collections and rosters,
/// ingest every not-yet-processed replay of every reported match, then
/// persist the roster growth observed along the way.
///
/// The schedule and team list come in as arguments; fetching them is the
/// caller's business.
#[tracing::instrument(skip(ctx, matches, teams))]
pub async fn sync_season(
    ctx: &mut SyncContext,
    matches: &[common::ScheduledMatch],
    teams: &[common::RegisteredTeamEntry],
) -> Result<SyncSummary, SyncError> {
    let collection_map = resolve::create_collections(ctx.store.as_ref(), teams).await?;
    let mut book = resolve::create_teams(ctx.store.as_ref(), teams).await?;

    let mut summary = SyncSummary::default();

    for scheduled in matches {
        for replay in &scheduled.replays {
            let reference = match replay.url.as_deref() {
                Some(url) if !url.is_empty() => url,
                _ => {
                    // The feed reported a game without a file reference.
                    summary.missing_replays += 1;
                    continue;
                }
            };

            if ingest::already_processed(ctx.store.as_ref(), reference).await? {
                tracing::info!("Skipping {}", reference);
                summary.already_processed += 1;
                continue;
            }

            tracing::info!("Importing {}", reference);

            let bytes = match ctx.transport.fetch(reference).await {
                Ok(bytes) => bytes,
                Err(crate::transport::TransportError::NotFound(_)) => {
                    tracing::warn!("Replay {} missing from storage", reference);
                    summary.missing_replays += 1;
                    continue;
                }
                Err(e) => return Err(SyncError::Transport(e)),
            };

            let local_file = ctx.replay_dir.join(local_name(reference));
            tokio::fs::write(&local_file, &bytes).await?;

            let parsed = match ctx.parser.parse(&local_file).await {
                Ok(parsed) => parsed,
                Err(e) if e.is_fatal() => return Err(SyncError::Parser(e)),
                Err(e) => {
                    tracing::warn!("Parser rejected {}: {:?}", reference, e);
                    remove_replay(&local_file).await;
                    summary.unparseable += 1;
                    continue;
                }
            };

            remove_replay(&local_file).await;

            let assignment = book.reconcile(
                &scheduled.home.team_name,
                &scheduled.away.team_name,
                &parsed.players,
            );
            tracing::debug!(?assignment, "Reconciled {}", reference);

            if !parsed.is_supported() {
                // Not marked as processed: a future parser may do better.
                tracing::info!("Skipped {}, status is {}", reference, parsed.status);
                summary.unparseable += 1;
                continue;
            }

            let collection_ids =
                resolve::collection_ids_for_division(&collection_map, &scheduled.division_concat);

            ingest::insert_replay(
                ctx.store.as_ref(),
                &parsed.match_info,
                &parsed.players,
                &collection_ids,
            )
            .await?;
            ingest::update_players(ctx.store.as_ref(), &parsed.players).await?;
            ingest::mark_processed(ctx.store.as_ref(), reference).await?;
            ctx.store.flush().await?;

            summary.ingested += 1;
        }
    }

    // Persist the roster growth. Only tags that showed up in a replay have
    // a known handle; the rest stay schedule-only until they play.
    for team in teams {
        let roster = match book.team(&team.team_name) {
            Some(roster) => roster,
            None => continue,
        };

        let team_id = roster.id.clone();
        let handles: Vec<String> = roster
            .tags()
            .iter()
            .filter_map(|tag| book.handle_for_tag(tag))
            .map(str::to_string)
            .collect();

        for handle in handles {
            ctx.store
                .add_to_set(
                    SETTINGS,
                    &team_id,
                    "players",
                    serde_json::Value::String(handle),
                )
                .await?;
        }
    }

    ctx.store.flush().await?;

    Ok(summary)
}

fn local_name(reference: &str) -> String {
    reference
        .rsplit('/')
        .next()
        .unwrap_or(reference)
        .to_string()
}

async fn remove_replay(path: &std::path::Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!("Unable to delete {}: {:?}", path.display(), e);
    }
}
