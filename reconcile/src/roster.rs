/// One registered team's run-scoped roster: `name#tag` identities, in
/// insertion order, no duplicates. The persisted team document stores
/// player handles instead, which only the end-of-run pass touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRoster {
    pub id: String,
    pub name: String,
    tags: Vec<String>,
}

impl TeamRoster {
    pub fn new<I, N>(id: I, name: N) -> Self
    where
        I: Into<String>,
        N: Into<String>,
    {
        Self {
            id: id.into(),
            name: name.into(),
            tags: Vec::new(),
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|existing| existing == tag)
    }

    /// Appends a tag unless it is already rostered. Returns whether the
    /// roster grew. Rosters never shrink.
    pub fn add(&mut self, tag: &str) -> bool {
        if self.contains(tag) {
            return false;
        }

        self.tags.push(tag.to_string());
        true
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// Which scheduled team each in-game side of a replay was matched to. A
/// side stays unresolved when neither roster clears the overlap threshold,
/// which is the expected outcome for withdrawn teams and forfeits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayAssignment {
    pub blue: Option<String>,
    pub red: Option<String>,
}

/// Splits a replay's players into blue-side and red-side tag lists.
pub fn partition_sides(players: &[common::PlayerRecord]) -> (Vec<String>, Vec<String>) {
    let mut blue = Vec::new();
    let mut red = Vec::new();

    for player in players {
        if player.team == 0 {
            blue.push(player.battle_tag());
        } else {
            red.push(player.battle_tag());
        }
    }

    (blue, red)
}

/// Decides which of the two scheduled teams fielded the given side. A team
/// wins the side when more than two of the side's tags are on its roster
/// and it beats the other team's count. Ties and thin overlaps stay
/// unresolved.
pub fn find_matching_team<'t>(
    home: Option<&'t TeamRoster>,
    away: Option<&'t TeamRoster>,
    tags: &[String],
) -> Option<&'t TeamRoster> {
    let mut home_count = 0;
    let mut away_count = 0;

    for tag in tags {
        if home.map(|team| team.contains(tag)).unwrap_or(false) {
            home_count += 1;
        }

        if away.map(|team| team.contains(tag)).unwrap_or(false) {
            away_count += 1;
        }
    }

    if home_count > 2 && home_count > away_count {
        home
    } else if away_count > 2 && away_count > home_count {
        away
    } else {
        // Withdrawn teams and forfeits never clear the threshold.
        None
    }
}

/// The single source of truth for roster state during one run: team name
/// to roster, plus the reverse map from observed `name#tag` identities to
/// player handles that the end-of-run roster persistence needs.
#[derive(Debug, Default)]
pub struct RosterBook {
    teams: std::collections::HashMap<String, TeamRoster>,
    handles: std::collections::HashMap<String, String>,
}

impl RosterBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_team(&mut self, roster: TeamRoster) {
        self.teams.insert(roster.name.clone(), roster);
    }

    pub fn team(&self, name: &str) -> Option<&TeamRoster> {
        self.teams.get(name)
    }

    /// Adds a schedule-declared member to a team's roster. Unknown team
    /// names are ignored, matching how the schedule can mention teams that
    /// de-registered mid-season.
    pub fn add_member(&mut self, team: &str, tag: &str) -> bool {
        match self.teams.get_mut(team) {
            Some(roster) => roster.add(tag),
            None => false,
        }
    }

    pub fn handle_for_tag(&self, tag: &str) -> Option<&str> {
        self.handles.get(tag).map(String::as_str)
    }

    /// Reconciles one parsed replay against the match's scheduled teams:
    /// assigns each side, then grows the resolved rosters with every tag
    /// not yet on them. Both assignments are decided against the rosters
    /// as they stood before this replay. Every player is recorded in the
    /// tag-to-handle map regardless of the outcome, since later replays or
    /// the end-of-run pass may still need the handle.
    pub fn reconcile(
        &mut self,
        home: &str,
        away: &str,
        players: &[common::PlayerRecord],
    ) -> ReplayAssignment {
        let (blue_tags, red_tags) = partition_sides(players);

        let blue = find_matching_team(self.teams.get(home), self.teams.get(away), &blue_tags)
            .map(|team| team.name.clone());
        let red = find_matching_team(self.teams.get(home), self.teams.get(away), &red_tags)
            .map(|team| team.name.clone());

        if let Some(team) = &blue {
            self.grow_roster(team, &blue_tags);
        }

        if let Some(team) = &red {
            self.grow_roster(team, &red_tags);
        }

        for player in players {
            self.handles
                .insert(player.battle_tag(), player.handle.clone());
        }

        ReplayAssignment { blue, red }
    }

    fn grow_roster(&mut self, team: &str, tags: &[String]) {
        let roster = match self.teams.get_mut(team) {
            Some(roster) => roster,
            None => return,
        };

        for tag in tags {
            if roster.add(tag) {
                tracing::info!("Adding ORS {} to {}", tag, roster.name);
            }
        }
    }
}
