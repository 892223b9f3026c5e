/// The flagship division. Its matches are the only ones not tagged with
/// the catch-all collection.
pub const FLAGSHIP_DIVISION: &str = "Storm";

/// Collection holding every match played outside the flagship division.
pub const CATCH_ALL_COLLECTION: &str = "Non-Storm";

/// Normalizes a division label to its canonical title-case, space-separated
/// form. The feed spells the same division differently depending on the
/// endpoint ("east-coastal" vs "East Coastal"), so this has to be applied
/// on every path that touches collection names.
pub fn normalize_division(label: &str) -> String {
    label
        .split([' ', '-'])
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The set of collection names a season's team list requires: every
/// distinct division, the parent region of every two-word division, and
/// the catch-all. Order is first-seen order, duplicates collapse.
pub fn required_collection_names(teams: &[common::RegisteredTeamEntry]) -> Vec<String> {
    let mut required: Vec<String> = Vec::new();

    for team in teams {
        let division = normalize_division(&team.division_display_name);
        if !required.contains(&division) {
            required.push(division);
        }
    }

    let regions: Vec<String> = required
        .iter()
        .filter_map(|name| name.split_once(' ').map(|(region, _)| region.to_string()))
        .collect();
    for region in regions {
        if !required.contains(&region) {
            required.push(region);
        }
    }

    if !required.iter().any(|name| name == CATCH_ALL_COLLECTION) {
        required.push(CATCH_ALL_COLLECTION.to_string());
    }

    required
}

/// Collection names one match belongs to, derived from its division label:
/// the division itself, the parent region for a two-word division, and the
/// catch-all for everything outside the flagship division.
pub fn collection_names_for_division(label: &str) -> Vec<String> {
    let division = normalize_division(label);

    let mut names = Vec::new();
    if let Some((region, _)) = division.split_once(' ') {
        names.push(division.clone());
        names.push(region.to_string());
    } else {
        names.push(division.clone());
    }

    if division != FLAGSHIP_DIVISION {
        names.push(CATCH_ALL_COLLECTION.to_string());
    }

    names
}
