use crate::experiment::Game;

/// Canonical position of an algorithm tag on table axes. Unknown tags
/// sort last, keeping their first-appearance order among themselves.
pub fn alg_rank(tag: &str) -> i32 {
    match tag {
        "A-EFR_IN" => -1,
        "CFR" => 0,
        "CFR+" => 1,
        "A-EFR" => 6,
        "CFR_IN" => 8,
        "CFR_EX+IN" => 10,
        "BPS-EFR" => 14,
        "CFPS-EFR" => 16,
        "CFPS-EFR_EX+IN" => 18,
        "CSPS-EFR" => 20,
        "TIPS-EFR" => 22,
        "TIPS-EFR_EX+IN" => 24,
        "BEHAV-EFR" => 26,
        "avg" => 30,
        "BR" => 31,
        _ => i32::MAX,
    }
}

/// Short display label for an algorithm tag.
pub fn alg_label(tag: &str) -> &str {
    match tag {
        "CFR" => "CF",
        "A-EFR" => "ACT",
        "CFR_IN" => "CF_IN",
        "A-EFR_IN" => "ACT_IN",
        "CFR_EX+IN" => "CF_EX+IN",
        "BPS-EFR" => "BPS",
        "CFPS-EFR" => "CFPS",
        "CFPS-EFR_EX+IN" => "CFPS_EX+IN",
        "CSPS-EFR" => "CSPS",
        "TIPS-EFR" => "TIPS",
        "TIPS-EFR_EX+IN" => "TIPS_EX+IN",
        "BEHAV-EFR" => "BHV",
        _ => tag,
    }
}

/// Canonical position of a game tag on table axes.
pub fn game_rank(tag: &str) -> i32 {
    match tag {
        "leduc" => 0,
        "kuhn_3p" => 1,
        "kuhn_4p" => 2,
        "goofspiel" => 3,
        "goofspiel_ascending" => 4,
        "random_goofspiel" => 5,
        "goofspiel_3p" => 6,
        "goofspiel_ascending_3p" => 7,
        "sheriff" => 8,
        "tiny_bridge" => 9,
        "tiny_hanabi" => 10,
        _ if tag.starts_with("crewmates") => 11,
        "avg" => 20,
        _ => i32::MAX,
    }
}

/// Display label for a game tag, optionally carrying the time step.
/// Tags outside the known grammar label as themselves.
pub fn game_label(tag: &str, t: Option<u64>) -> String {
    match Game::try_from(tag) {
        Ok(game) => game.label(t),
        Err(_) => tag.to_string(),
    }
}
