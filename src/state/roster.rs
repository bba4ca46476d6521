use log::warn;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A player on the roster: one of the bundled pros or a user-added name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub is_custom: bool,
}

impl Player {
    fn pro(name: &str, country: &str) -> Self {
        Self {
            name: name.to_string(),
            country: country.to_string(),
            is_custom: false,
        }
    }

    pub fn custom(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country: "--".to_string(),
            is_custom: true,
        }
    }
}

/// The player roster: bundled PDC pros plus persisted custom players.
/// Custom players are stored as JSON under the config dir; the pros are
/// compiled in and never written out.
#[derive(Debug, Clone)]
pub struct Roster {
    pub players: Vec<Player>,
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            players: bundled_pros(),
        }
    }
}

impl Roster {
    /// Bundled pros plus whatever custom players were saved previously.
    pub fn load() -> Self {
        let mut roster = Self::default();
        match load_custom_players() {
            Ok(custom) => roster.players.extend(custom),
            Err(e) => warn!("could not load custom players: {e}"),
        }
        roster
    }

    pub fn names(&self) -> Vec<String> {
        self.players.iter().map(|p| p.name.clone()).collect()
    }

    /// Add a custom player and persist. Empty and duplicate names are
    /// ignored with a `false` return so the caller can toast.
    pub fn add_custom(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.players.iter().any(|p| p.name == name) {
            return false;
        }
        self.players.push(Player::custom(name));
        self.persist();
        true
    }

    /// Remove a player by index; only custom players can be removed.
    pub fn remove(&mut self, index: usize) -> bool {
        match self.players.get(index) {
            Some(p) if p.is_custom => {
                self.players.remove(index);
                self.persist();
                true
            }
            _ => false,
        }
    }

    fn persist(&self) {
        let custom: Vec<&Player> = self.players.iter().filter(|p| p.is_custom).collect();
        if let Err(e) = save_custom_players(&custom) {
            warn!("could not save custom players: {e}");
        }
    }
}

fn load_custom_players() -> Result<Vec<Player>, String> {
    let path = roster_path();
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content =
        std::fs::read_to_string(&path).map_err(|e| format!("read roster failed: {e}"))?;
    serde_json::from_str(&content).map_err(|e| format!("parse roster failed: {e}"))
}

fn save_custom_players(players: &[&Player]) -> Result<(), String> {
    let path = roster_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| format!("create dir failed: {e}"))?;
    }
    let payload = serde_json::to_string_pretty(players)
        .map_err(|e| format!("serialize roster failed: {e}"))?;
    std::fs::write(&path, payload).map_err(|e| format!("write roster failed: {e}"))
}

fn roster_path() -> PathBuf {
    if let Ok(config_dir) = std::env::var("XDG_CONFIG_HOME")
        && !config_dir.trim().is_empty()
    {
        return PathBuf::from(config_dir).join("darttui").join("players.json");
    }
    if let Ok(home) = std::env::var("HOME")
        && !home.trim().is_empty()
    {
        return PathBuf::from(home)
            .join(".config")
            .join("darttui")
            .join("players.json");
    }
    PathBuf::from("players.json")
}

fn bundled_pros() -> Vec<Player> {
    vec![
        Player::pro("Luke Humphries", "ENG"),
        Player::pro("Luke Littler", "ENG"),
        Player::pro("Michael van Gerwen", "NED"),
        Player::pro("Gary Anderson", "SCO"),
        Player::pro("Peter Wright", "SCO"),
        Player::pro("Gerwyn Price", "WAL"),
        Player::pro("Rob Cross", "ENG"),
        Player::pro("Michael Smith", "ENG"),
        Player::pro("Nathan Aspinall", "ENG"),
        Player::pro("Jonny Clayton", "WAL"),
        Player::pro("Damon Heta", "AUS"),
        Player::pro("Dave Chisnall", "ENG"),
        Player::pro("Danny Noppert", "NED"),
        Player::pro("Josh Rock", "NIR"),
        Player::pro("Dimitri Van den Bergh", "BEL"),
        Player::pro("Raymond van Barneveld", "NED"),
        Player::pro("Krzysztof Ratajski", "POL"),
        Player::pro("Karel Sedlacek", "CZE"),
        Player::pro("Adam Gawlas", "CZE"),
        Player::pro("Mensur Suljovic", "AUT"),
        Player::pro("Gabriel Clemens", "GER"),
        Player::pro("Martin Schindler", "GER"),
        Player::pro("James Wade", "ENG"),
        Player::pro("Stephen Bunting", "ENG"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_pros_have_unique_names() {
        let roster = Roster::default();
        let mut names = roster.names();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), roster.players.len());
    }

    #[test]
    fn test_add_custom_rejects_duplicates_and_empty() {
        let mut roster = Roster::default();
        let existing = roster.players[0].name.clone();
        assert!(!roster.add_custom(&existing));
        assert!(!roster.add_custom("   "));
    }
}
