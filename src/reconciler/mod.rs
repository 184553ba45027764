mod columns;

use log::{debug, info};

use crate::config::games::{CONTACT_COLUMN, ID_COLUMN, NAME_COLUMN};
use crate::directory::PlayerDirectory;
use crate::domain::{Outcome, PlayerQuery, PlayerRecord, ScoreRequest};
use crate::errors::{CommandError, StoreError};
use crate::store::TabularStore;

pub use columns::{ColumnIndex, GamePositions};

/// Applies score submissions and adjustments to a worksheet.
///
/// Submissions only ever raise a stored score; adjustments overwrite it.
/// Both act on the directory snapshot taken by the last [`reload`], so
/// callers reload before every command.
///
/// [`reload`]: ScoreReconciler::reload
pub struct ScoreReconciler<S: TabularStore> {
    store: S,
    directory: PlayerDirectory,
}

impl<S: TabularStore> ScoreReconciler<S> {
    pub fn new(store: S) -> Self {
        Self::with_directory(store, PlayerDirectory::new())
    }

    pub fn with_directory(store: S, directory: PlayerDirectory) -> Self {
        Self { store, directory }
    }

    pub fn reload(&mut self) -> Result<(), StoreError> {
        self.directory.reload(&self.store)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn find(&self, query: &PlayerQuery) -> Option<(usize, &PlayerRecord)> {
        self.directory.find(query)
    }

    /// Record an attempt; the stored score only changes when beaten.
    ///
    /// Unknown players are appended with the next id.
    pub fn submit_score(&mut self, request: &ScoreRequest) -> Result<Outcome, CommandError> {
        let columns = self.column_index()?;
        let positions = columns.game(request.game)?;
        let score = parse_score(&request.raw_score)?;

        let Some((row, player)) = self.find_owned(&request.player) else {
            return self.create_player(&columns, request, score);
        };

        let name = display_name(&request.player, &player);
        let previous = player.score(request.game);

        if score > previous {
            self.write_score(row, positions, score, &request.timestamp)?;
            info!(
                "{}: {} (row {}) raised from {} to {} (by {})",
                request.game, name, row, previous, score, request.actor
            );
            Ok(Outcome::Updated {
                name,
                game: request.game,
                previous,
                current: score,
                actor: request.actor.clone(),
                timestamp: request.timestamp.clone(),
            })
        } else {
            debug!("{}: {} kept {} (attempt {})", request.game, name, previous, score);
            Ok(Outcome::Unchanged {
                name,
                game: request.game,
                current: previous,
                attempted: score,
            })
        }
    }

    /// Overwrite a known player's score, up or down.
    ///
    /// When the player is addressed by id and a name and contact are also
    /// given, those fields are rewritten too.
    pub fn adjust_score(&mut self, request: &ScoreRequest) -> Result<Outcome, CommandError> {
        let columns = self.column_index()?;
        let positions = columns.game(request.game)?;
        let score = parse_score(&request.raw_score)?;

        let (row, player) = self
            .find_owned(&request.player)
            .ok_or(CommandError::PlayerNotFound)?;

        if let PlayerQuery {
            id: Some(_),
            name: Some(name),
            contact: Some(contact),
        } = &request.player
        {
            let name_col = columns.position(NAME_COLUMN)?;
            let contact_col = columns.position(CONTACT_COLUMN)?;
            self.store.write_cell(row, name_col, name)?;
            self.store.write_cell(row, contact_col, contact)?;
            info!("Row {} renamed to {} / {}", row, name, contact);
        }

        self.write_score(row, positions, score, &request.timestamp)?;

        let name = display_name(&request.player, &player);
        info!(
            "{}: {} adjusted to {} (by {})",
            request.game, name, score, request.actor
        );
        Ok(Outcome::Adjusted {
            name,
            game: request.game,
            score,
            actor: request.actor.clone(),
            timestamp: request.timestamp.clone(),
        })
    }

    fn column_index(&self) -> Result<ColumnIndex, CommandError> {
        Ok(ColumnIndex::new(self.store.read_header()?))
    }

    fn find_owned(&self, query: &PlayerQuery) -> Option<(usize, PlayerRecord)> {
        self.directory
            .find(query)
            .map(|(row, record)| (row, record.clone()))
    }

    fn write_score(
        &mut self,
        row: usize,
        positions: GamePositions,
        score: f64,
        timestamp: &str,
    ) -> Result<(), CommandError> {
        // Two separate writes: a failure between them leaves the old timestamp
        self.store.write_cell(row, positions.score, &score.to_string())?;
        self.store.write_cell(row, positions.timestamp, timestamp)?;
        Ok(())
    }

    fn create_player(
        &mut self,
        columns: &ColumnIndex,
        request: &ScoreRequest,
        score: f64,
    ) -> Result<Outcome, CommandError> {
        columns.position(ID_COLUMN)?;
        let game_columns = request.game.columns();
        let id = self.directory.len() + 1;

        let values: Vec<String> = columns
            .header()
            .iter()
            .map(|column| match column.as_str() {
                ID_COLUMN => id.to_string(),
                NAME_COLUMN => request.player.name.clone().unwrap_or_default(),
                CONTACT_COLUMN => request.player.contact.clone().unwrap_or_default(),
                name if name == game_columns.score => score.to_string(),
                name if name == game_columns.timestamp => request.timestamp.clone(),
                _ => String::new(),
            })
            .collect();

        self.store.append_row(&values)?;
        info!(
            "{}: new player {} ({:?}) with {} (by {})",
            request.game, id, request.player.name, score, request.actor
        );

        Ok(Outcome::Created {
            id,
            name: request.player.name.clone(),
            contact: request.player.contact.clone(),
            game: request.game,
            score,
            actor: request.actor.clone(),
            timestamp: request.timestamp.clone(),
        })
    }
}

/// A submitted score; `nan` and `inf` parse as floats but are rejected
pub fn parse_score(raw: &str) -> Result<f64, CommandError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|score| score.is_finite())
        .ok_or_else(|| CommandError::InvalidScore(raw.to_string()))
}

fn display_name(query: &PlayerQuery, player: &PlayerRecord) -> String {
    query
        .name
        .clone()
        .unwrap_or_else(|| player.name().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Game, canonical_header};
    use crate::store::MemorySheet;

    const TS: &str = "01/01/2025 07:00:00";

    fn reconciler(rows: &[&[&str]]) -> ScoreReconciler<MemorySheet> {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|v| v.to_string()).collect::<Vec<String>>())
            .collect();
        let mut reconciler = ScoreReconciler::new(MemorySheet::with_rows(canonical_header(), rows));
        reconciler.reload().unwrap();
        reconciler
    }

    fn request(player: PlayerQuery, game: Game, score: &str) -> ScoreRequest {
        ScoreRequest {
            player,
            game,
            raw_score: score.to_string(),
            actor: "monitor".to_string(),
            timestamp: TS.to_string(),
        }
    }

    fn cell(reconciler: &ScoreReconciler<MemorySheet>, row: usize, col: usize) -> String {
        reconciler.store().read_cell(row, col).unwrap()
    }

    #[test]
    fn test_higher_score_updates_score_and_timestamp() {
        let mut reconciler = reconciler(&[&["1", "Ana", "@ana", "100", "old"]]);

        let outcome = reconciler
            .submit_score(&request(PlayerQuery::by_id("1"), Game::Touhou, "250.5"))
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::Updated {
                name: "Ana".to_string(),
                game: Game::Touhou,
                previous: 100.0,
                current: 250.5,
                actor: "monitor".to_string(),
                timestamp: TS.to_string(),
            }
        );
        assert_eq!(cell(&reconciler, 2, 4), "250.5");
        assert_eq!(cell(&reconciler, 2, 5), TS);
    }

    #[test]
    fn test_blank_stored_score_counts_as_zero() {
        let mut reconciler = reconciler(&[&["1", "Ana", "@ana"]]);

        let outcome = reconciler
            .submit_score(&request(PlayerQuery::by_id("1"), Game::Tetris, "5"))
            .unwrap();

        assert!(matches!(outcome, Outcome::Updated { previous, .. } if previous == 0.0));
        assert_eq!(cell(&reconciler, 2, 10), "5");
    }

    #[test]
    fn test_equal_or_lower_score_writes_nothing() {
        let mut reconciler = reconciler(&[&["1", "Ana", "@ana", "100", "old"]]);

        for attempt in ["100", "99.9"] {
            let outcome = reconciler
                .submit_score(&request(PlayerQuery::by_id("1"), Game::Touhou, attempt))
                .unwrap();
            assert!(matches!(outcome, Outcome::Unchanged { current, .. } if current == 100.0));
        }

        assert_eq!(reconciler.store().write_count(), 0);
        assert_eq!(cell(&reconciler, 2, 5), "old");
    }

    #[test]
    fn test_unknown_player_is_appended_with_next_id() {
        let mut reconciler = reconciler(&[&["1", "Ana", "@ana"], &["2", "Bia", "@bia"]]);

        let outcome = reconciler
            .submit_score(&request(
                PlayerQuery::by_name_and_contact("Caio", "@caio"),
                Game::Chicken,
                "42",
            ))
            .unwrap();

        assert!(matches!(outcome, Outcome::Created { id: 3, score, .. } if score == 42.0));
        let row = &reconciler.store().rows()[3];
        assert_eq!(row[0], "3");
        assert_eq!(row[1], "Caio");
        assert_eq!(row[2], "@caio");
        assert_eq!(row[7], "42");
        assert_eq!(row[8], TS);
        for idx in [3, 4, 5, 6, 9, 10] {
            assert_eq!(row[idx], "", "column {idx} should be blank");
        }
    }

    #[test]
    fn test_invalid_score_leaves_store_untouched() {
        let mut reconciler = reconciler(&[&["1", "Ana", "@ana"]]);

        let err = reconciler
            .submit_score(&request(PlayerQuery::by_id("1"), Game::Touhou, "abc"))
            .unwrap_err();

        assert!(matches!(err, CommandError::InvalidScore(ref raw) if raw == "abc"));
        assert_eq!(reconciler.store().write_count(), 0);
    }

    #[test]
    fn test_missing_game_column_is_reported() {
        let header = vec!["Id".to_string(), "Nome".to_string(), "Contato (telegram/numero)".to_string()];
        let mut reconciler = ScoreReconciler::new(MemorySheet::new(header));
        reconciler.reload().unwrap();

        let err = reconciler
            .submit_score(&request(PlayerQuery::by_id("1"), Game::Tetris, "10"))
            .unwrap_err();

        assert!(matches!(err, CommandError::ColumnNotFound(_)));
    }

    #[test]
    fn test_adjust_overwrites_downwards() {
        let mut reconciler = reconciler(&[&["1", "Ana", "@ana", "", "", "500", "old"]]);

        let outcome = reconciler
            .adjust_score(&request(PlayerQuery::by_id("1"), Game::GuitarHero, "100"))
            .unwrap();

        assert!(matches!(outcome, Outcome::Adjusted { score, .. } if score == 100.0));
        assert_eq!(cell(&reconciler, 2, 6), "100");
        assert_eq!(cell(&reconciler, 2, 7), TS);
    }

    #[test]
    fn test_adjust_unknown_player_never_creates() {
        let mut reconciler = reconciler(&[&["1", "Ana", "@ana"]]);

        let err = reconciler
            .adjust_score(&request(
                PlayerQuery::by_name_and_contact("Caio", "@caio"),
                Game::Touhou,
                "10",
            ))
            .unwrap_err();

        assert!(matches!(err, CommandError::PlayerNotFound));
        assert_eq!(reconciler.store().rows().len(), 2);
        assert_eq!(reconciler.store().write_count(), 0);
    }

    #[test]
    fn test_adjust_by_id_renames_player() {
        let mut reconciler = reconciler(&[&["1", "Ana", "@ana"]]);
        let player = PlayerQuery {
            id: Some("1".to_string()),
            name: Some("Ana Souza".to_string()),
            contact: Some("11999990000".to_string()),
        };

        let outcome = reconciler
            .adjust_score(&request(player, Game::Touhou, "80"))
            .unwrap();

        assert!(matches!(outcome, Outcome::Adjusted { ref name, .. } if name == "Ana Souza"));
        assert_eq!(cell(&reconciler, 2, 2), "Ana Souza");
        assert_eq!(cell(&reconciler, 2, 3), "11999990000");
        assert_eq!(cell(&reconciler, 2, 4), "80");
    }

    #[test]
    fn test_adjust_by_name_does_not_rename() {
        let mut reconciler = reconciler(&[&["1", "Ana", "@ana"]]);

        reconciler
            .adjust_score(&request(
                PlayerQuery::by_name_and_contact("ANA", "@new"),
                Game::Touhou,
                "80",
            ))
            .unwrap();

        assert_eq!(cell(&reconciler, 2, 2), "Ana");
        assert_eq!(cell(&reconciler, 2, 3), "@ana");
    }

    #[test]
    fn test_parse_score_accepts_padding() {
        assert_eq!(parse_score(" 250.5 ").unwrap(), 250.5);
        assert!(parse_score("12,5").is_err());
    }

    #[test]
    fn test_non_finite_scores_are_invalid() {
        let mut reconciler = reconciler(&[&["1", "Ana", "@ana", "100"]]);

        for raw in ["nan", "inf", "-infinity", "NaN"] {
            let err = reconciler
                .submit_score(&request(PlayerQuery::by_id("1"), Game::Touhou, raw))
                .unwrap_err();
            assert!(matches!(err, CommandError::InvalidScore(ref r) if r == raw));

            let err = reconciler
                .adjust_score(&request(PlayerQuery::by_id("1"), Game::Touhou, raw))
                .unwrap_err();
            assert!(matches!(err, CommandError::InvalidScore(_)));
        }

        assert_eq!(reconciler.store().write_count(), 0);
    }

    #[test]
    fn test_stored_nan_can_be_beaten() {
        let mut reconciler = reconciler(&[&["1", "Ana", "@ana", "NaN"]]);

        let outcome = reconciler
            .submit_score(&request(PlayerQuery::by_id("1"), Game::Touhou, "5"))
            .unwrap();

        assert!(matches!(outcome, Outcome::Updated { previous, current, .. } if previous == 0.0 && current == 5.0));
    }
}
