use thiserror::Error;

use crate::parser::Keyword;

/// Failures of the tabular store itself (environment, not user input)
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Aba '{sheet}' não encontrada. Abas disponíveis: {}", available.join(", "))]
    SheetNotFound { sheet: String, available: Vec<String> },

    #[error("Erro ao acessar a planilha: {0}")]
    Access(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Access(err.to_string())
    }
}

impl From<r2d2::Error> for StoreError {
    fn from(err: r2d2::Error) -> Self {
        Self::Access(err.to_string())
    }
}

/// Everything that can stop a single chat command from completing
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("/{command} recebeu {found} argumento(s) em um formato inválido")]
    ArgumentArity { command: Keyword, found: usize },

    #[error("pontuação inválida: {0}")]
    InvalidScore(String),

    #[error("jogo desconhecido: {0}")]
    UnknownGame(String),

    #[error("jogador não encontrado")]
    PlayerNotFound,

    #[error("coluna '{0}' não encontrada no cabeçalho")]
    ColumnNotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CommandError {
    /// Problems with what the user typed, including players that do not
    /// exist; the rest are failures of the sheet itself
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::ArgumentArity { .. }
                | Self::InvalidScore(_)
                | Self::UnknownGame(_)
                | Self::PlayerNotFound
        )
    }
}
