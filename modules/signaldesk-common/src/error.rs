use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("classification failed: {0}")]
    Classification(String),

    #[error("claim verification failed: {0}")]
    Verification(String),

    #[error("impact analysis failed: {0}")]
    Analysis(String),

    #[error("routing judgment failed: {0}")]
    Judgment(String),

    #[error("draft generation failed: {0}")]
    DraftGeneration(String),

    #[error("story operation failed: {0}")]
    Story(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("persistence error: {0}")]
    Persistence(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
