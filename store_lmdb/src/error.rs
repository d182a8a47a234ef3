use thiserror::Error;

use geopass_store::StoreError;

#[derive(Debug, Error)]
pub enum LmdbError {
    #[error("LMDB error: {0}")]
    Heed(String),

    #[error("key not found: {0}")]
    NotFound(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<heed::Error> for LmdbError {
    fn from(e: heed::Error) -> Self {
        LmdbError::Heed(e.to_string())
    }
}

impl From<LmdbError> for StoreError {
    fn from(e: LmdbError) -> Self {
        match e {
            LmdbError::NotFound(key) => StoreError::NotFound(key),
            LmdbError::Serialization(msg) => StoreError::Serialization(msg),
            LmdbError::Heed(_) => StoreError::Backend(e.to_string()),
        }
    }
}
