use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Stored image: public URL plus the storage key used to delete it later
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
    pub key: String,
}

/// How an update treats the image of a workspace or project
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageChange {
    /// No image part was sent
    #[default]
    Keep,
    /// A new file was uploaded
    Replace(ImageRef),
    /// An empty image value was sent
    Clear,
}

/// Success envelope: every JSON response body is `{ "data": ... }`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// List payload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentList<T> {
    pub documents: Vec<T>,
    pub total: usize,
}

impl<T> DocumentList<T> {
    pub fn empty() -> Self {
        Self {
            documents: Vec::new(),
            total: 0,
        }
    }
}

impl<T> From<Vec<T>> for DocumentList<T> {
    fn from(documents: Vec<T>) -> Self {
        let total = documents.len();
        Self { documents, total }
    }
}
