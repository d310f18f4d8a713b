use serde::{Deserialize, Serialize};

/// One search hit: a vector position and its inner-product score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    /// Position in the index, equal to the chunk id
    pub position: usize,

    /// Cosine similarity with the query (higher is closer)
    pub score: f32,
}
