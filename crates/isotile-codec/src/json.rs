// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! JSON encoding and decoding for tile chunks.
//!
//! A chunk travels as a 2D array. Each tile is either an object
//! `{"position": [x, y], "content": ...}` or a tuple `[[x, y], content]`.
//! Due to Rust's orphan rules, we use wire types and convert.

use isotile_port::{Chunk, ChunkError, LogicalPosition, TileData};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

/// Error type for chunk decoding.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The body was not valid JSON for the chunk shape.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// The body decoded but its rows are ragged.
    #[error(transparent)]
    Chunk(#[from] ChunkError),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireTile<C> {
    Object { position: [i64; 2], content: C },
    Tuple([i64; 2], C),
}

impl<C> From<WireTile<C>> for TileData<C> {
    fn from(wire: WireTile<C>) -> Self {
        let ([x, y], content) = match wire {
            WireTile::Object { position, content } => (position, content),
            WireTile::Tuple(position, content) => (position, content),
        };
        TileData {
            position: LogicalPosition { x, y },
            content,
        }
    }
}

#[derive(Serialize)]
struct WireTileRef<'a, C> {
    position: [i64; 2],
    content: &'a C,
}

/// Decode a JSON body into a validated chunk.
pub fn decode_chunk<C>(bytes: &[u8]) -> Result<Chunk<C>, CodecError>
where
    C: DeserializeOwned,
{
    let wire: Vec<Vec<WireTile<C>>> = serde_json::from_slice(bytes)?;
    let rows: Vec<Vec<TileData<C>>> = wire
        .into_iter()
        .map(|row| row.into_iter().map(TileData::from).collect())
        .collect();
    Ok(Chunk::from_rows(rows)?)
}

/// Encode a chunk in the object form.
pub fn encode_chunk<C>(chunk: &Chunk<C>) -> Result<Vec<u8>, CodecError>
where
    C: Serialize,
{
    let wire: Vec<Vec<WireTileRef<'_, C>>> = chunk
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .map(|tile| WireTileRef {
                    position: [tile.position.x, tile.position.y],
                    content: &tile.content,
                })
                .collect()
        })
        .collect();
    Ok(serde_json::to_vec(&wire)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn decodes_object_form() {
        let body = br#"[[{"position":[0,0],"content":"grass"},{"position":[1,0],"content":"water"}]]"#;
        let chunk: Chunk<String> = decode_chunk(body).unwrap();
        assert_eq!(chunk.dimensions(), (1, 2));
        let tiles: Vec<_> = chunk.iter().cloned().collect();
        assert_eq!(tiles[1], TileData::new((1, 0), "water".to_string()));
    }

    #[test]
    fn decodes_tuple_form() {
        let body = br#"[[[[2,3],"sand"]],[[[2,4],"rock"]]]"#;
        let chunk: Chunk<String> = decode_chunk(body).unwrap();
        assert_eq!(chunk.dimensions(), (2, 1));
        assert_eq!(
            chunk.iter().map(|t| t.position).collect::<Vec<_>>(),
            [LogicalPosition::new(2, 3), LogicalPosition::new(2, 4)]
        );
    }

    #[test]
    fn structured_content_decodes() {
        #[derive(Debug, Clone, PartialEq, Deserialize)]
        struct Terrain {
            kind: String,
            height: u8,
        }
        let body = br#"[[{"position":[5,5],"content":{"kind":"hill","height":3}}]]"#;
        let chunk: Chunk<Terrain> = decode_chunk(body).unwrap();
        assert_eq!(chunk.iter().next().map(|t| t.content.height), Some(3));
    }

    #[test]
    fn ragged_body_is_rejected() {
        let body = br#"[[[[0,0],"a"],[[1,0],"b"]],[[[0,1],"c"]]]"#;
        let err = decode_chunk::<String>(body).unwrap_err();
        assert!(matches!(err, CodecError::Chunk(ChunkError::Ragged { row: 1, .. })));
    }

    #[test]
    fn garbage_is_a_json_error() {
        let err = decode_chunk::<String>(b"<html>502</html>").unwrap_err();
        assert!(matches!(err, CodecError::Json(_)));
    }

    #[test]
    fn encoded_chunk_decodes_to_same_tiles() {
        let chunk = Chunk::from_rows(vec![vec![
            TileData::new((0, 0), "grass".to_string()),
            TileData::new((1, 0), "tree".to_string()),
        ]])
        .unwrap();
        let bytes = encode_chunk(&chunk).unwrap();
        assert_eq!(decode_chunk::<String>(&bytes).unwrap(), chunk);
    }
}
