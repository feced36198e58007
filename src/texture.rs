use std::collections::HashMap;
use std::io;
use std::path::Path;

use thiserror::Error;

use crate::world::WallType;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("could not read texture file")]
    Io(#[from] io::Error),
    #[error("texture has no samples")]
    Empty,
    #[error("line {line}: invalid sample {token:?}")]
    BadSample { line: usize, token: String },
    #[error("texture is {rows}x{cols}, must be square")]
    NotSquare { rows: usize, cols: usize },
}

/// Square grid of 8-bit samples, immutable after load. Loaded once at
/// startup; a load failure aborts initialization, it is never handled
/// per frame.
pub struct Texture {
    size: usize,
    samples: Vec<u8>,
}

impl Texture {
    /// Parses the comma-delimited asset format: one u8 per cell, as many
    /// rows as columns.
    pub fn parse(text: &str) -> Result<Self, TextureError> {
        let mut samples = Vec::new();
        let mut rows = 0;
        let mut cols = None;
        for (i, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let mut row_len = 0;
            for token in line.split(',') {
                let value: u8 =
                    token
                        .trim()
                        .parse()
                        .map_err(|_| TextureError::BadSample {
                            line: i + 1,
                            token: token.trim().to_owned(),
                        })?;
                samples.push(value);
                row_len += 1;
            }
            match cols {
                None => cols = Some(row_len),
                Some(c) if c != row_len => {
                    return Err(TextureError::NotSquare {
                        rows: rows + 1,
                        cols: row_len,
                    });
                }
                Some(_) => {}
            }
            rows += 1;
        }
        let cols = cols.ok_or(TextureError::Empty)?;
        if rows != cols {
            return Err(TextureError::NotSquare { rows, cols });
        }
        Ok(Self {
            size: cols,
            samples,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TextureError> {
        Self::parse(&std::fs::read_to_string(path)?)
    }

    /// Edge length in texels.
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn at(&self, col: usize, row: usize) -> u8 {
        self.samples[row * self.size + col]
    }
}

/// Wall-type keyed texture table, populated once at load time. A wall type
/// with no entry renders as a flat fallback color in the projector.
#[derive(Default)]
pub struct TextureSet {
    by_wall: HashMap<WallType, Texture>,
}

impl TextureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, wall: WallType, texture: Texture) {
        self.by_wall.insert(wall, texture);
    }

    pub fn get(&self, wall: WallType) -> Option<&Texture> {
        self.by_wall.get(&wall)
    }
}
