//! Dotted field paths.
//!
//! A path is a sequence of `.`-separated segments. Each segment names a
//! child field and may carry an `[index]` suffix selecting one element of
//! an array-valued field (`"m_RenderDataKey.first.data[2]"`). The literal
//! segment `Array` is the explicit array marker: it resolves to the array
//! node itself and is how callers address "the array field" rather than an
//! element (`"Clips.Array"`).

use crate::error::{MapforgeError, Result};

/// One parsed path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub name: &'a str,
    pub index: Option<usize>,
}

/// Split a dotted path into segments, parsing `[index]` suffixes.
pub fn parse(path: &str) -> Result<Vec<Segment<'_>>> {
    if path.is_empty() {
        return Err(MapforgeError::InvalidPath(path.into()));
    }
    let mut segments = Vec::new();
    for raw in path.split('.') {
        let segment = match raw.find('[') {
            Some(open) => {
                if !raw.ends_with(']') || open == 0 {
                    return Err(MapforgeError::InvalidPath(path.into()));
                }
                let index = raw[open + 1..raw.len() - 1]
                    .parse::<usize>()
                    .map_err(|_| MapforgeError::InvalidPath(path.into()))?;
                Segment {
                    name: &raw[..open],
                    index: Some(index),
                }
            }
            None => {
                if raw.is_empty() {
                    return Err(MapforgeError::InvalidPath(path.into()));
                }
                Segment {
                    name: raw,
                    index: None,
                }
            }
        };
        segments.push(segment);
    }
    Ok(segments)
}
