//! Timestamped phoneme markers produced by speech synthesis

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A phoneme marker: the symbol becomes active at `time_ms` into the audio
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Marker {
    /// Offset from the start of the audio, in milliseconds
    pub time_ms: u64,
    /// Phoneme symbol as emitted by the synthesis provider
    pub symbol: String,
}

impl Marker {
    pub fn new(time_ms: u64, symbol: impl Into<String>) -> Self {
        Self {
            time_ms,
            symbol: symbol.into(),
        }
    }
}

/// Markers sorted ascending by `time_ms`
///
/// Immutable once built. Equal timestamps are allowed; a descending pair is not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Marker>", into = "Vec<Marker>")]
pub struct MarkerSequence {
    markers: Vec<Marker>,
}

impl MarkerSequence {
    /// Build a sequence, rejecting non-ascending timestamps
    pub fn new(markers: Vec<Marker>) -> Result<Self> {
        if let Some(idx) = markers.windows(2).position(|w| w[1].time_ms < w[0].time_ms) {
            return Err(Error::MalformedMarkers(format!(
                "marker {} at {}ms precedes marker {} at {}ms",
                idx + 1,
                markers[idx + 1].time_ms,
                idx,
                markers[idx].time_ms,
            )));
        }
        Ok(Self { markers })
    }

    /// Build a sequence, degrading malformed input to an empty sequence
    ///
    /// An empty sequence never activates a pose, so playback still runs with the
    /// face at rest instead of failing.
    pub fn lenient(markers: Vec<Marker>) -> Self {
        match Self::new(markers) {
            Ok(sequence) => sequence,
            Err(e) => {
                warn!("Discarding marker sequence: {}", e);
                Self::empty()
            }
        }
    }

    pub fn empty() -> Self {
        Self { markers: Vec::new() }
    }

    pub fn as_slice(&self) -> &[Marker] {
        &self.markers
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Marker> {
        self.markers.iter()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn first(&self) -> Option<&Marker> {
        self.markers.first()
    }

    pub fn last(&self) -> Option<&Marker> {
        self.markers.last()
    }

    pub fn get(&self, index: usize) -> Option<&Marker> {
        self.markers.get(index)
    }
}

impl TryFrom<Vec<Marker>> for MarkerSequence {
    type Error = Error;

    fn try_from(markers: Vec<Marker>) -> Result<Self> {
        Self::new(markers)
    }
}

impl From<MarkerSequence> for Vec<Marker> {
    fn from(sequence: MarkerSequence) -> Self {
        sequence.markers
    }
}

impl<'a> IntoIterator for &'a MarkerSequence {
    type Item = &'a Marker;
    type IntoIter = std::slice::Iter<'a, Marker>;

    fn into_iter(self) -> Self::IntoIter {
        self.markers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascending_sequence_accepted() {
        let seq = MarkerSequence::new(vec![
            Marker::new(0, "a"),
            Marker::new(200, "p"),
            Marker::new(200, "t"),
            Marker::new(500, "i"),
        ])
        .unwrap();
        assert_eq!(seq.len(), 4);
        assert_eq!(seq.first().unwrap().symbol, "a");
        assert_eq!(seq.last().unwrap().time_ms, 500);
    }

    #[test]
    fn test_descending_pair_rejected() {
        let result = MarkerSequence::new(vec![Marker::new(300, "a"), Marker::new(100, "p")]);
        let err = result.unwrap_err();
        assert!(matches!(err, Error::MalformedMarkers(_)));
        assert!(err.to_string().contains("precedes"));
    }

    #[test]
    fn test_lenient_degrades_to_empty() {
        let seq = MarkerSequence::lenient(vec![Marker::new(300, "a"), Marker::new(100, "p")]);
        assert!(seq.is_empty());

        let seq = MarkerSequence::lenient(vec![Marker::new(40, "a")]);
        assert_eq!(seq.len(), 1);
    }

    #[test]
    fn test_deserialize_validates_order() {
        let ok: MarkerSequence =
            serde_json::from_str(r#"[{"time_ms":5,"symbol":"a"},{"time_ms":9,"symbol":"o"}]"#).unwrap();
        assert_eq!(ok.get(1).unwrap().symbol, "o");

        let bad = serde_json::from_str::<MarkerSequence>(
            r#"[{"time_ms":9,"symbol":"a"},{"time_ms":5,"symbol":"o"}]"#,
        );
        assert!(bad.is_err());
    }
}
