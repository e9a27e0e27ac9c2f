//! Waypoints and the directives that build waypoint lists.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors in a path directive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectiveError {
    #[error("point list is empty; expected a count followed by coordinates")]
    MissingCount,
    #[error("point count {0} is negative")]
    NegativeCount(i64),
    #[error("point list declares {declared} points but supplies {supplied} coordinates")]
    CountMismatch { declared: i64, supplied: usize },
    #[error("odd number of coordinates ({0}); coordinates come in x/y pairs")]
    OddCoordinateCount(usize),
}

/// A point on the camera path, in source raster coordinates.
///
/// Coordinates are always non-negative: every constructor that accepts
/// signed input takes the absolute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i64; 2]", into = "[i64; 2]")]
pub struct Waypoint {
    /// Horizontal coordinate.
    pub x: i64,
    /// Vertical coordinate.
    pub y: i64,
}

impl Waypoint {
    /// Creates a waypoint from signed coordinates, taking absolute values.
    pub fn new(x: i64, y: i64) -> Self {
        Self {
            x: x.saturating_abs(),
            y: y.saturating_abs(),
        }
    }

    /// Pairs up a flattened `x, y, x, y, ...` coordinate list.
    pub fn from_flat(coords: &[i64]) -> Result<Vec<Self>, DirectiveError> {
        if coords.len() % 2 != 0 {
            return Err(DirectiveError::OddCoordinateCount(coords.len()));
        }
        Ok(coords
            .chunks_exact(2)
            .map(|pair| Self::new(pair[0], pair[1]))
            .collect())
    }
}

impl From<[i64; 2]> for Waypoint {
    fn from([x, y]: [i64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<Waypoint> for [i64; 2] {
    fn from(w: Waypoint) -> Self {
        [w.x, w.y]
    }
}

impl std::fmt::Display for Waypoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One path-building instruction.
///
/// Directives are concatenated in order into a single waypoint list, so
/// two tracks given one after another are joined by a connecting leg.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathDirective {
    /// A single leg between two points.
    Track {
        /// Leg start.
        from: Waypoint,
        /// Leg end.
        to: Waypoint,
    },
    /// An arbitrary list of points.
    Points(Vec<Waypoint>),
}

impl PathDirective {
    /// Builds a track from `[x1, y1, x2, y2]`.
    pub fn track([x1, y1, x2, y2]: [i64; 4]) -> Self {
        Self::Track {
            from: Waypoint::new(x1, y1),
            to: Waypoint::new(x2, y2),
        }
    }

    /// Builds a point list from `[n, x1, y1, ..., xn, yn]`.
    pub fn points(values: &[i64]) -> Result<Self, DirectiveError> {
        let (&declared, coords) = values.split_first().ok_or(DirectiveError::MissingCount)?;
        if declared < 0 {
            return Err(DirectiveError::NegativeCount(declared));
        }
        if u64::try_from(coords.len()).ok() != (declared as u64).checked_mul(2) {
            return Err(DirectiveError::CountMismatch {
                declared,
                supplied: coords.len(),
            });
        }
        Ok(Self::Points(Waypoint::from_flat(coords)?))
    }

    /// Appends this directive's waypoints to `path`.
    pub fn extend_path(&self, path: &mut Vec<Waypoint>) {
        match self {
            Self::Track { from, to } => path.extend([*from, *to]),
            Self::Points(points) => path.extend_from_slice(points),
        }
    }

    /// Concatenates directives into one waypoint list.
    pub fn flatten<'a>(directives: impl IntoIterator<Item = &'a PathDirective>) -> Vec<Waypoint> {
        let mut path = Vec::new();
        for directive in directives {
            directive.extend_path(&mut path);
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_takes_absolute_values() {
        assert_eq!(Waypoint::new(-3, 4), Waypoint { x: 3, y: 4 });
        assert_eq!(Waypoint::from([5, -6]), Waypoint { x: 5, y: 6 });
    }

    #[test]
    fn test_from_flat_pairs() {
        let points = Waypoint::from_flat(&[0, 0, 10, -5]).unwrap();
        assert_eq!(points, vec![Waypoint::new(0, 0), Waypoint::new(10, 5)]);
        assert_eq!(
            Waypoint::from_flat(&[1, 2, 3]),
            Err(DirectiveError::OddCoordinateCount(3))
        );
    }

    #[test]
    fn test_points_directive_checks_count() {
        let d = PathDirective::points(&[2, 0, 0, 4, 4]).unwrap();
        assert_eq!(
            d,
            PathDirective::Points(vec![Waypoint::new(0, 0), Waypoint::new(4, 4)])
        );

        assert_eq!(
            PathDirective::points(&[3, 0, 0, 4, 4]),
            Err(DirectiveError::CountMismatch {
                declared: 3,
                supplied: 4
            })
        );
        assert_eq!(PathDirective::points(&[]), Err(DirectiveError::MissingCount));
        assert_eq!(
            PathDirective::points(&[-1]),
            Err(DirectiveError::NegativeCount(-1))
        );
    }

    #[test]
    fn test_flatten_joins_directives_in_order() {
        let directives = vec![
            PathDirective::track([0, 0, 10, 10]),
            PathDirective::points(&[1, 20, 20]).unwrap(),
            PathDirective::track([30, 30, 40, 40]),
        ];
        let path = PathDirective::flatten(&directives);
        assert_eq!(
            path,
            vec![
                Waypoint::new(0, 0),
                Waypoint::new(10, 10),
                Waypoint::new(20, 20),
                Waypoint::new(30, 30),
                Waypoint::new(40, 40),
            ]
        );
    }

    #[test]
    fn test_waypoint_toml_shape() {
        #[derive(Deserialize)]
        struct Doc {
            path: Vec<Waypoint>,
        }
        let doc: Doc = toml::from_str("path = [[0, 0], [-12, 7]]").unwrap();
        assert_eq!(doc.path, vec![Waypoint::new(0, 0), Waypoint::new(12, 7)]);
    }
}
