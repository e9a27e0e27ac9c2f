//! Eased interpolation along path legs.

use super::Waypoint;

/// Default peak speed boost, in pixels per frame, at the middle of a leg.
pub const MAX_PAN_SPEED: f64 = 5.0;

/// Pan speed at `progress` through a leg.
///
/// `k * p * (1 - p) + 1`: one pixel per frame at both ends, rising to
/// `k / 4 + 1` at the midpoint.
#[inline]
pub fn pan_speed(progress: f64, k: f64) -> f64 {
    k * (progress * (1.0 - progress)) + 1.0
}

/// Integer window origin, truncated toward zero from the planned position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Origin {
    /// Horizontal coordinate.
    pub x: i64,
    /// Vertical coordinate.
    pub y: i64,
}

impl Origin {
    fn truncate(x: f64, y: f64) -> Self {
        Self {
            x: x as i64,
            y: y as i64,
        }
    }
}

/// One planned frame on a leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegStep {
    /// Window origin for this frame.
    pub origin: Origin,
    /// Distance from the leg start at this frame.
    pub distance: f64,
    /// `distance / leg length`, or 1 for a zero-length leg.
    pub progress: f64,
    /// Speed used to advance to the next frame.
    pub speed: f64,
}

/// Plans frame origins across every leg of a path.
#[derive(Debug, Clone)]
pub struct PathPlanner<'a> {
    waypoints: &'a [Waypoint],
    pan_speed: f64,
}

impl<'a> PathPlanner<'a> {
    /// Creates a planner over `waypoints` with peak boost `pan_speed`.
    pub fn new(waypoints: &'a [Waypoint], pan_speed: f64) -> Self {
        Self {
            waypoints,
            pan_speed,
        }
    }

    /// Number of legs: one less than the number of waypoints.
    pub fn leg_count(&self) -> usize {
        self.waypoints.len().saturating_sub(1)
    }

    /// Iterates the legs in path order.
    pub fn legs(&self) -> impl Iterator<Item = Leg> + 'a {
        let k = self.pan_speed;
        self.waypoints
            .windows(2)
            .enumerate()
            .map(move |(index, pair)| Leg {
                index,
                start: pair[0],
                end: pair[1],
                pan_speed: k,
            })
    }

    /// Iterates every planned frame of every leg, tagged with its leg index.
    pub fn steps(&self) -> impl Iterator<Item = (usize, LegStep)> + 'a {
        self.legs()
            .flat_map(|leg| leg.origins().map(move |step| (leg.index, step)))
    }
}

/// A straight segment between two consecutive waypoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg {
    /// Position of the leg in its path.
    pub index: usize,
    /// First waypoint.
    pub start: Waypoint,
    /// Second waypoint.
    pub end: Waypoint,
    /// Peak speed boost.
    pub pan_speed: f64,
}

impl Leg {
    /// Euclidean length of the leg.
    pub fn length(&self) -> f64 {
        let dx = (self.end.x - self.start.x) as f64;
        let dy = (self.end.y - self.start.y) as f64;
        (dx.powi(2) + dy.powi(2)).sqrt()
    }

    /// Returns the lazy sequence of frame origins along this leg.
    pub fn origins(&self) -> LegOrigins {
        LegOrigins::new(self)
    }
}

/// Lazy, finite sequence of frames along one leg.
///
/// Always yields at least one frame. The last frame is the first one whose
/// distance from the start reaches the leg length, so it may lie up to one
/// step past the end point. A zero-length leg yields exactly one frame.
#[derive(Debug, Clone)]
pub struct LegOrigins {
    start: (f64, f64),
    direction: (f64, f64),
    position: (f64, f64),
    total: f64,
    k: f64,
    remaining: usize,
    finished: bool,
}

impl LegOrigins {
    fn new(leg: &Leg) -> Self {
        let total = leg.length();
        let start = (leg.start.x as f64, leg.start.y as f64);
        let direction = if total > 0.0 {
            (
                (leg.end.x - leg.start.x) as f64 / total,
                (leg.end.y - leg.start.y) as f64 / total,
            )
        } else {
            (0.0, 0.0)
        };
        // Every step before the last advances at least one pixel, so the
        // leg length bounds the step count. One extra step absorbs rounding.
        let remaining = total.ceil() as usize + 2;
        Self {
            start,
            direction,
            position: start,
            total,
            k: leg.pan_speed,
            remaining,
            finished: false,
        }
    }
}

impl Iterator for LegOrigins {
    type Item = LegStep;

    fn next(&mut self) -> Option<LegStep> {
        if self.finished {
            return None;
        }
        let (x, y) = self.position;

        if self.total == 0.0 {
            self.finished = true;
            return Some(LegStep {
                origin: Origin::truncate(x, y),
                distance: 0.0,
                progress: 1.0,
                speed: 0.0,
            });
        }

        let distance = ((x - self.start.0).powi(2) + (y - self.start.1).powi(2)).sqrt();
        let progress = distance / self.total;
        let speed = pan_speed(progress, self.k);

        self.position = (
            x + self.direction.0 * speed,
            y + self.direction.1 * speed,
        );
        self.remaining = self.remaining.saturating_sub(1);
        if distance >= self.total || self.remaining == 0 {
            self.finished = true;
        }

        Some(LegStep {
            origin: Origin::truncate(x, y),
            distance,
            progress,
            speed,
        })
    }
}

impl std::iter::FusedIterator for LegOrigins {}
