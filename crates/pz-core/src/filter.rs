use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::{Kind, Point};

/// The ordered pole and zero sequences of one filter.
///
/// Points are appended at the end and removal shifts later points down, so
/// an index is only meaningful until the next add/remove on the same set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoleZeroSet {
    poles: Vec<Point>,
    zeros: Vec<Point>,
}

/// A point found by [`PoleZeroSet::hit_test`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub kind: Kind,
    pub index: usize,
    pub distance: f64,
}

impl PoleZeroSet {
    /// Build a set without validation. Use [`PoleZeroSet::from_points`] for
    /// anything that came from outside the program.
    pub fn new(poles: Vec<Point>, zeros: Vec<Point>) -> Self {
        Self { poles, zeros }
    }

    /// Build a set from external input, rejecting non-finite coordinates.
    pub fn from_points(poles: Vec<Point>, zeros: Vec<Point>) -> Result<Self> {
        check_finite(Kind::Pole, &poles)?;
        check_finite(Kind::Zero, &zeros)?;
        Ok(Self { poles, zeros })
    }

    /// Parse a filter description:
    ///
    /// ```toml
    /// poles = [[0.5, 0.5], [-0.8, 0.0]]
    /// zeros = [[0.0, 1.0], [0.0, -1.0]]
    /// ```
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let file: FilterFile = toml::from_str(raw).map_err(|source| Error::Parse {
            what: "filter description".into(),
            source,
        })?;
        Self::from_points(to_points(&file.poles), to_points(&file.zeros))
    }

    /// Read and parse a filter description file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let set = Self::from_toml_str(&raw)?;
        tracing::info!(
            path = %path.display(),
            poles = set.poles.len(),
            zeros = set.zeros.len(),
            "loaded filter"
        );
        Ok(set)
    }

    pub fn poles(&self) -> &[Point] {
        &self.poles
    }

    pub fn zeros(&self) -> &[Point] {
        &self.zeros
    }

    pub fn points(&self, kind: Kind) -> &[Point] {
        match kind {
            Kind::Pole => &self.poles,
            Kind::Zero => &self.zeros,
        }
    }

    fn points_mut(&mut self, kind: Kind) -> &mut Vec<Point> {
        match kind {
            Kind::Pole => &mut self.poles,
            Kind::Zero => &mut self.zeros,
        }
    }

    pub fn get(&self, kind: Kind, index: usize) -> Option<Point> {
        self.points(kind).get(index).copied()
    }

    /// Append a point and return its index.
    pub fn push(&mut self, kind: Kind, point: Point) -> usize {
        let set = self.points_mut(kind);
        set.push(point);
        set.len() - 1
    }

    /// Move the point at `index`. Returns `false` if the index is stale.
    pub fn set(&mut self, kind: Kind, index: usize, point: Point) -> bool {
        match self.points_mut(kind).get_mut(index) {
            Some(slot) => {
                *slot = point;
                true
            }
            None => false,
        }
    }

    /// Remove the point at `index`, shifting later points down.
    pub fn remove(&mut self, kind: Kind, index: usize) -> Option<Point> {
        let set = self.points_mut(kind);
        (index < set.len()).then(|| set.remove(index))
    }

    pub fn clear(&mut self) {
        self.poles.clear();
        self.zeros.clear();
    }

    /// Nearest point strictly within `radius` of `position`, across both
    /// sets. Equal distances resolve to poles before zeros, then to the
    /// lower index.
    pub fn hit_test(&self, position: Point, radius: f64) -> Option<Hit> {
        let candidates = self
            .poles
            .iter()
            .enumerate()
            .map(|(i, p)| (Kind::Pole, i, p))
            .chain(self.zeros.iter().enumerate().map(|(i, z)| (Kind::Zero, i, z)));

        let mut best: Option<Hit> = None;
        for (kind, index, point) in candidates {
            let distance = (point - position).norm();
            if distance >= radius {
                continue;
            }
            // strict comparison keeps the earlier candidate on ties
            if best.map_or(true, |b| distance < b.distance) {
                best = Some(Hit {
                    kind,
                    index,
                    distance,
                });
            }
        }
        best
    }
}

/// `max(1.5, max|Re| + 0.5, max|Im| + 0.5)`; 1.5 for no points.
pub fn view_limit<'a>(points: impl Iterator<Item = &'a Point>) -> f64 {
    points.fold(1.5_f64, |lim, p| {
        lim.max(p.re.abs() + 0.5).max(p.im.abs() + 0.5)
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FilterFile {
    #[serde(default)]
    poles: Vec<[f64; 2]>,
    #[serde(default)]
    zeros: Vec<[f64; 2]>,
}

fn to_points(pairs: &[[f64; 2]]) -> Vec<Point> {
    pairs.iter().map(|&[re, im]| Point::new(re, im)).collect()
}

fn check_finite(kind: Kind, points: &[Point]) -> Result<()> {
    match points.iter().position(|p| !p.is_finite()) {
        Some(index) => Err(Error::NonFinitePoint {
            kind,
            index,
            value: points[index],
        }),
        None => Ok(()),
    }
}
