//! A recorded route replayed as location samples.

use std::fs;
use std::io;
use std::path::Path;

use geocoin_core::{LatLng, LocationSource};

/// Yields the points of a JSON array like `[{"lat": 1.0, "lng": 2.0}, ...]` in order,
/// then reports no fix.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteFile {
    points: Vec<LatLng>,
    next: usize,
}

impl RouteFile {
    pub fn from_points(points: Vec<LatLng>) -> Self {
        Self { points, next: 0 }
    }

    pub fn load(path: &Path) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        let points: Vec<LatLng> = serde_json::from_str(&content)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        if let Some((index, point)) =
            points.iter().enumerate().find(|(_, point)| !point.is_on_globe())
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("route point {index} ({}, {}) is off the globe", point.lat, point.lng),
            ));
        }
        Ok(Self::from_points(points))
    }

    pub fn remaining(&self) -> usize {
        self.points.len() - self.next
    }
}

impl LocationSource for RouteFile {
    fn sample(&mut self) -> Option<LatLng> {
        let point = self.points.get(self.next).copied()?;
        self.next += 1;
        Some(point)
    }
}
