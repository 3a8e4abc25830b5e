//! Distance estimates for A*

use serde::{Deserialize, Serialize};

use crate::error::{LabError, Result};
use crate::graph::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Heuristic {
    #[default]
    Manhattan,
    Euclidean,
    /// Always zero: A* degrades to Dijkstra (breadth-first on unit edges)
    Dijkstra,
    /// Octile distance
    Diagonal,
}

impl Heuristic {
    pub const ALL: [Heuristic; 4] = [
        Heuristic::Manhattan,
        Heuristic::Euclidean,
        Heuristic::Dijkstra,
        Heuristic::Diagonal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Heuristic::Manhattan => "manhattan",
            Heuristic::Euclidean => "euclidean",
            Heuristic::Dijkstra => "dijkstra",
            Heuristic::Diagonal => "diagonal",
        }
    }

    /// Lookup by name; `None` for anything unrecognised
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "manhattan" => Some(Heuristic::Manhattan),
            "euclidean" => Some(Heuristic::Euclidean),
            "dijkstra" => Some(Heuristic::Dijkstra),
            "diagonal" | "octile" => Some(Heuristic::Diagonal),
            _ => None,
        }
    }

    /// Lookup for setup code: unknown names are a configuration error
    pub fn parse(name: &str) -> Result<Self> {
        Self::from_name(name).ok_or_else(|| LabError::UnknownHeuristic(name.to_string()))
    }

    pub fn estimate(&self, a: &Node, b: &Node) -> f32 {
        let dx = (a.x - b.x).abs();
        let dy = (a.y - b.y).abs();
        match self {
            Heuristic::Manhattan => dx + dy,
            Heuristic::Euclidean => (dx * dx + dy * dy).sqrt(),
            Heuristic::Dijkstra => 0.0,
            Heuristic::Diagonal => (dx + dy) + (std::f32::consts::SQRT_2 - 2.0) * dx.min(dy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(x: f32, y: f32) -> Node {
        Node {
            id: 0,
            x,
            y,
            connections: Vec::new(),
            traversable: true,
        }
    }

    #[test]
    fn test_estimates() {
        let a = node(0.0, 0.0);
        let b = node(3.0, 4.0);
        assert_eq!(Heuristic::Manhattan.estimate(&a, &b), 7.0);
        assert!((Heuristic::Euclidean.estimate(&a, &b) - 5.0).abs() < 1e-6);
        assert_eq!(Heuristic::Dijkstra.estimate(&a, &b), 0.0);
        let octile = 1.0 + 3.0 * std::f32::consts::SQRT_2;
        assert!((Heuristic::Diagonal.estimate(&a, &b) - octile).abs() < 1e-5);
    }

    #[test]
    fn test_names() {
        for h in Heuristic::ALL {
            assert_eq!(Heuristic::from_name(h.as_str()), Some(h));
        }
        assert_eq!(Heuristic::from_name("Manhattan "), Some(Heuristic::Manhattan));
        assert_eq!(Heuristic::from_name("chebyshev"), None);
        assert!(matches!(
            Heuristic::parse("chebyshev"),
            Err(LabError::UnknownHeuristic(name)) if name == "chebyshev"
        ));
    }
}
