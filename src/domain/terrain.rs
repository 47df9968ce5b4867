//! Elevation/terrain classification (spec.md §3).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerrainType {
    Lowland,
    Hills,
    Mountains,
    HighMountains,
}

impl TerrainType {
    /// Strict elevation-band classification: <300, <1000, <2500, else
    /// (spec.md §3, `Terrain.terrain_type`).
    pub fn from_elevation_m(elevation_m: i32) -> Self {
        if elevation_m < 300 {
            TerrainType::Lowland
        } else if elevation_m < 1000 {
            TerrainType::Hills
        } else if elevation_m < 2500 {
            TerrainType::Mountains
        } else {
            TerrainType::HighMountains
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TerrainType::Lowland => "lowland",
            TerrainType::Hills => "hills",
            TerrainType::Mountains => "mountains",
            TerrainType::HighMountains => "high_mountains",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Terrain {
    pub elevation_m: i32,
    pub terrain_type: TerrainType,
    /// Not produced by any adapter in scope; carried as `null` on the wire
    /// (spec.md §6, `elevation.slope_degrees`).
    pub slope_degrees: Option<f64>,
}

impl Terrain {
    pub fn from_elevation_m(elevation_m: i32) -> Self {
        Self {
            elevation_m,
            terrain_type: TerrainType::from_elevation_m(elevation_m),
            slope_degrees: None,
        }
    }

    pub fn default_fallback() -> Self {
        Self::from_elevation_m(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elevation_1500_is_mountains_not_high_mountains() {
        assert_eq!(TerrainType::from_elevation_m(1500), TerrainType::Mountains);
    }

    #[test]
    fn elevation_2500_is_high_mountains() {
        assert_eq!(
            TerrainType::from_elevation_m(2500),
            TerrainType::HighMountains
        );
    }

    #[test]
    fn below_sea_level_is_lowland() {
        assert_eq!(TerrainType::from_elevation_m(-50), TerrainType::Lowland);
    }
}
