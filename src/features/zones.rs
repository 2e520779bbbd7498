//! Coarse spatial labels derived from normalised positions.

pub const UPPER_REGION: &str = "upper region";
pub const FOUNDATION_AND_BASE: &str = "foundation and base";
pub const PRIMARY_STRUCTURAL_AREAS: &str = "primary structural areas";
pub const SECONDARY_STRUCTURAL_ELEMENTS: &str = "secondary structural elements";

/// Zone label for a normalised `(x, y)` position (`y` grows downwards).
pub fn zone_label(centroid: [f32; 2]) -> &'static str {
    let [x, y] = centroid;
    if y < 0.33 {
        UPPER_REGION
    } else if y > 0.67 {
        FOUNDATION_AND_BASE
    } else if (x - 0.5).abs() <= 0.2 {
        PRIMARY_STRUCTURAL_AREAS
    } else {
        SECONDARY_STRUCTURAL_ELEMENTS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zones_follow_vertical_bands_then_centre() {
        assert_eq!(zone_label([0.5, 0.1]), UPPER_REGION);
        assert_eq!(zone_label([0.1, 0.9]), FOUNDATION_AND_BASE);
        assert_eq!(zone_label([0.55, 0.5]), PRIMARY_STRUCTURAL_AREAS);
        assert_eq!(zone_label([0.9, 0.5]), SECONDARY_STRUCTURAL_ELEMENTS);
    }
}
