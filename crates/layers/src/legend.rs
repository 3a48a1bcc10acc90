use foundation::math::Vec2;

use crate::symbology::{Color, HAS_AGENCY_FILL, NEUTRAL_FILL, NO_AGENCY_FILL};

#[derive(Debug, Clone, PartialEq)]
pub struct LegendItem {
    pub label: &'static str,
    pub color: Color,
}

/// Map key drawn in the top-left corner of the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub origin: Vec2,
    pub row_spacing: f64,
    pub swatch_size: f64,
    pub swatch_radius: f64,
    /// Label anchor relative to its row.
    pub label_offset: Vec2,
    pub items: Vec<LegendItem>,
}

impl Default for Legend {
    fn default() -> Self {
        Self {
            origin: Vec2::new(16.0, 16.0),
            row_spacing: 22.0,
            swatch_size: 14.0,
            swatch_radius: 3.0,
            label_offset: Vec2::new(20.0, 11.0),
            items: vec![
                LegendItem {
                    label: "Has National Space Program",
                    color: HAS_AGENCY_FILL,
                },
                LegendItem {
                    label: "No Government Space Agency",
                    color: NO_AGENCY_FILL,
                },
                LegendItem {
                    label: "Other Countries",
                    color: NEUTRAL_FILL,
                },
            ],
        }
    }
}

impl Legend {
    /// Top-left corner of row `i`'s swatch, relative to the map.
    pub fn row_origin(&self, i: usize) -> Vec2 {
        self.origin + Vec2::new(0.0, self.row_spacing * i as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::Legend;
    use foundation::math::Vec2;
    use pretty_assertions::assert_eq;

    #[test]
    fn three_rows_in_order() {
        let legend = Legend::default();
        let labels: Vec<_> = legend.items.iter().map(|i| i.label).collect();
        assert_eq!(
            labels,
            vec![
                "Has National Space Program",
                "No Government Space Agency",
                "Other Countries"
            ]
        );
        assert_eq!(legend.row_origin(2), Vec2::new(16.0, 60.0));
    }
}
