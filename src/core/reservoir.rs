use crate::domain::model::{LayoutTable, PartList, PartTransfer, PlateGeometry, ReservoirPlan, WellCoordinate};
use crate::utils::error::{AssemblyError, Result};

/// Works out where each part sits on the source reservoir and which
/// destination wells it is pipetted into. Category-A parts occupy the
/// first source addresses, category-B parts follow straight after them.
#[derive(Debug, Clone, Default)]
pub struct ReservoirPlanner {
    geometry: PlateGeometry,
}

impl ReservoirPlanner {
    pub fn new(geometry: PlateGeometry) -> Self {
        Self { geometry }
    }

    /// Destination columns a multichannel head has to visit for `total` wells.
    pub fn columns_spanned(&self, total: usize) -> usize {
        match self.geometry.row_count() {
            0 => 0,
            rows => total.div_ceil(rows),
        }
    }

    pub fn source_well_for_a(&self, index: usize) -> Option<WellCoordinate> {
        self.geometry.coordinate_at(index)
    }

    pub fn source_well_for_b(&self, count_a: usize, index: usize) -> Option<WellCoordinate> {
        self.geometry.coordinate_at(count_a + index)
    }

    /// Fails with `SourcePlateOverflow` when the parts do not all fit on one
    /// source plate. That limits the pipetting plan only, not the layout.
    pub fn plan(&self, parts: &PartList, layout: &LayoutTable) -> Result<ReservoirPlan> {
        let (count_a, count_b) = parts.counts();

        if count_a + count_b > self.geometry.capacity() {
            return Err(AssemblyError::SourcePlateOverflow {
                parts: count_a + count_b,
                capacity: self.geometry.capacity(),
            });
        }

        if layout.len() != count_a * count_b {
            return Err(AssemblyError::invalid_count(
                count_a,
                count_b,
                format!("layout has {} rows, expected {}", layout.len(), count_a * count_b),
            ));
        }

        let wells: Vec<WellCoordinate> = layout.iter().map(|row| row.well).collect();

        let mut category_a = Vec::with_capacity(count_a);
        for (i, part) in parts.category_a.iter().enumerate() {
            category_a.push(PartTransfer {
                part: part.clone(),
                source: self.source_well(i, count_a, count_b)?,
                destinations: wells.iter().skip(i).step_by(count_a).copied().collect(),
            });
        }

        let mut category_b = Vec::with_capacity(count_b);
        for (j, part) in parts.category_b.iter().enumerate() {
            category_b.push(PartTransfer {
                part: part.clone(),
                source: self.source_well(count_a + j, count_a, count_b)?,
                destinations: wells
                    .iter()
                    .skip(j * count_a)
                    .take(count_a)
                    .copied()
                    .collect(),
            });
        }

        Ok(ReservoirPlan {
            columns_spanned: self.columns_spanned(layout.len()),
            category_a,
            category_b,
        })
    }

    fn source_well(&self, index: usize, count_a: usize, count_b: usize) -> Result<WellCoordinate> {
        self.geometry.coordinate_at(index).ok_or_else(|| {
            AssemblyError::invalid_count(count_a, count_b, format!("no source well at index {}", index))
        })
    }
}
