use crate::domain::model::{CombinationRow, LayoutTable, PartList, PlateGeometry};
use crate::utils::error::{AssemblyError, Result};

/// Lays every category-A x category-B combination onto the plate in the
/// order the pipette walks it: column-major, category A cycling through
/// consecutive wells, each category-B part held for one full A cycle.
#[derive(Debug, Clone, Default)]
pub struct PlateLayoutGenerator {
    geometry: PlateGeometry,
}

impl PlateLayoutGenerator {
    pub fn new(geometry: PlateGeometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> &PlateGeometry {
        &self.geometry
    }

    /// Number of wells `count_a` x `count_b` combinations occupy.
    pub fn required_wells(&self, count_a: usize, count_b: usize) -> Result<usize> {
        let total = count_a.checked_mul(count_b).ok_or_else(|| {
            AssemblyError::invalid_count(count_a, count_b, "combination count overflows")
        })?;

        if total > self.geometry.capacity() {
            return Err(AssemblyError::invalid_count(
                count_a,
                count_b,
                format!(
                    "{} wells exceed plate capacity of {}",
                    total,
                    self.geometry.capacity()
                ),
            ));
        }

        Ok(total)
    }

    pub fn generate<A, B>(&self, parts_a: &[A], parts_b: &[B]) -> Result<LayoutTable>
    where
        A: AsRef<str>,
        B: AsRef<str>,
    {
        let count_a = parts_a.len();
        let total = self.required_wells(count_a, parts_b.len())?;

        let rows = self
            .geometry
            .column_major()
            .take(total)
            .enumerate()
            .map(|(index, well)| CombinationRow {
                well,
                part_a: parts_a[index % count_a].as_ref().to_string(),
                part_b: parts_b[index / count_a].as_ref().to_string(),
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            "Laid out {} combinations ({} x {}) on a {}-well plate",
            rows.len(),
            count_a,
            parts_b.len(),
            self.geometry.capacity()
        );

        Ok(LayoutTable::new(rows))
    }

    pub fn generate_for(&self, parts: &PartList) -> Result<LayoutTable> {
        self.generate(&parts.category_a, &parts.category_b)
    }
}
