//! Index table → `ndarray` feature matrix.
//!
//! Downstream QSAR models (e.g. with `linfa`) expect a dense
//! `n_samples × n_features` matrix; [`to_feature_matrix`] builds one from an
//! [`IndexTable`], one row per compound and one column per index in
//! [`IndexKind::ALL`](crate::descriptors::IndexKind::ALL) order.

use ndarray::Array2;

use crate::data_io::{ExportError, IndexTable};

/// Convert the table into a `(compounds × 10)` matrix plus the row names.
///
/// # Errors
///
/// Returns [`ExportError::Table`] if the table is empty.
pub fn to_feature_matrix(table: &IndexTable) -> Result<(Array2<f64>, Vec<String>), ExportError> {
    let n_samples = table.len();
    if n_samples == 0 {
        return Err(ExportError::Table("index table is empty".into()));
    }

    // Build Array2 in row-major order: shape = (n_samples, n_features)
    let mut flat = Vec::with_capacity(n_samples * 10);
    let mut names = Vec::with_capacity(n_samples);
    for (name, record) in table.rows() {
        flat.extend_from_slice(&record.values());
        names.push(name.clone());
    }

    let x = Array2::from_shape_vec((n_samples, 10), flat)
        .map_err(|e| ExportError::Table(format!("failed to construct Array2: {}", e)))?;

    Ok((x, names))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::IndexRecord;

    #[test]
    fn conversion_checks_shapes() {
        let mut table = IndexTable::new();
        table.push("a", IndexRecord::from_values([1.0; 10]));
        let mut second = [2.0; 10];
        second[9] = 7.0;
        table.push("b", IndexRecord::from_values(second));

        let (x, names) = to_feature_matrix(&table).unwrap();
        assert_eq!(x.shape(), &[2, 10]);
        assert_eq!(names, ["a", "b"]);
        assert_eq!(x[[0, 0]], 1.0);
        assert_eq!(x[[1, 9]], 7.0);
    }

    #[test]
    fn empty_table_is_an_error() {
        assert!(to_feature_matrix(&IndexTable::new()).is_err());
    }
}
