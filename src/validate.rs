use crate::problem::{Pool, UnknownVessel, VesselId};

/// Check a selection against the hard fleet requirements.
///
/// Returns `(true, [])` when every check passes, and `(false, violations)`
/// with one human-readable string per failed check otherwise. Violations are
/// normal outcomes; the only error is a selection naming a vessel that is
/// not in the pool.
///
/// An empty selection passes the safety check vacuously but still fails the
/// capacity check for positive demand.
pub fn validate_fleet(
    pool: &Pool,
    selection: &[VesselId],
    demand: f64,
    min_avg_safety: f64,
    require_all_fuel_types: bool,
) -> Result<(bool, Vec<String>), UnknownVessel> {
    let vessels = pool.subset(selection)?;
    let mut violations = Vec::new();

    let total_capacity: f64 = vessels.iter().map(|v| v.capacity()).sum();
    if total_capacity < demand {
        violations.push(format!(
            "combined capacity {total_capacity} is below the cargo demand {demand}"
        ));
    }

    if !vessels.is_empty() {
        let mean_safety = vessels
            .iter()
            .map(|v| v.safety_rating() as f64)
            .sum::<f64>()
            / vessels.len() as f64;
        if mean_safety < min_avg_safety {
            violations.push(format!(
                "average safety rating {mean_safety:.2} is below the threshold {min_avg_safety}"
            ));
        }
    }

    if require_all_fuel_types {
        let missing: Vec<&str> = pool
            .fuel_types()
            .into_iter()
            .filter(|fuel| !vessels.iter().any(|v| v.fuel_type() == *fuel))
            .collect();
        if !missing.is_empty() {
            violations.push(format!("missing fuel types: {}", missing.join(", ")));
        }
    }

    Ok((violations.is_empty(), violations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{checkpoint_pool, ALL_IDS};

    #[test]
    fn full_fleet_passes_every_check() {
        let pool = checkpoint_pool();
        let (ok, violations) = validate_fleet(&pool, &ALL_IDS, 855_421.0, 2.8, true).unwrap();
        assert!(ok);
        assert!(violations.is_empty());
    }

    #[test]
    fn capacity_shortfall_is_reported() {
        let pool = checkpoint_pool();
        let (ok, violations) =
            validate_fleet(&pool, &[10102950], 500_000.0, 1.0, false).unwrap();
        assert!(!ok);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("below the cargo demand"));
    }

    #[test]
    fn low_average_safety_is_reported() {
        let pool = checkpoint_pool();
        // single vessel with rating 1
        let (ok, violations) = validate_fleet(&pool, &[10102950], 0.0, 3.0, false).unwrap();
        assert!(!ok);
        assert!(violations[0].contains("average safety rating"));
    }

    #[test]
    fn missing_fuel_types_are_listed() {
        let pool = checkpoint_pool();
        let (ok, violations) =
            validate_fleet(&pool, &[10791900], 0.0, 1.0, true).unwrap();
        assert!(!ok);
        assert!(violations[0].contains("missing fuel types"));
        assert!(violations[0].contains("Ammonia"));
        assert!(!violations[0].contains("LNG"));
    }

    #[test]
    fn empty_selection_passes_safety_vacuously() {
        let pool = checkpoint_pool();
        let (ok, violations) = validate_fleet(&pool, &[], 0.0, 5.0, false).unwrap();
        assert!(ok, "violations: {violations:?}");
    }

    #[test]
    fn several_violations_are_all_reported() {
        let pool = checkpoint_pool();
        let (ok, violations) =
            validate_fleet(&pool, &[10102950], 855_421.0, 3.0, true).unwrap();
        assert!(!ok);
        assert_eq!(violations.len(), 3);
    }

    #[test]
    fn unknown_id_is_a_hard_error() {
        let pool = checkpoint_pool();
        let err = validate_fleet(&pool, &[7], 0.0, 1.0, false).unwrap_err();
        assert_eq!(err.0, 7);
    }
}
