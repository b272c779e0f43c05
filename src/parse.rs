use std::path::Path;

use derive_more::Display;

use crate::problem::{Pool, PoolConstructionError, Vessel};

#[derive(Debug, Display)]
pub enum ReadPoolError {
    #[display(fmt = "could not read {}: {}", path, source)]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[display(fmt = "could not parse {}: {}", path, source)]
    Json {
        path: String,
        source: serde_json::Error,
    },
    #[display(fmt = "invalid vessel data in {}: {}", path, source)]
    Invalid {
        path: String,
        source: PoolConstructionError,
    },
}

impl std::error::Error for ReadPoolError {}

/// Read a vessel pool from a JSON file holding an array of vessel records.
pub fn read_pool(path: &Path) -> Result<Pool, ReadPoolError> {
    let display = path.display().to_string();

    let file = std::fs::File::open(path).map_err(|source| ReadPoolError::Io {
        path: display.clone(),
        source,
    })?;
    let reader = std::io::BufReader::new(file);

    let vessels: Vec<Vessel> =
        serde_json::from_reader(reader).map_err(|source| ReadPoolError::Json {
            path: display.clone(),
            source,
        })?;

    Pool::new(vessels).map_err(|source| ReadPoolError::Invalid {
        path: display,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    // temp_dir is shared, so keep file names unique per test run
    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("{}_{}.json", name, std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn reads_a_well_formed_pool() {
        let path = write_temp(
            "fleetmix_pool_ok",
            r#"[
                {"id": 1, "capacity": 175108.0, "safety_rating": 1,
                 "fuel_type": "DISTILLATE FUEL", "cost": 880688.0,
                 "carbon_cost": 45962.4, "emissions": 574.53},
                {"id": 2, "capacity": 206331.0, "safety_rating": 3,
                 "fuel_type": "Ammonia", "cost": 1260216.0, "emissions": 143.08}
            ]"#,
        );
        let pool = read_pool(&path).unwrap();
        assert_eq!(pool.len(), 2);
        // carbon_cost defaults to zero when omitted
        assert_eq!(pool.vessels()[1].carbon_cost(), 0.0);
    }

    #[test]
    fn malformed_json_names_the_file() {
        let path = write_temp("fleetmix_pool_bad", "not json");
        let err = read_pool(&path).unwrap_err();
        assert!(matches!(err, ReadPoolError::Json { .. }));
        assert!(err.to_string().contains("fleetmix_pool_bad"));
    }

    #[test]
    fn invalid_vessels_name_the_offender() {
        let path = write_temp(
            "fleetmix_pool_invalid",
            r#"[{"id": 9, "capacity": -1.0, "safety_rating": 3,
                 "fuel_type": "LNG", "cost": 1.0, "emissions": 0.0}]"#,
        );
        let err = read_pool(&path).unwrap_err();
        assert!(matches!(err, ReadPoolError::Invalid { .. }));
        assert!(err.to_string().contains("vessel 9"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_pool(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ReadPoolError::Io { .. }));
    }
}
