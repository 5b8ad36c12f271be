use thiserror::Error;

use crate::location::ReferenceData;
use crate::source::ReferenceSource;
use crate::source::errors::SourceError;

/// District/upazila lists could not be loaded. Non-fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("could not load location lists: {0}")]
pub struct ReferenceDataLoadError(#[from] pub SourceError);

/// Outcome of loading reference data: always usable data, maybe a warning.
#[derive(Debug, Default)]
pub struct ReferenceLoad {
    pub data: ReferenceData,
    pub warning: Option<ReferenceDataLoadError>,
}

/// Fetches districts and upazilas once, degrading to empty lists on failure.
pub async fn load_reference_data<S>(source: &S) -> ReferenceLoad
where
    S: ReferenceSource + ?Sized,
{
    let (districts, upazilas) = tokio::join!(source.fetch_districts(), source.fetch_upazilas());

    match (districts, upazilas) {
        (Ok(districts), Ok(upazilas)) => {
            log::info!(
                "Loaded {} districts and {} upazilas",
                districts.len(),
                upazilas.len()
            );
            ReferenceLoad {
                data: ReferenceData::new(districts, upazilas),
                warning: None,
            }
        }
        (Err(err), _) | (_, Err(err)) => {
            log::warn!("Falling back to empty location lists: {err}");
            ReferenceLoad {
                data: ReferenceData::default(),
                warning: Some(err.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::Instant;

    use super::*;
    use crate::domain::location::{District, Upazila};
    use crate::domain::types::{DistrictId, UpazilaId};
    use crate::source::errors::SourceResult;
    use crate::source::mock::MockBackend;

    #[tokio::test]
    async fn loads_both_lists() {
        let mut backend = MockBackend::new();
        backend.expect_fetch_districts().returning(|| {
            Ok(vec![District {
                id: DistrictId::new(1).unwrap(),
                name: "Dhaka".to_string(),
            }])
        });
        backend.expect_fetch_upazilas().returning(|| {
            Ok(vec![Upazila {
                id: UpazilaId::new(10).unwrap(),
                district_id: DistrictId::new(1).unwrap(),
                name: "Savar".to_string(),
            }])
        });

        let load = load_reference_data(&backend).await;

        assert!(load.warning.is_none());
        assert_eq!(load.data.upazilas_for("Dhaka").len(), 1);
    }

    struct SlowReference;

    #[async_trait::async_trait]
    impl ReferenceSource for SlowReference {
        async fn fetch_districts(&self) -> SourceResult<Vec<District>> {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok(vec![District {
                id: DistrictId::new(1).unwrap(),
                name: "Dhaka".to_string(),
            }])
        }

        async fn fetch_upazilas(&self) -> SourceResult<Vec<Upazila>> {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok(Vec::new())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn both_lists_are_requested_together() {
        let start = Instant::now();

        let load = load_reference_data(&SlowReference).await;

        assert!(load.data.is_loaded());
        assert!(start.elapsed() < Duration::from_millis(150));
    }

    #[tokio::test]
    async fn failure_degrades_to_empty_lists() {
        let mut backend = MockBackend::new();
        backend.expect_fetch_districts().returning(|| {
            Ok(vec![District {
                id: DistrictId::new(1).unwrap(),
                name: "Dhaka".to_string(),
            }])
        });
        backend
            .expect_fetch_upazilas()
            .returning(|| Err(SourceError::ConnectionError("offline".to_string())));

        let load = load_reference_data(&backend).await;

        assert!(!load.data.is_loaded());
        assert!(load.data.upazilas_for("Dhaka").is_empty());
        assert_eq!(
            load.warning,
            Some(ReferenceDataLoadError(SourceError::ConnectionError(
                "offline".to_string()
            )))
        );
    }
}
