use std::path::PathBuf;

use chrono::{DateTime, Utc};
use contrast_training::{TrainingConfig, TrainingSummary};
use serde::{Deserialize, Serialize};

/// What `contrast train --report` writes.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrainingReport {
    pub trained_at: DateTime<Utc>,
    pub weights: PathBuf,
    pub config: TrainingConfig,
    pub summary: TrainingSummary,
}
