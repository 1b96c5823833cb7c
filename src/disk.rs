//! Disk space reporting for the liveness endpoint

use std::io;
use std::path::Path;

use serde::Serialize;

/// Space on the filesystem holding a path
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiskUsage {
    pub total_bytes: u64,
    pub free_bytes: u64,
    pub free_percent: f64,
}

impl DiskUsage {
    pub fn measure(path: &Path) -> io::Result<Self> {
        let total_bytes = fs2::total_space(path)?;
        let free_bytes = fs2::available_space(path)?;
        Ok(Self::from_bytes(total_bytes, free_bytes))
    }

    pub fn from_bytes(total_bytes: u64, free_bytes: u64) -> Self {
        let free_percent = if total_bytes == 0 {
            0.0
        } else {
            free_bytes as f64 * 100.0 / total_bytes as f64
        };
        Self {
            total_bytes,
            free_bytes,
            free_percent,
        }
    }

    pub fn is_low(&self, threshold_percent: f64) -> bool {
        self.free_percent < threshold_percent
    }
}
