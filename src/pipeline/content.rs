//! PDF content checks

use crate::error::{AppError, Result};

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Reject PDFs over `max_file_size_mb`, then empty ones. Size is checked first.
pub fn check_content(pdf: &[u8], max_file_size_mb: u64) -> Result<()> {
    if pdf.len() as u64 > max_file_size_mb.saturating_mul(BYTES_PER_MB) {
        return Err(AppError::TooLarge {
            max_mb: max_file_size_mb,
        });
    }
    if pdf.is_empty() {
        return Err(AppError::EmptyContent);
    }
    Ok(())
}
