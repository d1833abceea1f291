use std::path::Path;

use itertools::Itertools;
use serde::Serialize;

use super::{HubRecord, QualificationSummary, SegmentRecord};
use crate::{algorithm::qualification_ops::QualificationResult, app::HqtaAppError};

pub const HUBS_FILENAME: &str = "hubs.json";
pub const CORRIDORS_FILENAME: &str = "corridors.json";
pub const SUMMARY_FILENAME: &str = "summary.json";

/// writes hubs.json, corridors.json and summary.json to the output directory.
pub fn write_outputs(
    result: &QualificationResult,
    summary: &QualificationSummary,
    output_directory: &Path,
) -> Result<(), HqtaAppError> {
    create_dirs(output_directory)?;
    let hubs = result.hubs.hubs.iter().map(HubRecord::from).collect_vec();
    let segments = result.segments.iter().map(SegmentRecord::from).collect_vec();
    write_json(&hubs, &output_directory.join(HUBS_FILENAME))?;
    write_json(&segments, &output_directory.join(CORRIDORS_FILENAME))?;
    write_json(summary, &output_directory.join(SUMMARY_FILENAME))?;
    log::info!(
        "wrote {} hubs and {} corridor segments to '{}'",
        hubs.len(),
        segments.len(),
        output_directory.to_str().unwrap_or_default()
    );
    Ok(())
}

/// helper function to "mkdir -p path" - make all directories along a path
pub fn create_dirs(path: &Path) -> Result<(), HqtaAppError> {
    if path.as_os_str().is_empty() || path.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(path).map_err(|e| {
        let msg = format!(
            "error building output directory '{}': {e}",
            path.to_str().unwrap_or_default()
        );
        HqtaAppError::InvalidUserInput(msg)
    })
}

fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<(), HqtaAppError> {
    let contents = serde_json::to_string_pretty(value).map_err(|e| HqtaAppError::WriteError {
        path: path.to_owned(),
        message: format!("failure serializing JSON: {e}"),
    })?;
    std::fs::write(path, contents).map_err(|e| HqtaAppError::WriteError {
        path: path.to_owned(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod test {
    use super::{create_dirs, write_json};

    #[test]
    fn test_write_json_into_new_directory() {
        let dir = std::env::temp_dir()
            .join(format!("hqta-output-{}", std::process::id()))
            .join("nested");
        create_dirs(&dir).unwrap();
        assert!(dir.is_dir());
        let path = dir.join("values.json");
        write_json(&vec![1, 2, 3], &path).unwrap();
        let read: Vec<i32> = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(read, vec![1, 2, 3]);
        let _ = std::fs::remove_dir_all(dir.parent().unwrap());
    }

    #[test]
    fn test_create_dirs_accepts_working_directory() {
        create_dirs(std::path::Path::new("")).unwrap();
    }
}
