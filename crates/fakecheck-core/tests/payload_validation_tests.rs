//! Integration tests for submission payload validation.

use std::io::Write;

use fakecheck_core::{Artifact, CoreError, SubmissionPayload};

#[test]
fn payload_validation_tests_rejects_empty_submission() {
    let result = SubmissionPayload::default().validate();
    assert!(matches!(result, Err(CoreError::EmptyPayload)));
}

#[test]
fn payload_validation_tests_loads_artifact_from_disk() {
    let path = std::env::temp_dir().join(format!("fakecheck-artifact-{}.png", std::process::id()));
    {
        let mut file = std::fs::File::create(&path).expect("temp file should be creatable");
        file.write_all(&[0x89, b'P', b'N', b'G'])
            .expect("temp file should be writable");
    }

    let artifact = Artifact::from_path(&path).expect("artifact should load");
    std::fs::remove_file(&path).expect("temp file should be removable");

    assert_eq!(artifact.content_type, "image/png");
    assert_eq!(artifact.bytes.len(), 4);
    assert!(SubmissionPayload::from_file(artifact).validate().is_ok());
}

#[test]
fn payload_validation_tests_reports_missing_artifact_path() {
    let result = Artifact::from_path("/definitely/not/here/fakecheck.png");
    assert!(matches!(result, Err(CoreError::ArtifactRead { .. })));
}
