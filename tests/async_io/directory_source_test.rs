//! Tests for the local mirror boundary source

use std::path::PathBuf;
use std::sync::Arc;

use classmap::{
    BoundarySource, DirectoryBoundarySource, DrilldownSession, DrilldownState, FailurePolicy,
    InteractionMode, TopologyCache,
};

use crate::utils::{ROOT, RecordingView, ZHEJIANG, country_document, records, zhejiang_document};

/// Fresh mirror directory holding the country and Zhejiang documents
fn mirror_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("classmap-{}-{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();

    for (code, document) in [(ROOT, country_document()), (ZHEJIANG, zhejiang_document())] {
        let path = dir.join(format!("{code}.topo.json"));
        std::fs::write(path, serde_json::to_vec(&document).unwrap()).unwrap();
    }
    dir
}

#[tokio::test]
async fn test_reads_mirrored_documents() {
    let dir = mirror_dir("read");
    let source = DirectoryBoundarySource::new(&dir);

    let payload = source.fetch(ZHEJIANG).await.unwrap();
    assert_eq!(payload.code, ZHEJIANG);
    assert_eq!(payload.len(), 3);
    assert_eq!(source.location(), dir.display().to_string());

    let missing = source.fetch("440000").await.unwrap_err();
    assert_eq!(missing.status, Some(404));

    std::fs::remove_dir_all(dir).unwrap();
}

#[tokio::test]
async fn test_malformed_document_is_a_transport_failure() {
    let dir = mirror_dir("malformed");
    std::fs::write(dir.join("110000.topo.json"), b"{not json").unwrap();
    let source = DirectoryBoundarySource::new(&dir);

    let error = source.fetch("110000").await.unwrap_err();
    assert_eq!(error.status, None);
    assert_eq!(error.code, "110000");

    std::fs::remove_dir_all(dir).unwrap();
}

#[tokio::test]
async fn test_session_over_mirror() -> classmap::Result<()> {
    let dir = mirror_dir("session");
    let cache = TopologyCache::new(
        Arc::new(DirectoryBoundarySource::new(&dir)),
        FailurePolicy::RetryOnFailure,
    );

    let session = DrilldownSession::initialize(
        cache,
        ROOT,
        &records(),
        InteractionMode::Precise,
        RecordingView::default(),
    )
    .await?;

    assert_eq!(
        session.drill_into("330000").await?,
        DrilldownState::AtProvince(ZHEJIANG.to_string())
    );
    assert_eq!(session.controller().current_view().total(), 3);
    assert_eq!(session.cache().len(), 2);

    std::fs::remove_dir_all(dir)?;
    Ok(())
}
