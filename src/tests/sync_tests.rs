#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::library::store;
    use crate::library::sync::LibrarySync;
    use crate::metrics::Metrics;
    use crate::tests::support::{drive_file, library_config, setup_db, FakeLister};
    use crate::types::SyncOutcome;

    #[tokio::test]
    async fn concurrent_callers_share_one_run() {
        let pool = setup_db().await;
        let lister = FakeLister::with_delay(
            vec![drive_file("id-a", "Alpha.pdf"), drive_file("id-b", "Beta.pdf")],
            Duration::from_millis(100),
        );
        let sync = LibrarySync::with_lister(
            pool.clone(),
            library_config(60),
            Metrics::new(),
            Some(lister.clone()),
        );

        let mut handles = Vec::new();
        for _ in 0..8 {
            let sync = sync.clone();
            handles.push(tokio::spawn(async move { sync.ensure_synced(false).await }));
        }
        for handle in handles {
            match handle.await.unwrap() {
                SyncOutcome::Synced { count } => assert_eq!(count, 2),
                other => panic!("expected Synced, got {:?}", other),
            }
        }

        // Eight callers, one listing fetch.
        assert_eq!(lister.call_count(), 1);
        assert_eq!(store::find_all(&pool).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn second_call_inside_interval_is_skipped() {
        let pool = setup_db().await;
        let lister = FakeLister::new(vec![drive_file("id-a", "Alpha.pdf")]);
        let metrics = Metrics::new();
        let sync = LibrarySync::with_lister(
            pool,
            library_config(60),
            metrics.clone(),
            Some(lister.clone()),
        );

        match sync.ensure_synced(false).await {
            SyncOutcome::Synced { count } => assert_eq!(count, 1),
            other => panic!("expected Synced, got {:?}", other),
        }

        match sync.ensure_synced(false).await {
            SyncOutcome::Skipped { last_success_at, last_error } => {
                assert!(last_success_at.is_some());
                assert!(last_error.is_none());
            }
            other => panic!("expected Skipped, got {:?}", other),
        }

        assert_eq!(lister.call_count(), 1);
        assert_eq!(metrics.get_snapshot().syncs_skipped, 1);
    }

    #[tokio::test]
    async fn force_bypasses_interval() {
        let pool = setup_db().await;
        let lister = FakeLister::new(vec![drive_file("id-a", "Alpha.pdf")]);
        let sync = LibrarySync::with_lister(
            pool.clone(),
            library_config(60),
            Metrics::new(),
            Some(lister.clone()),
        );

        assert!(matches!(sync.ensure_synced(false).await, SyncOutcome::Synced { .. }));
        lister.set_files(vec![drive_file("id-a", "Alpha.pdf"), drive_file("id-c", "Gamma.pdf")]);

        match sync.ensure_synced(true).await {
            SyncOutcome::Synced { count } => assert_eq!(count, 2),
            other => panic!("expected Synced, got {:?}", other),
        }
        assert_eq!(lister.call_count(), 2);
        assert_eq!(store::find_all(&pool).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn listing_failure_keeps_store_and_records_error() {
        let pool = setup_db().await;
        let lister = FakeLister::new(vec![drive_file("id-a", "Alpha.pdf")]);
        let metrics = Metrics::new();
        let sync = LibrarySync::with_lister(
            pool.clone(),
            library_config(60),
            metrics.clone(),
            Some(lister.clone()),
        );

        assert!(matches!(sync.ensure_synced(false).await, SyncOutcome::Synced { count: 1 }));

        lister.set_fail(true);
        match sync.ensure_synced(true).await {
            SyncOutcome::Failed { message } => {
                assert!(message.contains("500"));
            }
            other => panic!("expected Failed, got {:?}", other),
        }

        // Stored items survive the failed run untouched.
        let items = store::find_all(&pool).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].drive_file_id, "id-a");

        let status = sync.status().await;
        assert!(status.last_error.is_some());
        assert!(status.last_success_at.is_some());
        assert_eq!(metrics.get_snapshot().syncs_failed, 1);
    }

    #[tokio::test]
    async fn recovery_clears_last_error() {
        let pool = setup_db().await;
        let lister = FakeLister::new(vec![drive_file("id-a", "Alpha.pdf")]);
        let sync = LibrarySync::with_lister(
            pool,
            library_config(60),
            Metrics::new(),
            Some(lister.clone()),
        );

        lister.set_fail(true);
        assert!(matches!(sync.ensure_synced(false).await, SyncOutcome::Failed { .. }));
        assert!(sync.status().await.last_error.is_some());

        lister.set_fail(false);
        assert!(matches!(sync.ensure_synced(true).await, SyncOutcome::Synced { .. }));
        let status = sync.status().await;
        assert!(status.last_error.is_none());
        assert!(status.last_success_at.is_some());
    }

    #[tokio::test]
    async fn unconfigured_sync_reports_not_configured() {
        let pool = setup_db().await;
        let sync = LibrarySync::with_lister(pool.clone(), library_config(60), Metrics::new(), None);

        assert!(matches!(sync.ensure_synced(false).await, SyncOutcome::NotConfigured));
        assert!(matches!(sync.ensure_synced(true).await, SyncOutcome::NotConfigured));
        assert!(store::find_all(&pool).await.unwrap().is_empty());
    }
}
