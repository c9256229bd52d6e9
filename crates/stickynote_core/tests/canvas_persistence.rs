use stickynote_core::store::{decode_notes, encode_notes};
use stickynote_core::{
    CanvasConfig, CanvasService, CreateNoteRequest, FixedTrashRegion, FixedViewport,
    InMemoryRemoteStore, LoadSource, LocalCache, MemoryLocalCache, Note, NotePatch,
    PersistenceCoordinator, Point, Size, SqliteLocalCache,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;

const VIEWPORT: Size = Size::new(1024.0, 768.0);

fn sample_note(id: u64) -> Note {
    Note {
        id,
        x: 20.0,
        y: 80.0,
        width: 200.0,
        height: 200.0,
        content: format!("<p>note {id}</p>"),
        z_index: id as i64,
        color: "#bbf7d0".to_string(),
    }
}

async fn open_canvas<L: LocalCache>(
    remote: &Arc<InMemoryRemoteStore>,
    local: &Arc<L>,
) -> CanvasService<InMemoryRemoteStore, L> {
    CanvasService::open(
        &CanvasConfig::default(),
        Arc::clone(remote),
        Arc::clone(local),
        Box::new(FixedViewport(VIEWPORT)),
        Box::new(FixedTrashRegion::bottom_right(VIEWPORT)),
    )
    .await
}

async fn settle() {
    tokio::time::sleep(Duration::from_secs(2)).await;
}

#[tokio::test(start_paused = true)]
async fn non_empty_remote_wins_over_local_cache() {
    let remote = Arc::new(InMemoryRemoteStore::seeded(vec![sample_note(7)]));
    let local = Arc::new(MemoryLocalCache::new());
    local
        .set("notes", &encode_notes(&[sample_note(1), sample_note(2)]).unwrap())
        .unwrap();

    let coordinator =
        PersistenceCoordinator::new(remote, local, &CanvasConfig::default(), Handle::current());
    let loaded = coordinator.load().await;
    assert_eq!(loaded.source, LoadSource::Remote);
    assert_eq!(loaded.notes, vec![sample_note(7)]);
}

#[tokio::test(start_paused = true)]
async fn empty_remote_falls_back_to_local_cache() {
    let remote = Arc::new(InMemoryRemoteStore::new());
    let local = Arc::new(MemoryLocalCache::new());
    local
        .set("notes", &encode_notes(&[sample_note(3)]).unwrap())
        .unwrap();

    let coordinator =
        PersistenceCoordinator::new(remote, local, &CanvasConfig::default(), Handle::current());
    let loaded = coordinator.load().await;
    assert_eq!(loaded.source, LoadSource::Local);
    assert_eq!(loaded.notes, vec![sample_note(3)]);
}

#[tokio::test(start_paused = true)]
async fn failed_remote_falls_back_to_local_cache() {
    let remote = Arc::new(InMemoryRemoteStore::seeded(vec![sample_note(9)]));
    remote.set_fail_fetch(true);
    let local = Arc::new(MemoryLocalCache::new());
    local
        .set("notes", &encode_notes(&[sample_note(4)]).unwrap())
        .unwrap();

    let coordinator =
        PersistenceCoordinator::new(remote, local, &CanvasConfig::default(), Handle::current());
    let loaded = coordinator.load().await;
    assert_eq!(loaded.source, LoadSource::Local);
    assert_eq!(loaded.notes, vec![sample_note(4)]);
}

#[tokio::test(start_paused = true)]
async fn nothing_anywhere_starts_empty() {
    let remote = Arc::new(InMemoryRemoteStore::new());
    remote.set_fail_fetch(true);
    let coordinator = PersistenceCoordinator::new(
        remote,
        Arc::new(MemoryLocalCache::new()),
        &CanvasConfig::default(),
        Handle::current(),
    );
    let loaded = coordinator.load().await;
    assert_eq!(loaded.source, LoadSource::Empty);
    assert!(loaded.notes.is_empty());
}

#[tokio::test(start_paused = true)]
async fn malformed_local_cache_starts_empty() {
    let local = Arc::new(MemoryLocalCache::new());
    local.set("notes", "{not json").unwrap();
    let coordinator = PersistenceCoordinator::new(
        Arc::new(InMemoryRemoteStore::new()),
        local,
        &CanvasConfig::default(),
        Handle::current(),
    );
    let loaded = coordinator.load().await;
    assert_eq!(loaded.source, LoadSource::Empty);
    assert!(loaded.notes.is_empty());
}

#[tokio::test(start_paused = true)]
async fn local_collection_without_successor_keys_starts_empty() {
    let mut exhausted = sample_note(1);
    exhausted.z_index = i64::MAX;
    let local = Arc::new(MemoryLocalCache::new());
    local
        .set("notes", &encode_notes(&[exhausted, sample_note(2)]).unwrap())
        .unwrap();

    let canvas = open_canvas(&Arc::new(InMemoryRemoteStore::new()), &local).await;
    assert_eq!(canvas.load_source(), LoadSource::Empty);
    assert!(canvas.notes().is_empty());
}

#[tokio::test(start_paused = true)]
async fn remote_collection_without_successor_ids_defers_to_local() {
    let mut exhausted = sample_note(1);
    exhausted.id = u64::MAX;
    let remote = Arc::new(InMemoryRemoteStore::seeded(vec![exhausted]));
    let local = Arc::new(MemoryLocalCache::new());
    local
        .set("notes", &encode_notes(&[sample_note(3)]).unwrap())
        .unwrap();

    let mut canvas = open_canvas(&remote, &local).await;
    assert_eq!(canvas.load_source(), LoadSource::Local);
    assert_eq!(canvas.create_note(&CreateNoteRequest::default()).id, 4);
}

#[tokio::test(start_paused = true)]
async fn hung_remote_fetch_times_out_to_local_cache() {
    let config = CanvasConfig::from_json_str(r#"{"remote_fetch_timeout_ms": 1000}"#).unwrap();
    let remote = Arc::new(InMemoryRemoteStore::with_latency(Duration::from_secs(3600)));
    let local = Arc::new(MemoryLocalCache::new());
    local
        .set("notes", &encode_notes(&[sample_note(5)]).unwrap())
        .unwrap();

    let coordinator = PersistenceCoordinator::new(remote, local, &config, Handle::current());
    let started = tokio::time::Instant::now();
    let loaded = coordinator.load().await;
    assert_eq!(loaded.source, LoadSource::Local);
    assert_eq!(loaded.notes, vec![sample_note(5)]);
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[test]
fn edits_from_outside_the_runtime_are_saved_on_it() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap();
    let remote = Arc::new(InMemoryRemoteStore::new());
    let local = Arc::new(MemoryLocalCache::new());
    let mut canvas = runtime.block_on(open_canvas(&remote, &local));

    canvas.create_note(&CreateNoteRequest::default());
    canvas.update_content(1, "<p>from the ui thread</p>");
    assert!(canvas.has_pending_save());

    runtime.block_on(settle());
    assert_eq!(remote.save_attempts(), 1);
    assert_eq!(remote.snapshot().unwrap(), canvas.notes());
}

#[tokio::test(start_paused = true)]
async fn custom_cache_key_is_used_for_load_and_save() {
    let config = CanvasConfig::from_json_str(r#"{"local_cache_key": "board-a"}"#).unwrap();
    let remote = Arc::new(InMemoryRemoteStore::new());
    let local = Arc::new(MemoryLocalCache::new());
    let mut coordinator =
        PersistenceCoordinator::new(remote, Arc::clone(&local), &config, Handle::current());

    coordinator.flush(vec![sample_note(1)]).await.unwrap();
    assert!(local.get("notes").unwrap().is_none());
    let stored = local.get("board-a").unwrap().unwrap();
    assert_eq!(decode_notes(&stored).unwrap(), vec![sample_note(1)]);
}

#[tokio::test(start_paused = true)]
async fn burst_of_changes_produces_single_write_of_latest_state() {
    let remote = Arc::new(InMemoryRemoteStore::new());
    let local = Arc::new(MemoryLocalCache::new());
    let mut canvas = open_canvas(&remote, &local).await;

    canvas.create_note(&CreateNoteRequest::default());
    canvas.create_note(&CreateNoteRequest::default());
    canvas.update_content(1, "<b>hello</b>");
    canvas.begin_drag(2, Point::new(30.0, 90.0)).unwrap();
    for step in 0..20 {
        canvas.pointer_move(Point::new(30.0 + step as f64 * 10.0, 90.0));
    }
    canvas.pointer_up();
    assert!(canvas.has_pending_save());

    tokio::time::sleep(Duration::from_millis(299)).await;
    assert_eq!(remote.save_attempts(), 0);

    settle().await;
    assert_eq!(remote.save_attempts(), 1);
    assert_eq!(remote.snapshot().unwrap(), canvas.notes());
    let cached = local.get("notes").unwrap().unwrap();
    assert_eq!(decode_notes(&cached).unwrap(), canvas.notes());
    assert!(!canvas.has_pending_save());
}

#[tokio::test(start_paused = true)]
async fn changes_spread_past_quiet_period_are_written_separately() {
    let remote = Arc::new(InMemoryRemoteStore::new());
    let local = Arc::new(MemoryLocalCache::new());
    let mut canvas = open_canvas(&remote, &local).await;

    canvas.create_note(&CreateNoteRequest::default());
    settle().await;
    canvas.create_note(&CreateNoteRequest::default());
    settle().await;

    assert_eq!(remote.save_attempts(), 2);
    assert_eq!(remote.snapshot().unwrap().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn stale_id_updates_do_not_schedule_writes() {
    let remote = Arc::new(InMemoryRemoteStore::new());
    let local = Arc::new(MemoryLocalCache::new());
    let mut canvas = open_canvas(&remote, &local).await;

    assert!(!canvas.update_note(5, &NotePatch::content("x")));
    assert!(!canvas.delete_note(5));
    assert!(canvas.bring_to_front(5).is_none());
    assert!(!canvas.has_pending_save());
    settle().await;
    assert_eq!(remote.save_attempts(), 0);
}

#[tokio::test(start_paused = true)]
async fn failed_remote_write_leaves_local_cache_untouched() {
    let remote = Arc::new(InMemoryRemoteStore::new());
    remote.set_fail_save(true);
    let local = Arc::new(MemoryLocalCache::new());
    let mut canvas = open_canvas(&remote, &local).await;

    canvas.create_note(&CreateNoteRequest::default());
    settle().await;
    assert_eq!(remote.save_attempts(), 1);
    assert!(local.get("notes").unwrap().is_none());

    settle().await;
    assert_eq!(remote.save_attempts(), 1, "failed writes are not retried");

    remote.set_fail_save(false);
    canvas.create_note(&CreateNoteRequest::default());
    settle().await;
    assert_eq!(remote.save_attempts(), 2);
    let cached = local.get("notes").unwrap().unwrap();
    assert_eq!(decode_notes(&cached).unwrap().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn in_flight_write_finishes_after_later_change() {
    let remote = Arc::new(InMemoryRemoteStore::with_latency(Duration::from_millis(500)));
    let local = Arc::new(MemoryLocalCache::new());
    let mut canvas = open_canvas(&remote, &local).await;

    canvas.create_note(&CreateNoteRequest::default());
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(remote.save_attempts(), 1);
    assert!(remote.snapshot().unwrap().is_empty());

    canvas.create_note(&CreateNoteRequest::default());
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(remote.snapshot().unwrap().len(), 1);

    settle().await;
    assert_eq!(remote.save_attempts(), 2);
    assert_eq!(remote.snapshot().unwrap(), canvas.notes());
}

#[tokio::test(start_paused = true)]
async fn saved_collection_loads_back_field_for_field() {
    let remote = Arc::new(InMemoryRemoteStore::new());
    let local = Arc::new(MemoryLocalCache::new());
    let saved = {
        let mut canvas = open_canvas(&remote, &local).await;
        canvas.create_note(&CreateNoteRequest::default());
        canvas.create_note(&CreateNoteRequest::default());
        canvas.update_content(2, "<ul><li>milk</li></ul>");
        canvas.bring_to_front(1);
        settle().await;
        canvas.notes().to_vec()
    };

    let reopened = open_canvas(&remote, &Arc::new(MemoryLocalCache::new())).await;
    assert_eq!(reopened.load_source(), LoadSource::Remote);
    assert_eq!(reopened.notes(), saved.as_slice());
}

#[tokio::test(start_paused = true)]
async fn flush_writes_immediately_and_clears_timer() {
    let remote = Arc::new(InMemoryRemoteStore::new());
    let local = Arc::new(MemoryLocalCache::new());
    let mut canvas = open_canvas(&remote, &local).await;

    canvas.create_note(&CreateNoteRequest::default());
    assert!(canvas.has_pending_save());
    canvas.flush().await.unwrap();
    assert!(!canvas.has_pending_save());
    assert_eq!(remote.save_attempts(), 1);

    settle().await;
    assert_eq!(remote.save_attempts(), 1);
}

#[tokio::test(start_paused = true)]
async fn sqlite_cache_restores_notes_when_remote_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.sqlite3");

    let saved = {
        let local = Arc::new(SqliteLocalCache::open(&path).unwrap());
        let mut canvas = open_canvas(&Arc::new(InMemoryRemoteStore::new()), &local).await;
        canvas.create_note(&CreateNoteRequest::default());
        canvas.update_content(1, "<p>persisted</p>");
        canvas.flush().await.unwrap();
        canvas.notes().to_vec()
    };

    let local = Arc::new(SqliteLocalCache::open(&path).unwrap());
    let canvas = open_canvas(&Arc::new(InMemoryRemoteStore::new()), &local).await;
    assert_eq!(canvas.load_source(), LoadSource::Local);
    assert_eq!(canvas.notes(), saved.as_slice());
}
