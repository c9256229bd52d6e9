use stickynote_core::model::note::{is_palette_color, new_note, next_note_id};
use stickynote_core::{
    CanvasConfig, CanvasService, ColorChoice, CreateNoteRequest, FixedTrashRegion, FixedViewport,
    InMemoryRemoteStore, MemoryLocalCache, NoteBoard, Point, Size,
};
use std::sync::Arc;

const VIEWPORT: Size = Size::new(1024.0, 768.0);

#[test]
fn default_request_on_standard_viewport_creates_first_note() {
    let mut board = NoteBoard::new();
    let note = board.create_note(&CreateNoteRequest::default(), VIEWPORT);

    assert_eq!(note.id, 1);
    assert_eq!(note.z_index, 1);
    assert_eq!((note.x, note.y), (20.0, 80.0));
    assert_eq!((note.width, note.height), (200.0, 200.0));
    assert!(note.content.is_empty());
    assert!(is_palette_color(&note.color), "unexpected color {}", note.color);
}

#[test]
fn second_create_gets_next_id_and_z_index() {
    let mut board = NoteBoard::new();
    board.create_note(&CreateNoteRequest::default(), VIEWPORT);
    let second = board.create_note(&CreateNoteRequest::default(), VIEWPORT);
    assert_eq!(second.id, 2);
    assert_eq!(second.z_index, 2);
}

#[test]
fn ids_stay_unique_and_increasing_across_creates_and_deletes() {
    let mut board = NoteBoard::new();
    let mut seen = Vec::new();
    for round in 0..30u64 {
        let expected = next_note_id(board.notes());
        let note = board.create_note(&CreateNoteRequest::default(), VIEWPORT);
        assert_eq!(note.id, expected);
        assert!(!board.notes()[..board.len() - 1]
            .iter()
            .any(|other| other.id == note.id));
        seen.push(note.id);
        if round % 3 == 2 {
            board.delete_note(seen[seen.len() - 2]);
        }
    }
    let ids: Vec<_> = board.notes().iter().map(|note| note.id).collect();
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn creation_respects_margins_for_any_request() {
    let existing = Vec::new();
    for x in [-500.0, 0.0, 10.0, 400.0, 2000.0] {
        for y in [-500.0, 0.0, 70.0, 400.0, 2000.0] {
            for side in [0.0, 150.0, 300.0, 5000.0] {
                let note = new_note(
                    &existing,
                    Point::new(x, y),
                    Size::new(side, side),
                    "#fef9c3".to_string(),
                    VIEWPORT,
                );
                assert!(note.x >= 10.0);
                assert!(note.y >= 70.0);
                assert!(note.width >= 150.0);
                assert!(note.height >= 150.0);
            }
        }
    }
}

#[test]
fn fixed_color_is_kept_verbatim() {
    let mut board = NoteBoard::new();
    let request = CreateNoteRequest {
        color: "pink".parse::<ColorChoice>().unwrap(),
        ..CreateNoteRequest::default()
    };
    assert_eq!(board.create_note(&request, VIEWPORT).color, "#fecaca");
}

#[tokio::test]
async fn canvas_create_uses_live_viewport() {
    let mut canvas = CanvasService::open(
        &CanvasConfig::default(),
        Arc::new(InMemoryRemoteStore::new()),
        Arc::new(MemoryLocalCache::new()),
        Box::new(FixedViewport(Size::new(400.0, 260.0))),
        Box::new(FixedTrashRegion(None)),
    )
    .await;

    let note = canvas.create_note(&CreateNoteRequest::default());
    assert_eq!((note.x, note.y), (20.0, 70.0));
    assert_eq!((note.width, note.height), (200.0, 180.0));
}
