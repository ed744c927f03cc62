use glossa_core::{
    BlockKind, BlockRenderMap, DialogLine, Document, DocumentBlock, DocumentIdentifier,
    DocumentService, DocumentServiceError, Fragment, FragmentData, FragmentType, FragmentableString,
    GridPosition, Id, IdSource, InsertPosition, IntersectType, LayoutCommand, Range,
    RenderMapEntry, UuidIdSource, VerticalDirection,
};
use glossa_core::fragment::resolve_sentence_words;
use std::cell::Cell;

struct SequentialIds(Cell<u32>);

impl IdSource for SequentialIds {
    fn next_id(&self) -> Id {
        let next = self.0.get() + 1;
        self.0.set(next);
        Id::from(format!("gen-{next}"))
    }
}

fn paragraph(id: &str, text_id: &str, text: &str) -> DocumentBlock {
    DocumentBlock::new(
        Id::from(id),
        BlockKind::Paragraph {
            content: Id::from(text_id),
        },
        vec![FragmentableString::new(Id::from(text_id), text)],
    )
}

fn service() -> DocumentService<SequentialIds> {
    let mut document = Document::new(Id::from("doc"), "Lesson", "de", 1_700_000_000_000);
    document.blocks = vec![paragraph("p1", "t1", "Der Hund schläft im Garten.")];
    document.render_map = BlockRenderMap::new(vec![vec![RenderMapEntry::block(Id::from("p1"))]]);
    DocumentService::new(document, SequentialIds(Cell::new(0))).expect("valid document")
}

fn note(text: &str) -> FragmentData {
    FragmentData::Note {
        note: text.to_string(),
    }
}

#[test]
fn rejects_inconsistent_document_on_open() {
    let mut document = Document::new(Id::from("doc"), "Lesson", "de", 0);
    document.blocks = vec![paragraph("p1", "t1", "text")];
    let err = DocumentService::new(document, UuidIdSource).err().expect("unplaced block");
    assert!(matches!(err, DocumentServiceError::Validation(_)));
}

#[test]
fn selection_rejects_inverted_offsets() {
    let service = service();
    let err = service
        .selection(Id::from("p1"), Id::from("t1"), 8, 3)
        .expect_err("end before start");
    assert!(matches!(err, DocumentServiceError::InvalidRange(_)));
}

#[test]
fn annotate_then_select_reports_inside_hit() {
    let mut service = service();
    let selection = service
        .selection(Id::from("p1"), Id::from("t1"), 4, 8)
        .expect("valid offsets");
    let id = service.annotate(&selection, note("dog")).expect("annotates");
    assert_eq!(id, Id::from("gen-1"));

    let hits = service.select(&selection).expect("selectable");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].fragment.id, id);
    assert_eq!(hits[0].intersect_type, IntersectType::Inside);
}

#[test]
fn overlapping_annotation_is_split() {
    let mut service = service();
    let first = service
        .selection(Id::from("p1"), Id::from("t1"), 5, 10)
        .expect("valid offsets");
    service.annotate(&first, note("a")).expect("annotates");
    let second = service
        .selection(Id::from("p1"), Id::from("t1"), 3, 8)
        .expect("valid offsets");
    service.annotate(&second, note("b")).expect("annotates");

    let text = &service.document().blocks[0].fragmentables[0];
    assert_eq!(text.fragments.len(), 2);
    assert_eq!(text.fragments[1].range, Range::new(3, 5));
}

#[test]
fn split_sentence_keeps_words_on_their_text() {
    let mut service = service();
    let highlight = service
        .selection(Id::from("p1"), Id::from("t1"), 0, 5)
        .expect("valid offsets");
    service
        .annotate(&highlight, FragmentData::Highlight)
        .expect("annotates highlight");

    let word = |id: &str, start: usize, end: usize| {
        Fragment::new(
            Id::from(id),
            Range::new(start, end),
            FragmentData::Word {
                dict_id: Id::from("dict"),
            },
        )
    };
    let sentence_selection = service
        .selection(Id::from("p1"), Id::from("t1"), 3, 15)
        .expect("valid offsets");
    let sentence = service
        .annotate(
            &sentence_selection,
            FragmentData::Sentence {
                translation: "dog sleeps".to_string(),
                words: vec![word("w-cut", 0, 2), word("w-kept", 6, 12)],
            },
        )
        .expect("split sentence still validates");

    let text = &service.document().blocks[0].fragmentables[0];
    let stored = text.find_fragment(&sentence).expect("sentence stored");
    assert_eq!(stored.range, Range::new(5, 15));

    let resolved = resolve_sentence_words(text.root(), stored);
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].fragment.id, Id::from("w-kept"));
    assert_eq!(resolved[0].absolute_range, Range::new(9, 15));
    assert_eq!(resolved[0].value, "schläf");
}

#[test]
fn out_of_bounds_selection_leaves_document_untouched() {
    let mut service = service();
    let before = service.document().clone();
    let selection = service
        .selection(Id::from("p1"), Id::from("t1"), 20, 99)
        .expect("offsets are ordered");

    let err = service
        .annotate(&selection, FragmentData::Highlight)
        .expect_err("past the root");
    assert!(matches!(err, DocumentServiceError::SelectionOutOfBounds { .. }));
    assert_eq!(service.document(), &before);
}

#[test]
fn empty_selection_is_rejected_as_fragment() {
    let mut service = service();
    let selection = service
        .selection(Id::from("p1"), Id::from("t1"), 4, 4)
        .expect("empty but ordered");
    let err = service
        .annotate(&selection, FragmentData::Background)
        .expect_err("empty fragment");
    assert!(matches!(err, DocumentServiceError::Fragment(_)));
}

#[test]
fn words_are_stored_relative_to_sentence() {
    let mut service = service();
    let sentence_selection = service
        .selection(Id::from("p1"), Id::from("t1"), 4, 27)
        .expect("valid offsets");
    let sentence = service
        .annotate(
            &sentence_selection,
            FragmentData::Sentence {
                translation: "The dog sleeps in the garden.".to_string(),
                words: Vec::new(),
            },
        )
        .expect("annotates sentence");

    let word_selection = service
        .selection(Id::from("p1"), Id::from("t1"), 9, 16)
        .expect("valid offsets");
    let word = service
        .annotate_word(&word_selection, &sentence, Id::from("dict-schlafen"))
        .expect("word inside sentence");

    let text = &service.document().blocks[0].fragmentables[0];
    let stored = text.find_fragment(&sentence).expect("sentence kept");
    assert_eq!(stored.words().len(), 1);
    assert_eq!(stored.words()[0].id, word);
    assert_eq!(stored.words()[0].range, Range::new(5, 12));

    let hits = service.select(&word_selection).expect("selectable");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].children.len(), 1);
    assert_eq!(hits[0].children[0].intersect_type, IntersectType::Inside);
}

#[test]
fn word_outside_sentence_or_on_plain_fragment_is_rejected() {
    let mut service = service();
    let sentence_selection = service
        .selection(Id::from("p1"), Id::from("t1"), 4, 9)
        .expect("valid offsets");
    let sentence = service
        .annotate(
            &sentence_selection,
            FragmentData::Sentence {
                translation: "dog".to_string(),
                words: Vec::new(),
            },
        )
        .expect("annotates sentence");

    let before_sentence = service
        .selection(Id::from("p1"), Id::from("t1"), 0, 3)
        .expect("valid offsets");
    let err = service
        .annotate_word(&before_sentence, &sentence, Id::from("dict"))
        .expect_err("starts before sentence");
    assert!(matches!(
        err,
        DocumentServiceError::SelectionOutsideSentence { .. }
    ));

    let plain = service
        .annotate(&before_sentence, note("article"))
        .expect("annotates note");
    let err = service
        .annotate_word(&before_sentence, &plain, Id::from("dict"))
        .expect_err("not a sentence");
    assert!(matches!(err, DocumentServiceError::NotASentence(_)));
}

#[test]
fn clear_annotations_honors_type_filter() {
    let mut service = service();
    let selection = service
        .selection(Id::from("p1"), Id::from("t1"), 0, 8)
        .expect("valid offsets");
    service.annotate(&selection, note("n")).expect("note");
    service
        .annotate(&selection, FragmentData::Highlight)
        .expect("highlight");

    let removed = service
        .clear_annotations(&selection, Some(FragmentType::Highlight))
        .expect("clears");
    assert_eq!(removed, 1);
    let removed = service.clear_annotations(&selection, None).expect("clears");
    assert_eq!(removed, 1);
    assert!(service.select(&selection).expect("selectable").is_empty());
}

#[test]
fn highlight_and_spelling_state() {
    let mut service = service();
    let selection = service
        .selection(Id::from("p1"), Id::from("t1"), 0, 3)
        .expect("valid offsets");
    let fragment_id = service.annotate(&selection, note("article")).expect("note");

    let identifier = DocumentIdentifier {
        block_id: Id::from("p1"),
        fragmentable_id: Id::from("t1"),
        fragment_id: fragment_id.clone(),
    };
    service
        .set_highlighted_fragment(&identifier)
        .expect("fragment exists");
    let missing = DocumentIdentifier {
        fragment_id: Id::from("nope"),
        ..identifier
    };
    assert!(matches!(
        service.set_highlighted_fragment(&missing),
        Err(DocumentServiceError::FragmentNotFound(_))
    ));

    let shown = service
        .toggle_spelling(&Id::from("p1"), &Id::from("t1"))
        .expect("fragmentable exists");
    assert!(!shown);
    let text = &service.document().blocks[0].fragmentables[0];
    assert_eq!(text.highlighted_fragment.as_ref(), Some(&fragment_id));
}

#[test]
fn insert_layout_and_remove_blocks() {
    let mut service = service();
    service
        .apply_layout(&LayoutCommand::SplitRow { row: 0 })
        .expect("row has room");
    service
        .insert_block(paragraph("p2", "t2", "Zweiter Absatz."), InsertPosition::Start)
        .expect("fills placeholder");
    assert_eq!(service.document().render_map.rows[0].len(), 2);
    assert_eq!(service.document().render_map.rows[0][1].id, Id::from("p2"));

    let dialog = DocumentBlock::new(
        Id::from("d1"),
        BlockKind::Dialog {
            lines: vec![DialogLine {
                speaker: "Anna".to_string(),
                speech: Id::from("s1"),
            }],
        },
        vec![FragmentableString::new(Id::from("s1"), "Hallo!")],
    );
    service
        .insert_block(dialog, InsertPosition::End)
        .expect("appends row");
    assert_eq!(service.document().render_map.row_count(), 2);

    let duplicate = paragraph("p2", "t9", "again");
    assert!(matches!(
        service.insert_block(duplicate, InsertPosition::End),
        Err(DocumentServiceError::DuplicateBlock(_))
    ));

    service
        .apply_layout(&LayoutCommand::Swap {
            source: GridPosition::new(0, 0),
            target: GridPosition::new(1, 0),
        })
        .expect("distinct cells");
    assert_eq!(service.document().render_map.rows[0][0].id, Id::from("d1"));

    assert!(matches!(
        service.apply_layout(&LayoutCommand::Scale {
            id: Id::from("p1"),
            direction: VerticalDirection::Up,
        }),
        Err(DocumentServiceError::LayoutNotApplicable("scale"))
    ));

    let removed = service.remove_block(&Id::from("p2")).expect("block exists");
    assert_eq!(removed.id, Id::from("p2"));
    assert!(service.document().block(&Id::from("p2")).is_none());
    service.document().validate().expect("still consistent");
}
