//! End-to-end editing scenarios through the public `Editor` API.

use pretty_assertions::assert_eq;
use sw_engine::error::AdapterError;
use sw_engine::{Editor, EditError, Resolution, Span};

fn words(list: &[&str]) -> Result<Vec<String>, AdapterError> {
    Ok(list.iter().map(ToString::to_string).collect())
}

/// "vana" typed, then the boundary, then the lookup answers.
fn scenario_a() -> Editor {
    let mut ed = Editor::new();
    ed.load("vana");
    let req = ed.type_char(' ').expect("boundary after a phonetic word starts a lookup");
    assert_eq!(req.word, "vana");
    let outcome = ed.apply_suggestion(req.token, words(&["வண", "வணா"]));
    assert_eq!(outcome, Resolution::Applied(Span::new(0, 2)));
    ed
}

#[test]
fn scenario_a_top_candidate_replaces_word() {
    let ed = scenario_a();
    assert_eq!(ed.current_content(), "வண ");
    assert_eq!(ed.active_range(), Some(Span::new(0, 2)));
    assert_eq!(ed.alternates(), ["வணா"]);
}

#[test]
fn scenario_b_failed_lookup_keeps_literal() {
    let mut ed = Editor::new();
    ed.load("vana");
    let req = ed.type_char(' ').unwrap();
    let outcome = ed.apply_suggestion(req.token, Err(AdapterError::Failed("offline".into())));

    assert_eq!(outcome, Resolution::Literal);
    assert_eq!(ed.current_content(), "vana ");
    assert_eq!(ed.active_range(), None);
}

#[test]
fn scenario_c_alternate_is_promoted() {
    let mut ed = scenario_a();
    assert!(ed.select_alternate("வணா"));

    assert_eq!(ed.current_content(), "வணா ");
    assert_eq!(ed.candidates(), ["வணா", "வண"]);
    assert_eq!(ed.alternates(), ["வண"]);
}

#[test]
fn scenario_d_undo_and_redo_around_suggestion() {
    let mut ed = scenario_a();

    ed.undo().unwrap();
    assert_eq!(ed.current_content(), "vana");
    assert_eq!(ed.active_range(), None);

    ed.redo().unwrap();
    assert_eq!(ed.current_content(), "வண ");
    assert!(matches!(ed.redo(), Err(EditError::NoHistory)));
}

#[test]
fn typing_a_line_of_dialogue() {
    let mut ed = Editor::new();
    let mut requests = ed.type_str("naan vanthen.");
    assert_eq!(requests.len(), 2);
    assert_eq!(ed.current_content(), "naan vanthen.");

    // Only the newest lookup may land.
    let last = requests.pop().unwrap();
    let first = requests.pop().unwrap();
    assert_eq!(
        ed.apply_suggestion(last.token, words(&["வந்தேன்"])),
        Resolution::Applied(Span::new(5, 12))
    );
    assert_eq!(
        ed.apply_suggestion(first.token, words(&["நான்"])),
        Resolution::Stale
    );
    assert_eq!(ed.current_content(), "naan வந்தேன்.");
}
