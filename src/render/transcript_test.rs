use super::*;

fn choices(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

// =============================================================
// Entries
// =============================================================

#[test]
fn new_transcript_is_empty_and_ready() {
    let transcript = Transcript::new();
    assert!(transcript.entries().is_empty());
    assert!(!transcript.is_typing());
    assert!(transcript.input().enabled);
    assert_eq!(transcript.scroll_anchor(), None);
}

#[test]
fn append_assigns_ordinals_and_scrolls() {
    let mut transcript = Transcript::new();
    transcript.append_entry(Role::User, Content::literal("hola"));
    transcript.append_entry(Role::Bot, Content::markup("<b>hola</b>"));
    let ordinals: Vec<usize> = transcript.entries().iter().map(|e| e.ordinal).collect();
    assert_eq!(ordinals, vec![0, 1]);
    assert_eq!(transcript.scroll_anchor(), Some(1));
}

#[test]
fn user_markup_stays_literal() {
    let mut transcript = Transcript::new();
    transcript.append_entry(Role::User, Content::literal("<b>hi</b>"));
    let entry = transcript.last().unwrap();
    assert_eq!(entry.content, Content::Literal("<b>hi</b>".into()));
    assert_eq!(entry.content.plain_text(), "<b>hi</b>");
}

// =============================================================
// Typing placeholder
// =============================================================

#[test]
fn show_typing_is_idempotent_and_not_an_entry() {
    let mut transcript = Transcript::new();
    transcript.show_typing();
    transcript.show_typing();
    assert!(transcript.is_typing());
    assert!(transcript.entries().is_empty());
    transcript.hide_typing();
    assert!(!transcript.is_typing());
}

#[test]
fn hide_typing_without_placeholder_is_noop() {
    let mut transcript = Transcript::new();
    transcript.hide_typing();
    assert!(!transcript.is_typing());
}

// =============================================================
// Choices
// =============================================================

#[test]
fn choices_attach_to_latest_bot_entry() {
    let mut transcript = Transcript::new();
    transcript.append_entry(Role::Bot, Content::markup("primer"));
    transcript.append_entry(Role::User, Content::literal("x"));
    transcript.append_entry(Role::Bot, Content::markup("segon"));
    transcript.render_choices(&choices(&["Faraó", "Argentina"]));

    let entries = transcript.entries();
    assert!(entries[0].choices.is_empty());
    assert_eq!(entries[2].choices.len(), 2);
    let active = transcript.active_choices().unwrap();
    assert_eq!(active.get(1), Some("Faraó"));
    assert_eq!(active.get(2), Some("Argentina"));
}

#[test]
fn empty_choices_render_nothing() {
    let mut transcript = Transcript::new();
    transcript.append_entry(Role::Bot, Content::markup("hola"));
    transcript.render_choices(&[]);
    assert!(transcript.last().unwrap().choices.is_empty());
    assert!(transcript.active_choices().is_none());
}

#[test]
fn choices_without_bot_entry_are_dropped() {
    let mut transcript = Transcript::new();
    transcript.append_entry(Role::User, Content::literal("x"));
    transcript.render_choices(&choices(&["a"]));
    assert!(transcript.last().unwrap().choices.is_empty());
}

#[test]
fn newer_bot_entry_hides_older_choices() {
    let mut transcript = Transcript::new();
    transcript.append_entry(Role::Bot, Content::markup("q"));
    transcript.render_choices(&choices(&["Sí", "No"]));
    transcript.append_entry(Role::Bot, Content::markup("r"));
    assert!(transcript.active_choices().is_none());
    assert_eq!(transcript.entries()[0].choices.len(), 2);
}

// =============================================================
// Input affordance
// =============================================================

#[test]
fn disabling_input_drops_focus() {
    let mut transcript = Transcript::new();
    transcript.set_input_enabled(false);
    assert!(!transcript.input().enabled);
    assert!(!transcript.input().focused);
    transcript.focus_input();
    assert!(!transcript.input().focused);
}

#[test]
fn focus_after_enable() {
    let mut transcript = Transcript::new();
    transcript.set_input_enabled(false);
    transcript.set_input_enabled(true);
    transcript.focus_input();
    assert!(transcript.input().focused);
}

#[test]
fn clear_input_empties_value() {
    let mut transcript = Transcript::new();
    transcript.input_mut().value = "draft".into();
    transcript.clear_input();
    assert!(transcript.input().value.is_empty());
}
