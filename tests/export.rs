mod common;

use common::{TWELVE, TWENTY_FOUR, pages, words};
use pretty_assertions::assert_eq;
use tinyseed::NavigationEvent::Confirm;
use tinyseed::export::{BITMAP_SIZE, PRINT_HEADER};
use tinyseed::{
    CommandRecorder, DrawCommand, ImageRenderOptions, PrinterCommand, RecordingPrinter,
    ScriptedInput, TinySeed, TinySeedError, render_card_image,
};

#[test]
fn screen_pages_follow_the_word_count() {
    let seed = TinySeed::default();
    assert_eq!(seed.export_punchgrid(&words(TWELVE)).unwrap().len(), 1);
    let pages = seed.export_punchgrid(&words(TWENTY_FOUR)).unwrap();
    assert_eq!(pages.len(), 2);
    assert!(pages.iter().all(|commands| commands.len() > 26));
}

#[test]
fn show_waits_for_a_press_per_page() {
    let seed = TinySeed::default();
    let mut display = CommandRecorder::for_profile(seed.profile());
    let mut input = ScriptedInput::new([Confirm, Confirm]);
    seed.show_punchgrid(&words(TWENTY_FOUR), &mut display, &mut input).unwrap();
    assert_eq!(input.remaining(), 0);
    // one clear per page and a final one
    assert_eq!(display.count(|c| matches!(c, DrawCommand::Clear)), 3);
}

#[test]
fn printer_stream_prints_each_page() {
    let seed = TinySeed::default();
    let commands = seed.export_punchgrid_bitmap(&words(TWENTY_FOUR)).unwrap();
    let header = PrinterCommand::PrintString(PRINT_HEADER.to_string());
    assert_eq!(commands[0], header);
    let modes = commands
        .iter()
        .filter(|c| matches!(c, PrinterCommand::SetBitmapMode { .. }))
        .count();
    assert_eq!(modes, 2);
    let lines = commands
        .iter()
        .filter(|c| matches!(c, PrinterCommand::BitmapLine(_)))
        .count();
    assert_eq!(lines, 2 * BITMAP_SIZE as usize);

    let mut display = CommandRecorder::for_profile(seed.profile());
    let mut printer = RecordingPrinter::default();
    seed.print_punchgrid(&words(TWENTY_FOUR), &mut display, &mut printer).unwrap();
    assert_eq!(printer.commands, commands);
}

#[test]
fn pages_differ_between_the_two_faces() {
    let pages = pages(TWENTY_FOUR);
    let options = ImageRenderOptions::default();
    let front = render_card_image(&pages[0], 0, &options).unwrap();
    let back = render_card_image(&pages[1], 1, &options).unwrap();
    assert_eq!(front.width(), back.width());
    assert_ne!(front.as_bytes(), back.as_bytes());
}

#[test]
fn unknown_words_and_lengths_are_rejected() {
    let seed = TinySeed::default();
    let mut phrase = words(TWELVE);
    phrase[3] = "notaword".into();
    assert_eq!(
        seed.export_punchgrid_bitmap(&phrase).unwrap_err(),
        TinySeedError::UnknownWord("notaword".into())
    );
    assert_eq!(
        seed.export_punchgrid(&words(TWELVE)[..11]).unwrap_err(),
        TinySeedError::UnsupportedWordCount(11)
    );
}
