mod common;

use common::{TWELVE, TWENTY_FOUR, accepting_input, card_frame, empty_frame, pages, words};
use pretty_assertions::assert_eq;
use tinyseed::NavigationEvent::{Confirm, Next};
use tinyseed::scan::{CAPTURE_MESSAGE, REVIEW_MESSAGE, WAIT_MESSAGE};
use tinyseed::vision::StillCamera;
use tinyseed::{CommandRecorder, Config, DeviceProfile, DrawCommand, ScanConfig, TinySeed};

fn seed_for(device: DeviceProfile, max_frames: u64) -> TinySeed {
    TinySeed::new(Config {
        device,
        scan: ScanConfig {
            max_frames: Some(max_frames),
            ..ScanConfig::default()
        },
        ..Config::default()
    })
}

fn shown_text(display: &CommandRecorder) -> Vec<String> {
    display
        .commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::DrawString { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn twelve_word_card_is_recovered() {
    let grid = pages(TWELVE)[0];
    let mut camera = StillCamera::new(vec![card_frame(&grid, 0, false)], 3);
    let seed = seed_for(DeviceProfile::dock(), 20);
    let mut display = CommandRecorder::for_profile(seed.profile());
    let mut input = accepting_input(&[]);

    let recovered = seed.scan(12, &mut camera, &mut display, &mut input).unwrap();
    assert_eq!(recovered, Some(words(TWELVE)));

    let text = shown_text(&display);
    assert!(text.iter().any(|t| t == WAIT_MESSAGE));
    assert!(text.iter().any(|t| t == REVIEW_MESSAGE));
    let frames = display.count(|c| matches!(c, DrawCommand::Frame { .. }));
    assert!(frames >= 2);
}

#[test]
fn mirrored_optics_read_the_same_card() {
    let grid = pages(TWELVE)[0];
    let mut camera = StillCamera::new(vec![card_frame(&grid, 0, true)], 3);
    let seed = seed_for(DeviceProfile::amigo(), 20);
    let mut display = CommandRecorder::for_profile(seed.profile());
    let mut input = accepting_input(&[]);

    let recovered = seed.scan(12, &mut camera, &mut display, &mut input).unwrap();
    assert_eq!(recovered, Some(words(TWELVE)));
}

#[test]
fn twenty_four_words_take_both_faces() {
    let pages = pages(TWENTY_FOUR);
    let front = card_frame(&pages[0], 0, false);
    let back = card_frame(&pages[1], 1, false);
    // one look at the front before capture starts, one stable capture
    let mut camera = StillCamera::new(vec![front.clone(), front, back.clone(), back], 1);
    let seed = seed_for(DeviceProfile::dock(), 20);
    let mut display = CommandRecorder::for_profile(seed.profile());
    let mut input = accepting_input(&[Confirm]);

    let recovered = seed.scan(24, &mut camera, &mut display, &mut input).unwrap();
    assert_eq!(recovered, Some(words(TWENTY_FOUR)));
    assert!(shown_text(&display).iter().any(|t| t == CAPTURE_MESSAGE));
}

#[test]
fn nothing_in_view_runs_out_of_frames() {
    let mut camera = StillCamera::new(vec![empty_frame()], 100);
    let seed = seed_for(DeviceProfile::dock(), 10);
    let mut display = CommandRecorder::for_profile(seed.profile());
    let mut input = accepting_input(&[]);

    let recovered = seed.scan(12, &mut camera, &mut display, &mut input).unwrap();
    assert_eq!(recovered, None);
    let frames = display.count(|c| matches!(c, DrawCommand::Frame { .. }));
    assert_eq!(frames, 10);
}

#[test]
fn button_press_aborts_the_scan() {
    let mut camera = StillCamera::new(vec![empty_frame()], 100);
    let seed = seed_for(DeviceProfile::dock(), 50);
    let mut display = CommandRecorder::for_profile(seed.profile());
    let mut input = accepting_input(&[Next]);

    let recovered = seed.scan(24, &mut camera, &mut display, &mut input).unwrap();
    assert_eq!(recovered, None);
    assert_eq!(display.count(|c| matches!(c, DrawCommand::Frame { .. })), 1);
}

#[test]
fn unsupported_length_is_rejected_up_front() {
    let mut camera = StillCamera::new(vec![empty_frame()], 1);
    let seed = seed_for(DeviceProfile::dock(), 5);
    let mut display = CommandRecorder::for_profile(seed.profile());
    let mut input = accepting_input(&[]);
    let result = seed.scan(18, &mut camera, &mut display, &mut input);
    assert!(result.is_err());
}
