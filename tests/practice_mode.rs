mod common;

use common::*;
use saavy_piano::{Mode, PianoConfig, PianoError, PianoEvent, SongId};

fn practice_events(events: &[PianoEvent]) -> Vec<PianoEvent> {
    events
        .iter()
        .filter(|e| {
            matches!(
                e,
                PianoEvent::PracticeAdvanced { .. } | PianoEvent::PracticeCompleted { .. }
            )
        })
        .copied()
        .collect()
}

#[test]
fn wrong_note_neither_advances_nor_resets() {
    let mut piano = piano(&[ARPEGGIO], PianoConfig::default());
    piano.select_song("Arpeggio").unwrap();
    piano.drain_events().for_each(drop);

    // C4, a stray C2, E4, G4
    for (at, key) in [(0, 'b'), (100, 'q'), (200, 'm'), (300, '.')] {
        piano.advance_clock(ms(at));
        assert!(piano.press_key(key).is_some());
    }
    piano.advance_clock(ms(1250));
    assert_eq!(piano.judge().cursor(), 2);

    piano.advance_clock(ms(2000));
    let events: Vec<_> = piano.drain_events().collect();
    assert_eq!(
        practice_events(&events),
        vec![
            PianoEvent::PracticeAdvanced { cursor: 1, len: 3 },
            PianoEvent::PracticeAdvanced { cursor: 2, len: 3 },
            PianoEvent::PracticeAdvanced { cursor: 3, len: 3 },
            PianoEvent::PracticeCompleted { song: SongId(0) },
        ]
    );
}

#[test]
fn completion_returns_to_free_play() {
    let mut piano = piano(&[ARPEGGIO], PianoConfig::default());
    piano.select_song("Arpeggio").unwrap();
    for key in ['b', 'm', '.'] {
        piano.press_key(key);
    }
    piano.advance_clock(ms(1000));

    assert_eq!(piano.mode(), Mode::Free);
    assert_eq!(piano.current_song(), None);
    assert_eq!(piano.judge().cursor(), 0);

    // Playing the song again without selecting it is just free play
    for key in ['b', 'm', '.'] {
        piano.press_key(key);
    }
    piano.advance_clock(ms(3000));
    let completed = piano
        .drain_events()
        .filter(|e| matches!(e, PianoEvent::PracticeCompleted { .. }))
        .count();
    assert_eq!(completed, 1);
}

#[test]
fn only_wrong_notes_leave_the_cursor_at_zero() {
    let mut piano = piano(&[ARPEGGIO], PianoConfig::default());
    piano.select_song("Arpeggio").unwrap();
    for key in ['q', 'w', 'e'] {
        piano.press_key(key);
    }
    piano.advance_clock(ms(2000));

    assert_eq!(piano.mode(), Mode::Practice);
    assert_eq!(piano.judge().cursor(), 0);
    assert_eq!(piano.judge().expected(), piano.keyboard().notes.find("C4"));
}

#[test]
fn notes_count_when_their_tone_finishes() {
    let mut piano = piano(&[ARPEGGIO], PianoConfig::default());
    piano.select_song("Arpeggio").unwrap();
    piano.press_key('b');

    piano.advance_clock(ms(999));
    assert_eq!(piano.judge().cursor(), 0);
    piano.advance_clock(ms(1000));
    assert_eq!(piano.judge().cursor(), 1);
}

#[test]
fn restart_rewinds_the_judge() {
    let mut piano = piano(&[ARPEGGIO], PianoConfig::default());
    piano.select_song("Arpeggio").unwrap();
    piano.press_key('b');
    piano.advance_clock(ms(1000));
    assert_eq!(piano.judge().cursor(), 1);

    piano.restart();
    assert_eq!(piano.judge().cursor(), 0);
    assert_eq!(piano.mode(), Mode::Practice);
}

#[test]
fn muted_piano_still_tracks_and_animates() {
    let mut piano = piano(&[], PianoConfig::default());
    piano.set_muted(true);

    for key in ['b', 'm', '.'] {
        assert!(piano.press_key(key).is_some());
    }

    assert!(piano.tones().played.is_empty());
    assert_eq!(piano.active_notes().len(), 3);
    assert_eq!(piano.animations().len(), 3);
    let played = piano
        .drain_events()
        .filter(|e| matches!(e, PianoEvent::NotePlayed { .. }))
        .count();
    assert_eq!(played, 3);

    piano.advance_clock(ms(1000));
    assert!(piano.active_notes().is_empty());
    assert!(piano.tones().stopped.is_empty());
}

#[test]
fn muted_auto_play_keeps_time() {
    let mut piano = piano(&[SHORT], no_loop());
    piano.set_muted(true);
    piano.toggle_autoplay();
    piano.advance_clock(ms(5000));
    let events: Vec<_> = piano.drain_events().collect();

    assert!(piano.tones().played.is_empty());
    assert_eq!(
        autoplayed(&piano, &events),
        plays(&[(0, "C4"), (500, "C4"), (1000, "G4")])
    );
}

#[test]
fn muting_silences_what_is_already_sounding() {
    let mut piano = piano(&[], PianoConfig::default());
    piano.press_key('b');
    assert!(piano.toggle_mute());
    assert_eq!(piano.tones().stop_all_calls, 1);

    assert!(!piano.toggle_mute());
    piano.press_key('m');
    assert_eq!(piano.tones().played.len(), 2);
}

#[test]
fn shared_trigger_plays_the_lower_note() {
    let mut piano = piano(&[], PianoConfig::default());
    let note = piano.press_key('w').unwrap();

    assert_eq!(piano.keyboard().notes.name(note), "D2");
    assert_eq!(piano.tones().played, vec![73.42]);
}

#[test]
fn held_key_does_not_retrigger_until_released() {
    let mut piano = piano(&[], PianoConfig::default());
    assert!(piano.press_key('b').is_some());
    assert!(piano.press_key('B').is_none());
    assert_eq!(piano.tones().played.len(), 1);

    piano.release_key('b');
    assert!(piano.press_key('b').is_some());
    assert_eq!(piano.tones().played.len(), 2);
}

#[test]
fn finished_tones_are_stopped_by_handle() {
    let mut piano = piano(&[], PianoConfig::default());
    piano.press_key('b');
    piano.advance_clock(ms(100));
    piano.press_key('m');

    piano.advance_clock(ms(1100));
    assert_eq!(
        piano.tones().stopped,
        vec![
            saavy_piano::synth::ToneHandle(0),
            saavy_piano::synth::ToneHandle(1)
        ]
    );
}

#[test]
fn unknown_song_is_rejected_without_side_effects() {
    let mut piano = piano(&[ARPEGGIO], PianoConfig::default());
    piano.select_song("Arpeggio").unwrap();
    piano.press_key('b');
    piano.advance_clock(ms(1000));

    let err = piano.select_song("Nope").unwrap_err();
    assert_eq!(err, PianoError::UnknownSong("Nope".into()));
    assert_eq!(piano.mode(), Mode::Practice);
    assert_eq!(piano.current_song(), Some(SongId(0)));
    assert_eq!(piano.judge().cursor(), 1);
}

#[test]
fn unbound_keys_do_nothing() {
    let mut piano = piano(&[], PianoConfig::default());
    assert_eq!(piano.press_key('1'), None);
    piano.release_key('1');

    assert!(piano.tones().played.is_empty());
    assert_eq!(piano.next_deadline(), None);
}
