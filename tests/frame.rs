//! Frame presentation: window setup on init, pixel-exact BGRA to RGB
//! conversion, and the init-before-draw ordering.

mod common;

const GUEST: &str = r#"(module
  (import "loading" "onGameInit" (func $onGameInit (param i32 i32)))
  (import "ui" "drawFrame" (func $drawFrame (param i32)))
  (memory (export "memory") 1)
  ;; one 2x2 row-major BGRA frame, every byte distinct
  (data (i32.const 1024) "\01\02\03\04\05\06\07\08\09\0a\0b\0c\0d\0e\0f\10")
  (func (export "initGame")
    (call $onGameInit (i32.const 2) (i32.const 2)))
  (func (export "tickGame")
    (call $drawFrame (i32.const 1024)))
  (func (export "reportKeyDown") (param i32))
  (func (export "reportKeyUp") (param i32)))"#;

#[test]
fn init_opens_the_window_once_at_guest_dimensions() {
    let (mut host, handle) = common::load_guest(GUEST, vec![], common::temp_dir("frame-open"));
    host.init().unwrap();

    let state = handle.borrow();
    assert_eq!(state.opened, vec![(2, 2, "DOOM".to_string())]);
    assert!(state.frames.is_empty());
}

#[test]
fn drawn_frame_is_converted_pixel_exactly() {
    let (mut host, handle) = common::load_guest(GUEST, vec![], common::temp_dir("frame-draw"));
    host.init().unwrap();
    host.tick().unwrap();

    let state = handle.borrow();
    assert_eq!(state.frames.len(), 1);
    let frame = &state.frames[0];
    assert_eq!((frame.width(), frame.height()), (2, 2));
    // BGRA byte triples reversed to RGB, alpha dropped.
    assert_eq!(frame.rgb_at(0, 0), (3, 2, 1));
    assert_eq!(frame.rgb_at(1, 0), (7, 6, 5));
    assert_eq!(frame.rgb_at(0, 1), (11, 10, 9));
    assert_eq!(frame.rgb_at(1, 1), (15, 14, 13));
}

#[test]
fn every_tick_presents_another_frame() {
    let (mut host, handle) = common::load_guest(GUEST, vec![], common::temp_dir("frame-ticks"));
    host.init().unwrap();
    host.tick().unwrap();
    host.tick().unwrap();
    host.tick().unwrap();

    assert_eq!(handle.borrow().frames.len(), 3);
}

#[test]
fn draw_before_init_traps() {
    let wat = r#"(module
                    (import "ui" "drawFrame" (func $drawFrame (param i32)))
                    (memory (export "memory") 1)
                    (func (export "initGame")
                      (call $drawFrame (i32.const 0)))
                    (func (export "tickGame"))
                    (func (export "reportKeyDown") (param i32))
                    (func (export "reportKeyUp") (param i32)))"#;

    let (mut host, handle) = common::load_guest(wat, vec![], common::temp_dir("frame-early"));
    let err = host.init().unwrap_err();
    assert!(format!("{err:?}").contains("not configured"));
    assert!(handle.borrow().frames.is_empty());
}

#[test]
fn second_init_traps() {
    let wat = r#"(module
                    (import "loading" "onGameInit" (func $onGameInit (param i32 i32)))
                    (memory (export "memory") 1)
                    (func (export "initGame")
                      (call $onGameInit (i32.const 2) (i32.const 2))
                      (call $onGameInit (i32.const 4) (i32.const 4)))
                    (func (export "tickGame"))
                    (func (export "reportKeyDown") (param i32))
                    (func (export "reportKeyUp") (param i32)))"#;

    let (mut host, handle) = common::load_guest(wat, vec![], common::temp_dir("frame-twice"));
    let err = host.init().unwrap_err();
    assert!(format!("{err:?}").contains("already configured"));
    // The first call still opened the window before the second trapped.
    assert_eq!(handle.borrow().opened.len(), 1);
}
