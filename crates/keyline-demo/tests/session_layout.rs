#![forbid(unsafe_code)]

//! End-to-end layout checks for the password screen.
//!
//! Each test runs a full session against the simulated host and inspects
//! the reported snapshots:
//! - The built-in session on a classic (un-notched) screen
//! - A notched screen, where the safe-area inset is subtracted from the lift
//! - Host scripts replayed from JSONL

use keyline_demo::cli::Opts;
use keyline_demo::session::{Session, Step, StepReport, default_steps, script_steps};
use keyline_runtime::{BrokerConfig, ReactivationPolicy};
use pretty_assertions::assert_eq;

fn run(opts: &Opts, steps: &[Step]) -> Vec<StepReport> {
    Session::new(opts, BrokerConfig::default()).run(steps)
}

fn button_ys(reports: &[StepReport]) -> Vec<f64> {
    reports.iter().map(|r| r.layout.button_y).collect()
}

#[test]
fn default_session_on_classic_screen() {
    let opts = Opts::default();
    let reports = run(&opts, &default_steps(opts.keyboard_height));

    let steps: Vec<_> = reports.iter().map(|r| r.step.as_str()).collect();
    assert_eq!(
        steps,
        vec![
            "appear",
            "focus_field",
            "tap_background",
            "focus_field",
            "keyboard_height=261",
            "disappear",
            "tap_background",
            "focus_field",
        ]
    );

    // 667 - 16 - 48 at rest; 667 - (216 + 16) - 48 lifted; 667 - (261 + 16) - 48 after resize.
    assert_eq!(
        button_ys(&reports),
        vec![603.0, 387.0, 603.0, 387.0, 342.0, 342.0, 342.0, 342.0]
    );

    // Only WillShow/WillHide are observed, and nothing after disappear.
    let delivered: Vec<_> = reports.iter().map(|r| r.delivered).collect();
    assert_eq!(delivered, vec![0, 1, 1, 1, 1, 0, 0, 0]);

    let listening: Vec<_> = reports.iter().map(|r| r.layout.listening).collect();
    assert_eq!(
        listening,
        vec![true, true, true, true, true, false, false, false]
    );
}

#[test]
fn content_area_shrinks_with_keyboard() {
    let opts = Opts::default();
    let reports = run(&opts, &[Step::Appear, Step::FocusField, Step::TapBackground]);
    assert_eq!(reports[0].layout.content_top, 20.0);
    assert_eq!(reports[0].layout.content_height, 583.0);
    assert_eq!(reports[1].layout.content_height, 367.0);
    assert!(reports[1].layout.keyboard_visible);
    assert!(!reports[2].layout.keyboard_visible);
}

#[test]
fn notched_screen_subtracts_safe_area() {
    let opts = Opts {
        screen_width: 390.0,
        screen_height: 844.0,
        safe_bottom: 34.0,
        safe_top: 47.0,
        keyboard_height: 291.0,
        ..Opts::default()
    };
    let reports = run(&opts, &[Step::Appear, Step::FocusField, Step::TapBackground]);

    // Rest: flush with the safe-area bottom. Lifted: 16 above the keyboard top at 553.
    assert_eq!(button_ys(&reports), vec![762.0, 489.0, 762.0]);
    let lifted = reports[1].layout.button_frame();
    assert_eq!(lifted.max_y(), 553.0 - 16.0);
}

#[test]
fn host_script_replays_through_broker() {
    let script = r#"
# keyboard up, then down
{"name":"UIKeyboardWillShowNotification","user_info":{"UIKeyboardFrameEndUserInfoKey":{"x":0,"y":451,"width":375,"height":216}}}
{"name":"did_show"}
{"name":"UIApplicationDidBecomeActiveNotification"}
{"name":"will_hide","user_info":{"UIKeyboardFrameEndUserInfoKey":"{{0, 667}, {375, 216}}"}}
"#;
    let steps = script_steps(script).unwrap();
    assert_eq!(steps.len(), 5);

    let reports = run(&Opts::default(), &steps);
    let steps: Vec<_> = reports.iter().map(|r| r.step.as_str()).collect();
    assert_eq!(
        steps,
        vec!["appear", "host:will_show", "host:did_show", "host:will_hide", "disappear"]
    );
    assert_eq!(button_ys(&reports), vec![603.0, 387.0, 387.0, 603.0, 603.0]);
    let delivered: Vec<_> = reports.iter().map(|r| r.delivered).collect();
    assert_eq!(delivered, vec![0, 1, 0, 1, 0]);
}

#[test]
fn keep_existing_policy_gives_same_layout() {
    let opts = Opts::default();
    let config = BrokerConfig::default().with_reactivation(ReactivationPolicy::KeepExisting);
    let session = Session::new(&opts, config);
    let reports = session.run(&[Step::Appear, Step::Appear, Step::FocusField]);
    assert_eq!(reports[2].delivered, 1);
    assert_eq!(reports[2].layout.button_y, 387.0);
    assert!(session.keyboard().is_shown());
    assert_eq!(session.screen().broker().center().observer_count(), 2);
}

#[test]
fn reports_serialize_flat() {
    let opts = Opts::default();
    let reports = run(&opts, &[Step::Appear]);
    let value = serde_json::to_value(&reports[0]).unwrap();
    assert_eq!(value["step"], "appear");
    assert_eq!(value["delivered"], 0);
    assert_eq!(value["button_y"], 603.0);
    assert_eq!(value["listening"], true);
}
