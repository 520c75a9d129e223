use std::time::Duration;

use crate::report::{completion_line, report_line, write_completion, write_report};

#[test]
fn report_line_matches_wire_format() {
    let line = report_line(Duration::from_millis(2100), 844000, 4000, 4220);
    assert_eq!(line, "uptime=2.1s ops=844000 bag=4000 leak=4220");
}

#[test]
fn report_line_handles_zero_everything() {
    let line = report_line(Duration::ZERO, 0, 0, 0);
    assert_eq!(line, "uptime=0.0s ops=0 bag=0 leak=0");
}

#[test]
fn completion_line_matches_wire_format() {
    assert_eq!(completion_line(7, 1), "DONE ops=7 leak=1");
    assert_eq!(completion_line(0, 0), "DONE ops=0 leak=0");
}

#[test]
fn writers_terminate_lines_with_newline() {
    let mut sink = Vec::new();
    write_report(&mut sink, Duration::from_secs(3), 12, 4, 2).unwrap();
    write_completion(&mut sink, 12, 2).unwrap();
    let text = String::from_utf8(sink).unwrap();
    assert_eq!(text, "uptime=3.0s ops=12 bag=4 leak=2\nDONE ops=12 leak=2\n");
}
