//! Test cases for the loopback instrument simulator.

use rstest::*;

use instlink::{InstrumentInterface, LoopbackInterface};

/// Create a loopback interface that contains no traffic.
#[fixture]
fn emp_lbk() -> LoopbackInterface<String> {
    LoopbackInterface::new(vec![], vec![])
}

/// Ensure `finalize` passes if an empty loopback interface is used.
#[rstest]
fn finalize_empty(mut emp_lbk: LoopbackInterface<String>) {
    emp_lbk.finalize();
}

/// Ensure `finalize` panics if traffic is left in either queue.
#[rstest]
#[case(vec!["cmd"], vec![])]
#[case(vec![], vec!["resp"])]
#[case(vec!["cmd"], vec!["resp"])]
#[should_panic]
fn finalize_panics_on_leftovers(#[case] from_host: Vec<&str>, #[case] from_inst: Vec<&str>) {
    let mut lbk = LoopbackInterface::new(from_host, from_inst);
    lbk.finalize();
}

/// A response is dequeued as soon as its first byte is served, so a partially read response does
/// not count as leftover traffic.
#[rstest]
fn finalize_after_partial_read() {
    let mut lbk = LoopbackInterface::new(vec![], vec!["abcdef"]);
    let mut buf = [0u8; 2];
    lbk.read_exact(&mut buf).unwrap();
    assert_eq!(&buf, b"ab");
    lbk.finalize();
}

/// Commands are checked in order; a second `sendcmd` consumes the second expectation.
#[rstest]
fn sendcmd_in_order() {
    let mut lbk = LoopbackInterface::new(vec!["cmd1", "cmd2"], vec![]);
    lbk.sendcmd("cmd1").unwrap();
    lbk.sendcmd("cmd2").unwrap();
    lbk.finalize();
}

/// An unexpected command panics rather than erroring, as this is a test interface.
#[rstest]
#[should_panic]
fn sendcmd_mismatch() {
    let mut lbk = LoopbackInterface::new(vec!["cmd1"], vec![]);
    let _ = lbk.sendcmd("cmd3");
}

/// Expected commands are compared with the currently set terminator appended.
#[rstest]
fn sendcmd_with_custom_terminator() {
    let mut lbk = LoopbackInterface::new(vec!["UNI"], vec![]);
    lbk.set_terminator("\r\n");
    lbk.sendcmd("UNI").unwrap();
    lbk.finalize();
}

#[rstest]
fn terminator(mut emp_lbk: LoopbackInterface<String>) {
    emp_lbk.test_terminator("\n");
    emp_lbk.set_terminator("\r\n");
    emp_lbk.test_terminator("\r\n");
}

#[rstest]
#[should_panic]
fn terminator_wrong(emp_lbk: LoopbackInterface<String>) {
    emp_lbk.test_terminator("\r\n");
}

/// Queries pair each expected command with the next canned response.
#[rstest]
fn query_in_order() {
    let mut lbk = LoopbackInterface::new(vec!["cmd1", "cmd2"], vec!["resp1", "resp2"]);
    assert_eq!(lbk.query("cmd1").unwrap(), "resp1");
    assert_eq!(lbk.query("cmd2").unwrap(), "resp2");
    lbk.finalize();
}

/// Responses are served with the custom terminator appended, and the query trims it back off.
#[rstest]
fn query_with_custom_terminator() {
    let mut lbk = LoopbackInterface::new(vec!["AYT"], vec!["ASDF1234"]);
    lbk.set_terminator("\r\n");
    assert_eq!(lbk.query("AYT").unwrap(), "ASDF1234");
    lbk.finalize();
}

/// Responses are served byte-wise, so one canned response spans multiple reads.
#[rstest]
fn read_exact_partial() {
    let mut lbk = LoopbackInterface::new(vec![], vec!["abcdef"]);
    let mut buf = [0u8; 3];
    lbk.read_exact(&mut buf).unwrap();
    assert_eq!(&buf, b"abc");
    lbk.read_exact(&mut buf).unwrap();
    assert_eq!(&buf, b"def");
}

/// Writes and reads interleave freely; only the per-direction order is enforced.
#[rstest]
fn interleaved_traffic() {
    let mut lbk = LoopbackInterface::new(vec!["arm", "fetch"], vec!["+1.0E+00"]);
    lbk.sendcmd("arm").unwrap();
    assert_eq!(lbk.query("fetch").unwrap(), "+1.0E+00");
    lbk.finalize();
}
