//! End-to-end tests of the polling and logging pipeline against a simulated counter.

use std::{fs, time::Duration};

use rstest::*;
use tempfile::tempdir;

use counterlog::{LogSink, Poller, StopToken};
use instlink::LoopbackInterface;
use keysight_53220a::Keysight53220a;

type Counter = Keysight53220a<LoopbackInterface<&'static str>>;

fn crt_inst(host2inst: Vec<&'static str>, inst2host: Vec<&'static str>) -> Counter {
    let loopback = LoopbackInterface::new(host2inst, inst2host);
    Keysight53220a::try_new(loopback).unwrap()
}

/// One reading followed by an empty buffer appends exactly one record.
#[rstest]
fn poll_logs_nonempty_and_skips_empty() {
    let dir = tempdir().unwrap();
    let mut sink = LogSink::create(dir.path()).unwrap();
    let mut inst = crt_inst(vec![":R? 1", ":R? 1"], vec!["#213+1.234500E+01", "#10"]);
    let poller = Poller::new(Duration::from_millis(1));

    assert!(poller.poll_once(&mut inst, &mut sink).unwrap());
    assert!(!poller.poll_once(&mut inst, &mut sink).unwrap());

    let content = fs::read_to_string(sink.path()).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "Time, CounterData");

    let (ts, reading) = lines[1].split_once(',').unwrap();
    assert_eq!(reading, "+1.234500E+01");
    chrono::NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S%.f").unwrap();
}

/// An empty buffer on every cycle leaves the log untouched past the header.
#[rstest]
fn poll_empty_appends_nothing() {
    let dir = tempdir().unwrap();
    let mut sink = LogSink::create(dir.path()).unwrap();
    let mut inst = crt_inst(vec![":R? 1"], vec!["#10"]);
    let poller = Poller::new(Duration::from_millis(1));

    assert!(!poller.poll_once(&mut inst, &mut sink).unwrap());

    let content = fs::read_to_string(sink.path()).unwrap();
    assert_eq!(content, "Time, CounterData\n");
}

/// A cancelled token stops `run` after the format setup, with no poll sent.
#[rstest]
fn run_stops_on_cancelled_token() {
    let dir = tempdir().unwrap();
    let mut sink = LogSink::create(dir.path()).unwrap();
    // Only the one-time format command is expected; a poll would panic the loopback.
    let mut inst = crt_inst(vec![":FORMat:DATA ASC"], vec![]);

    let stop = StopToken::new();
    stop.cancel();

    Poller::new(Duration::from_millis(1))
        .run(&mut inst, &mut sink, &stop)
        .unwrap();

    let content = fs::read_to_string(sink.path()).unwrap();
    assert_eq!(content, "Time, CounterData\n");
}

/// A malformed poll response ends the session with an error.
#[rstest]
fn poll_error_is_fatal() {
    let dir = tempdir().unwrap();
    let mut sink = LogSink::create(dir.path()).unwrap();
    let mut inst = crt_inst(vec![":R? 1"], vec!["not a block"]);
    let poller = Poller::new(Duration::from_millis(1));

    assert!(poller.poll_once(&mut inst, &mut sink).is_err());
}
