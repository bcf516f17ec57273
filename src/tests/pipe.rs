use std::io::ErrorKind;
use std::sync::Arc;

use crate::{Cmd, ExitStatus, PipeError, Stderr};

fn no_input() -> std::iter::Empty<Vec<u8>> {
    std::iter::empty()
}

fn collect_bytes(stream: crate::ByteStream) -> Vec<u8> {
    stream
        .collect::<Result<Vec<Vec<u8>>, PipeError>>()
        .unwrap()
        .concat()
}

#[test]
fn roundtrip() {
    let chunks: Vec<Vec<u8>> = vec![
        b"foo".to_vec(),
        b"bar\n".to_vec(),
        b"".to_vec(),
        b"baz".to_vec(),
    ];
    let out = collect_bytes(Cmd::from_argv(["cat"]).stream(chunks).unwrap());
    assert_eq!(out, b"foobar\nbaz");
}

#[test]
fn empty_input_empty_output() {
    let mut stream = Cmd::from_argv(["cat"]).stream(no_input()).unwrap();
    assert_eq!(stream.exit_status(), None);
    assert!(stream.next().is_none());
    assert_eq!(stream.exit_status(), Some(ExitStatus::Exited(0)));
    // Exhaustion is final.
    assert!(stream.next().is_none());
}

#[test]
fn large_roundtrip() {
    let input = (0..100_000).map(|n| format!("{}\n", n).into_bytes());
    let expected: usize = (0..100_000).map(|n| format!("{}\n", n).len()).sum();
    let out = collect_bytes(Cmd::from_argv(["cat"]).stream(input).unwrap());
    assert_eq!(out.len(), expected);
    assert!(out.starts_with(b"0\n1\n2\n"));
    assert!(out.ends_with(b"99998\n99999\n"));
}

#[test]
fn preserves_chunk_order() {
    let input = (0..1000).map(|n| format!("{:04}\n", n).into_bytes());
    let out = collect_bytes(Cmd::from_argv(["cat"]).stream(input).unwrap());
    let lines: Vec<&[u8]> = out.split_inclusive(|&b| b == b'\n').collect();
    for (n, line) in lines.into_iter().enumerate() {
        assert_eq!(line, format!("{:04}\n", n).as_bytes());
    }
}

#[test]
fn early_drop_terminates_child_and_writer() {
    let token = Arc::new(());
    let held = Arc::clone(&token);
    // The writer thread owns the iterator, and through it the Arc; once the
    // stream is dropped and the thread joined, ours must be the only
    // reference left.
    let input = std::iter::repeat_with(move || {
        let _held = &held;
        b"spam\n".to_vec()
    });
    let mut stream = Cmd::new("head -n 1", []).unwrap().stream(input).unwrap();
    let first = stream.next().unwrap().unwrap();
    assert_eq!(first, b"spam\n");
    drop(stream);
    assert_eq!(Arc::strong_count(&token), 1);
}

#[test]
fn broken_pipe_is_not_an_error() {
    // head stops reading long before the input runs out; the resulting
    // broken pipe on the child's stdin must stay invisible.
    let input = (0..100_000).map(|_| b"xxxxxxxxxxxxxxxx\n".to_vec());
    let stream = Cmd::new("head -n 2", []).unwrap().stream(input).unwrap();
    let status = stream.wait().unwrap();
    assert_eq!(status, ExitStatus::Exited(0));
}

#[test]
fn exit_code_propagates() {
    let status = Cmd::new("exit 13", []).unwrap().call(no_input()).unwrap();
    assert_eq!(status, ExitStatus::Exited(13));
    assert!(!status.success());
    assert_eq!(status.code(), Some(13));
}

#[test]
fn nonexistent_command_fails_in_shell() {
    // The shell launches fine and reports the missing command itself.
    let status = Cmd::new("no-such-command-cmdpipe", [])
        .unwrap()
        .stderr(Stderr::Null)
        .call(no_input())
        .unwrap();
    assert_eq!(status, ExitStatus::Exited(127));
}

#[test]
fn nonexistent_program_fails_to_launch() {
    match Cmd::from_argv(["no-such-program-cmdpipe"]).stream(no_input()) {
        Err(PipeError::Launch { cmdline, source }) => {
            assert_eq!(cmdline, "no-such-program-cmdpipe");
            assert_eq!(source.kind(), ErrorKind::NotFound);
        }
        other => panic!("expected launch failure, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn empty_argv_fails_to_launch() {
    match Cmd::from_argv(Vec::<&str>::new()).stream(no_input()) {
        Err(PipeError::Launch { source, .. }) => {
            assert_eq!(source.kind(), ErrorKind::InvalidInput);
        }
        other => panic!("expected launch failure, got {:?}", other.map(|_| ())),
    }
}

#[cfg(unix)]
#[test]
fn death_by_signal() {
    let status = Cmd::new("kill -TERM $$", []).unwrap().call(no_input()).unwrap();
    assert_eq!(status, ExitStatus::Signaled(15));
    assert_eq!(status.signal(), Some(15));
    assert_eq!(status.code(), None);
}

#[test]
fn small_buffer_still_complete() {
    let out = collect_bytes(
        Cmd::from_argv(["cat"])
            .buffer_size(1)
            .stream([b"abcdef".to_vec()])
            .unwrap(),
    );
    assert_eq!(out, b"abcdef");
}
