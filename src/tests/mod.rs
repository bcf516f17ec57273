mod pipe;
mod template;

use crate::{Arg, ByteStream, Cmd, ExitStatus, LineStream, PipeError, Stderr, TextStream};

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn public_types_are_send_and_sync() {
    assert_send_sync::<Arg>();
    assert_send_sync::<Cmd>();
    assert_send_sync::<Stderr>();
    assert_send_sync::<ExitStatus>();
    assert_send_sync::<PipeError>();
    assert_send_sync::<ByteStream>();
    assert_send_sync::<TextStream>();
    assert_send_sync::<LineStream>();
}
