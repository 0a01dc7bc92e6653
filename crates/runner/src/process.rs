//! Streaming output from child processes.
//!
//! Each piped output stream of a child gets its own reader thread. The threads forward
//! chunks, tagged with the [`Generation`] of the process they belong to, over a single
//! channel so that one consumer sees all output.
use std::{
    io::{self, Read},
    process::{Child, Command, Stdio},
    thread,
};

use crossbeam_channel::Sender;

const CHUNK_SIZE: usize = 4096;

/// Identifies one spawned process among those sharing a channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Generation(pub u64);

impl Generation {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    Stdout,
    Stderr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamMessage {
    /// Text read from one of the process streams
    Output {
        generation: Generation,
        stream: Stream,
        text: String,
    },
    /// The stream reached end of file
    Closed {
        generation: Generation,
        stream: Stream,
    },
}

impl StreamMessage {
    pub fn generation(&self) -> Generation {
        match self {
            StreamMessage::Output { generation, .. } | StreamMessage::Closed { generation, .. } => {
                *generation
            }
        }
    }
}

/// Spawn `command` with stdout and stderr piped, relaying both streams to `tx`.
///
/// Exactly one [`StreamMessage::Closed`] is sent per stream once it is exhausted. Stdin is
/// left as configured on `command`.
#[tracing::instrument(skip(command, tx), fields(program = ?command.get_program()))]
pub fn spawn_streaming(
    command: &mut Command,
    generation: Generation,
    tx: Sender<StreamMessage>,
) -> io::Result<Child> {
    let mut child = command
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;
    tracing::debug!(pid = child.id(), "process spawned");

    if let Some(stdout) = child.stdout.take() {
        let tx = tx.clone();
        thread::spawn(move || relay_stream(stdout, generation, Stream::Stdout, tx));
    }
    if let Some(stderr) = child.stderr.take() {
        thread::spawn(move || relay_stream(stderr, generation, Stream::Stderr, tx));
    }
    Ok(child)
}

fn relay_stream(
    mut reader: impl Read,
    generation: Generation,
    stream: Stream,
    tx: Sender<StreamMessage>,
) {
    let mut buf = [0u8; CHUNK_SIZE];
    let mut pending = Vec::new();
    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                pending.extend_from_slice(&buf[..n]);
                let text = take_text(&mut pending);
                if text.is_empty() {
                    continue;
                }
                if tx
                    .send(StreamMessage::Output {
                        generation,
                        stream,
                        text,
                    })
                    .is_err()
                {
                    tracing::debug!(?stream, "receiver dropped, no longer relaying");
                    return;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::debug!(?stream, error = %e, "error reading process output");
                break;
            }
        }
    }

    if !pending.is_empty() {
        let _ = tx.send(StreamMessage::Output {
            generation,
            stream,
            text: String::from_utf8_lossy(&pending).into_owned(),
        });
    }
    let _ = tx.send(StreamMessage::Closed { generation, stream });
}

/// Decode as much of `pending` as possible, keeping a trailing incomplete UTF-8 sequence
/// for the next read. Invalid bytes become U+FFFD.
fn take_text(pending: &mut Vec<u8>) -> String {
    let mut text = String::new();
    let mut rest: &[u8] = pending;
    while !rest.is_empty() {
        match std::str::from_utf8(rest) {
            Ok(s) => {
                text.push_str(s);
                rest = &[];
            }
            Err(e) => {
                let (valid, after) = rest.split_at(e.valid_up_to());
                text.push_str(&String::from_utf8_lossy(valid));
                match e.error_len() {
                    Some(len) => {
                        text.push(char::REPLACEMENT_CHARACTER);
                        rest = &after[len..];
                    }
                    None => {
                        rest = after;
                        break;
                    }
                }
            }
        }
    }
    let consumed = pending.len() - rest.len();
    pending.drain(..consumed);
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_multibyte_sequence_is_held_back() {
        let bytes = "aé".as_bytes();
        let mut pending = bytes[..2].to_vec();
        assert_eq!(take_text(&mut pending), "a");
        assert_eq!(pending, vec![bytes[1]]);

        pending.push(bytes[2]);
        assert_eq!(take_text(&mut pending), "é");
        assert!(pending.is_empty());
    }

    #[test]
    fn invalid_bytes_are_replaced() {
        let mut pending = vec![b'a', 0xff, b'b'];
        assert_eq!(take_text(&mut pending), "a\u{fffd}b");
        assert!(pending.is_empty());
    }

    #[test]
    fn invalid_byte_does_not_swallow_split_sequence() {
        let e_acute = "é".as_bytes();
        let mut pending = vec![0xff, b'a', e_acute[0]];
        assert_eq!(take_text(&mut pending), "\u{fffd}a");
        assert_eq!(pending, vec![e_acute[0]]);

        pending.push(e_acute[1]);
        assert_eq!(take_text(&mut pending), "é");
        assert!(pending.is_empty());
    }

    #[test]
    fn relays_until_closed() {
        let (tx, rx) = crossbeam_channel::unbounded();
        relay_stream(
            io::Cursor::new(b"hello".to_vec()),
            Generation(3),
            Stream::Stdout,
            tx,
        );

        let messages: Vec<_> = rx.iter().collect();
        assert_eq!(
            messages,
            vec![
                StreamMessage::Output {
                    generation: Generation(3),
                    stream: Stream::Stdout,
                    text: "hello".to_string(),
                },
                StreamMessage::Closed {
                    generation: Generation(3),
                    stream: Stream::Stdout,
                },
            ]
        );
    }
}
