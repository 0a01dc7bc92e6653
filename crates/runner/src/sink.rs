use crate::Stream;

/// Destination for process output.
///
/// Chunks arrive in the order they were read and must only ever be appended.
pub trait OutputSink {
    fn append(&mut self, stream: Stream, text: &str);
}

impl OutputSink for String {
    fn append(&mut self, _stream: Stream, text: &str) {
        self.push_str(text);
    }
}

impl<S> OutputSink for &mut S
where
    S: OutputSink + ?Sized,
{
    fn append(&mut self, stream: Stream, text: &str) {
        (**self).append(stream, text);
    }
}
