//! Event Sinks
//!
//! Receivers that ingested events are dispatched to.

use crate::api::streaming::StreamEvent;

/// Receiver for dispatched stream events
pub trait EventSink {
    /// Called with non-empty assistant content
    fn on_chunk(&mut self, content: &str);

    /// Called with the content of an in-band error frame
    fn on_error(&mut self, content: &str);
}

impl<T: EventSink + ?Sized> EventSink for &mut T {
    fn on_chunk(&mut self, content: &str) {
        (**self).on_chunk(content)
    }

    fn on_error(&mut self, content: &str) {
        (**self).on_error(content)
    }
}

/// Records every event in order
impl EventSink for Vec<StreamEvent> {
    fn on_chunk(&mut self, content: &str) {
        self.push(StreamEvent::Chunk(content.to_string()));
    }

    fn on_error(&mut self, content: &str) {
        self.push(StreamEvent::Error(content.to_string()));
    }
}

/// Adapts a pair of closures into an [`EventSink`]
pub struct Callbacks<C, E> {
    on_chunk: C,
    on_error: E,
}

impl<C, E> Callbacks<C, E>
where
    C: FnMut(&str),
    E: FnMut(&str),
{
    pub fn new(on_chunk: C, on_error: E) -> Self {
        Self { on_chunk, on_error }
    }
}

impl<C, E> EventSink for Callbacks<C, E>
where
    C: FnMut(&str),
    E: FnMut(&str),
{
    fn on_chunk(&mut self, content: &str) {
        (self.on_chunk)(content)
    }

    fn on_error(&mut self, content: &str) {
        (self.on_error)(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callbacks_route_by_kind() {
        let mut chunks = Vec::new();
        let mut errors = Vec::new();
        {
            let mut sink = Callbacks::new(
                |c: &str| chunks.push(c.to_string()),
                |e: &str| errors.push(e.to_string()),
            );
            sink.on_chunk("a");
            sink.on_error("b");
            sink.on_chunk("c");
        }
        assert_eq!(chunks, vec!["a", "c"]);
        assert_eq!(errors, vec!["b"]);
    }

    #[test]
    fn test_vec_sink_records_order() {
        let mut events: Vec<StreamEvent> = Vec::new();
        events.on_error("x");
        events.on_chunk("y");
        assert_eq!(
            events,
            vec![
                StreamEvent::Error("x".to_string()),
                StreamEvent::Chunk("y".to_string())
            ]
        );
    }
}
