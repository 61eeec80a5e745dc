use std::fmt;

use serde::Serialize;

use crate::error::Result;

/// Notification emitted while writing tags to a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "message", rename_all = "lowercase")]
pub enum TagEvent {
    Progress(String),
    Success(String),
    Error(String),
}

impl TagEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TagEvent::Progress(_))
    }

    pub fn message(&self) -> &str {
        match self {
            TagEvent::Progress(message) | TagEvent::Success(message) | TagEvent::Error(message) => message,
        }
    }
}

impl fmt::Display for TagEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagEvent::Progress(message) => write!(f, "[progress] {}", message),
            TagEvent::Success(message) => write!(f, "[success] {}", message),
            TagEvent::Error(message) => write!(f, "[error] {}", message),
        }
    }
}

/// Forwards events of a single write operation to the caller's callback.
///
/// Handlers only get `&mut EventEmitter` and can report progress; the
/// terminal event is sent by [`EventEmitter::finish`], which consumes the
/// emitter so nothing can follow it.
pub struct EventEmitter<'a> {
    sink: &'a mut dyn FnMut(TagEvent),
}

impl<'a> EventEmitter<'a> {
    pub fn new(sink: &'a mut dyn FnMut(TagEvent)) -> Self {
        Self { sink }
    }

    pub fn progress<S: Into<String>>(&mut self, message: S) {
        (self.sink)(TagEvent::Progress(message.into()));
    }

    pub fn finish(self, outcome: &Result<String>) {
        let event = match outcome {
            Ok(message) => TagEvent::Success(message.clone()),
            Err(e) => TagEvent::Error(e.to_string()),
        };
        (self.sink)(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CinetagError;

    #[test]
    fn test_progress_then_single_terminal() {
        let mut events = Vec::new();
        let mut sink = |event: TagEvent| events.push(event);
        let mut emitter = EventEmitter::new(&mut sink);
        emitter.progress("one");
        emitter.progress("two");
        emitter.finish(&Err(CinetagError::UnsupportedFormat { extension: "avi".to_string() }));

        assert_eq!(
            events,
            vec![
                TagEvent::Progress("one".to_string()),
                TagEvent::Progress("two".to_string()),
                TagEvent::Error("Unsupported file format".to_string()),
            ]
        );
        assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_string(&TagEvent::Success("done".to_string())).unwrap();
        assert_eq!(json, r#"{"event":"success","message":"done"}"#);
    }
}
