use std::collections::VecDeque;

/// A serialized scan request waiting to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingRequest(String);

impl OutgoingRequest {
    pub fn new(payload: impl Into<String>) -> Self {
        Self(payload.into())
    }

    pub fn payload(&self) -> &str {
        &self.0
    }

    pub fn into_payload(self) -> String {
        self.0
    }
}

/// Unbounded FIFO of requests not yet handed to a connection.
#[derive(Debug, Clone, Default)]
pub struct OutgoingQueue {
    requests: VecDeque<OutgoingRequest>,
}

impl OutgoingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, request: OutgoingRequest) {
        self.requests.push_back(request);
    }

    pub fn pop(&mut self) -> Option<OutgoingRequest> {
        self.requests.pop_front()
    }

    /// Puts back a request the connection refused, ahead of everything else.
    pub(crate) fn requeue(&mut self, request: OutgoingRequest) {
        self.requests.push_front(request);
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_push_order() {
        let mut queue = OutgoingQueue::new();
        queue.push(OutgoingRequest::new("a"));
        queue.push(OutgoingRequest::new("b"));
        queue.push(OutgoingRequest::new("a"));

        let drained: Vec<_> = std::iter::from_fn(|| queue.pop())
            .map(OutgoingRequest::into_payload)
            .collect();
        assert_eq!(drained, vec!["a", "b", "a"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn requeued_request_goes_first() {
        let mut queue = OutgoingQueue::new();
        queue.push(OutgoingRequest::new("second"));
        queue.requeue(OutgoingRequest::new("first"));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop().unwrap().payload(), "first");
    }
}
