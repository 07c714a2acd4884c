use crate::types::Candidate;
use std::collections::VecDeque;

/// Candidates waiting for the collision test, oldest first.
///
/// Growth is breadth-first: a candidate pushed by an earlier acceptance is
/// always evaluated before one pushed by a later acceptance.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<Candidate>,
}

impl Frontier {
    pub fn new(seed: Candidate) -> Self {
        let mut queue = VecDeque::with_capacity(64);
        queue.push_back(seed);
        Self { queue }
    }

    pub fn push(&mut self, candidate: Candidate) {
        self.queue.push_back(candidate);
    }

    pub fn pop(&mut self) -> Option<Candidate> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.queue.iter()
    }
}
