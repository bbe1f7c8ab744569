#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    group: TestGroup,
    payload: TestPayload,
}

impl TestCase {
    pub fn new(name: &'static str, group: TestGroup, payload: TestPayload) -> Self {
        Self { name, group, payload }
    }

    pub fn small(name: &'static str, payload: TestPayload) -> Self {
        Self::new(name, TestGroup::Small, payload)
    }

    pub fn normal(name: &'static str, payload: TestPayload) -> Self {
        Self::new(name, TestGroup::Normal, payload)
    }

    pub fn large(name: &'static str, payload: TestPayload) -> Self {
        Self::new(name, TestGroup::Large, payload)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group(&self) -> TestGroup {
        self.group
    }

    pub fn payload(&self) -> &TestPayload {
        &self.payload
    }

    /// Total number of payload bytes carried by all parts.
    pub fn total_bytes(&self) -> usize {
        self.payload.parts * self.payload.part_size
    }
}

/// Shape of a generated multipart body: `parts` parts of `part_size` bytes each.
#[derive(Debug, Copy, Clone)]
pub struct TestPayload {
    parts: usize,
    part_size: usize,
}

impl TestPayload {
    pub const fn new(parts: usize, part_size: usize) -> Self {
        Self { parts, part_size }
    }

    pub fn parts(&self) -> usize {
        self.parts
    }

    pub fn part_size(&self) -> usize {
        self.part_size
    }

    /// Deterministic content for the part at `index`.
    pub fn part_bytes(&self, index: usize) -> Vec<u8> {
        (0..self.part_size).map(|offset| ((index + offset) % 251) as u8).collect()
    }
}

#[derive(Clone, Copy, Debug)]
pub enum TestGroup {
    Small,
    Normal,
    Large,
}
